use crate::error::StoreError;
use crate::schema;
use rusqlite::Connection;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub max_connections: usize,
    pub acquire_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/makazi.sqlite"),
            max_connections: 8,
            acquire_timeout: Duration::from_secs(2),
        }
    }
}

/// Process-scoped connection pool with an explicit lifecycle: opened once at
/// startup (running migrations), handed out under a semaphore, torn down at
/// shutdown. Never recreated mid-request.
pub struct StorePool {
    connections: Mutex<Vec<Connection>>,
    semaphore: Arc<Semaphore>,
    acquire_timeout: Duration,
    path: PathBuf,
}

impl StorePool {
    pub fn open(cfg: &StoreConfig) -> Result<Arc<Self>, StoreError> {
        if cfg.max_connections == 0 {
            return Err(StoreError::Internal(
                "max_connections must be positive".to_string(),
            ));
        }
        if let Some(parent) = cfg.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Internal(e.to_string()))?;
            }
        }

        let mut connections = Vec::with_capacity(cfg.max_connections);
        for _ in 0..cfg.max_connections {
            connections.push(open_connection(&cfg.path)?);
        }
        if let Some(first) = connections.first() {
            schema::migrate(first)?;
        }
        info!(path = %cfg.path.display(), connections = cfg.max_connections, "store pool open");

        Ok(Arc::new(Self {
            semaphore: Arc::new(Semaphore::new(cfg.max_connections)),
            connections: Mutex::new(connections),
            acquire_timeout: cfg.acquire_timeout,
            path: cfg.path.clone(),
        }))
    }

    pub async fn acquire(self: &Arc<Self>) -> Result<StoreConnection, StoreError> {
        let acquired = timeout(
            self.acquire_timeout,
            Arc::clone(&self.semaphore).acquire_owned(),
        )
        .await
        .map_err(|_| StoreError::Unavailable("connection pool exhausted".to_string()))?;
        let permit = acquired
            .map_err(|_| StoreError::Unavailable("connection pool closed".to_string()))?;

        let conn = lock_pool(&self.connections).pop().ok_or_else(|| {
            StoreError::Internal("pool accounting mismatch: no idle connection".to_string())
        })?;
        Ok(StoreConnection {
            conn: Some(conn),
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    pub async fn health_check(self: &Arc<Self>) -> Result<(), StoreError> {
        let conn = self.acquire().await?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(StoreError::from)?;
        Ok(())
    }

    /// Stops handing out connections and drops the idle set. Connections
    /// still checked out close when their guards drop.
    pub fn close(&self) {
        self.semaphore.close();
        let drained = lock_pool(&self.connections).split_off(0);
        info!(path = %self.path.display(), closed = drained.len(), "store pool closed");
        drop(drained);
    }

    fn put_back(&self, conn: Connection) {
        if self.semaphore.is_closed() {
            drop(conn);
        } else {
            lock_pool(&self.connections).push(conn);
        }
    }
}

fn lock_pool(m: &Mutex<Vec<Connection>>) -> std::sync::MutexGuard<'_, Vec<Connection>> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("store pool mutex poisoned; continuing with inner state");
            poisoned.into_inner()
        }
    }
}

fn open_connection(path: &PathBuf) -> Result<Connection, StoreError> {
    let conn = Connection::open(path).map_err(StoreError::from)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;
         PRAGMA foreign_keys = ON;",
    )
    .map_err(StoreError::from)?;
    Ok(conn)
}

/// Checked-out connection; derefs to [`rusqlite::Connection`] and returns
/// itself to the pool on drop.
pub struct StoreConnection {
    conn: Option<Connection>,
    pool: Arc<StorePool>,
    _permit: OwnedSemaphorePermit,
}

impl std::fmt::Debug for StoreConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConnection")
            .field("checked_out", &self.conn.is_some())
            .finish()
    }
}

impl Deref for StoreConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
            .as_ref()
            .unwrap_or_else(|| unreachable!("connection taken before drop"))
    }
}

impl Drop for StoreConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.put_back(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &tempfile::TempDir) -> StoreConfig {
        StoreConfig {
            path: dir.path().join("makazi.sqlite"),
            max_connections: 2,
            acquire_timeout: Duration::from_millis(100),
        }
    }

    #[tokio::test]
    async fn pool_hands_out_and_recycles_connections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = StorePool::open(&test_config(&dir)).expect("open pool");

        let a = pool.acquire().await.expect("first");
        let b = pool.acquire().await.expect("second");
        drop(a);
        drop(b);
        pool.health_check().await.expect("healthy");
    }

    #[tokio::test]
    async fn exhausted_pool_times_out_as_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = StorePool::open(&test_config(&dir)).expect("open pool");

        let _a = pool.acquire().await.expect("first");
        let _b = pool.acquire().await.expect("second");
        let err = pool.acquire().await.expect_err("pool exhausted");
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn closed_pool_refuses_new_work() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = StorePool::open(&test_config(&dir)).expect("open pool");
        pool.close();
        let err = pool.acquire().await.expect_err("closed");
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
