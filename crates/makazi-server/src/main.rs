#![forbid(unsafe_code)]

use makazi_server::{
    build_router, hash_password, validate_startup_config, ApiConfig, AppState, InquiryNotifier,
    NoopNotifier, WebhookNotifier,
};
use makazi_store::{users, StoreConfig, StorePool};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_secs(name: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_u64(name, default_secs))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("MAKAZI_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// First-run convenience: seed the admin account from the environment when
/// the users table is empty.
async fn bootstrap_admin(pool: &Arc<StorePool>, api: &ApiConfig) -> Result<(), String> {
    let (Ok(username), Ok(password)) = (
        env::var("MAKAZI_ADMIN_USERNAME"),
        env::var("MAKAZI_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };
    let conn = pool.acquire().await.map_err(|e| e.to_string())?;
    if users::count(&conn).map_err(|e| e.to_string())? > 0 {
        return Ok(());
    }
    let password_hash =
        hash_password(&password, api.pbkdf2_iterations).map_err(|e| e.message)?;
    let created =
        users::create(&conn, username.trim(), &password_hash).map_err(|e| e.to_string())?;
    info!(username = %created.username, "bootstrap admin account created");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("MAKAZI_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let store_cfg = StoreConfig {
        path: PathBuf::from(
            env::var("MAKAZI_DB_PATH").unwrap_or_else(|_| "data/makazi.sqlite".to_string()),
        ),
        max_connections: env_usize("MAKAZI_STORE_CONNECTIONS", 8),
        acquire_timeout: Duration::from_millis(env_u64("MAKAZI_STORE_ACQUIRE_TIMEOUT_MS", 2000)),
    };
    let api_cfg = ApiConfig {
        max_body_bytes: env_usize("MAKAZI_MAX_BODY_BYTES", 64 * 1024),
        default_page_size: env_usize("MAKAZI_DEFAULT_PAGE_SIZE", 12),
        session_cookie: env::var("MAKAZI_SESSION_COOKIE")
            .unwrap_or_else(|_| "makazi_session".to_string()),
        session_ttl: env_duration_secs("MAKAZI_SESSION_TTL_SECS", 24 * 60 * 60),
        session_purge_interval: env_duration_secs("MAKAZI_SESSION_PURGE_INTERVAL_SECS", 60 * 60),
        pbkdf2_iterations: env_u64("MAKAZI_PBKDF2_ITERATIONS", 200_000) as u32,
        allow_registration: env_bool("MAKAZI_ALLOW_REGISTRATION", false),
        notify_webhook_url: env::var("MAKAZI_NOTIFY_WEBHOOK_URL").ok(),
    };
    validate_startup_config(&api_cfg, &store_cfg)?;

    let pool = StorePool::open(&store_cfg).map_err(|e| e.to_string())?;
    bootstrap_admin(&pool, &api_cfg).await?;

    let notifier: Arc<dyn InquiryNotifier> = match &api_cfg.notify_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone()).map_err(|e| e.to_string())?),
        None => Arc::new(NoopNotifier),
    };

    let state = AppState::new(Arc::clone(&pool), api_cfg, notifier);
    state.spawn_session_purge();
    state.ready.store(true, Ordering::Relaxed);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("makazi-server listening on {bind_addr}");

    let drain = Duration::from_millis(env_u64("MAKAZI_SHUTDOWN_DRAIN_MS", 3000));
    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            info!("shutdown signal received, draining");
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"));

    pool.close();
    if serve_result.is_err() {
        error!("server exited with error");
    }
    serve_result
}
