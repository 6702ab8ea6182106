use crate::error::StoreError;
use chrono::{SecondsFormat, Utc};
use makazi_model::AdminUser;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn decode_user_row(row: &Row<'_>) -> rusqlite::Result<AdminUser> {
    Ok(AdminUser {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
    })
}

pub fn create(
    conn: &Connection,
    username: &str,
    password_hash: &str,
) -> Result<AdminUser, StoreError> {
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    conn.execute(
        "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
        params![username, password_hash, created_at],
    )?;
    let id = conn.last_insert_rowid();
    get(conn, id)?
        .ok_or_else(|| StoreError::Internal(format!("user {id} missing immediately after insert")))
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<AdminUser>, StoreError> {
    conn.query_row(
        "SELECT id, username, password_hash FROM users WHERE id = ?1",
        params![id],
        decode_user_row,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn get_by_username(conn: &Connection, username: &str) -> Result<Option<AdminUser>, StoreError> {
    conn.query_row(
        "SELECT id, username, password_hash FROM users WHERE username = ?1",
        params![username],
        decode_user_row,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn count(conn: &Connection) -> Result<u64, StoreError> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(total.max(0) as u64)
}
