use crate::error::StoreError;
use crate::users;
use chrono::{DateTime, SecondsFormat, Utc};
use makazi_model::AdminUser;
use rusqlite::{params, Connection, OptionalExtension};

/// Only the SHA-256 hash of the cookie token ever touches this table; a
/// leaked database row cannot be replayed as a session.
pub fn create(
    conn: &Connection,
    token_hash: &str,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            token_hash,
            user_id,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            expires_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ],
    )?;
    Ok(())
}

/// Resolves an unexpired session to its user in one lookup.
pub fn get_valid(
    conn: &Connection,
    token_hash: &str,
    now: DateTime<Utc>,
) -> Result<Option<AdminUser>, StoreError> {
    let user_id: Option<i64> = conn
        .query_row(
            "SELECT user_id FROM sessions WHERE token_hash = ?1 AND expires_at > ?2",
            params![token_hash, now.to_rfc3339_opts(SecondsFormat::Millis, true)],
            |row| row.get(0),
        )
        .optional()?;
    match user_id {
        Some(id) => users::get(conn, id),
        None => Ok(None),
    }
}

pub fn delete(conn: &Connection, token_hash: &str) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "DELETE FROM sessions WHERE token_hash = ?1",
        params![token_hash],
    )?;
    Ok(changed > 0)
}

pub fn purge_expired(conn: &Connection, now: DateTime<Utc>) -> Result<u64, StoreError> {
    let changed = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![now.to_rfc3339_opts(SecondsFormat::Millis, true)],
    )?;
    Ok(changed as u64)
}
