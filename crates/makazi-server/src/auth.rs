use crate::AppState;
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use makazi_api::ApiError;
use makazi_store::sessions;
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};

const PASSWORD_SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const DERIVED_LEN: usize = 32;
const SESSION_TOKEN_LEN: usize = 32;

/// Proof of an authenticated session, passed explicitly into every handler
/// that mutates state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub user_id: i64,
    pub username: String,
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// `pbkdf2-sha256$<iterations>$<salt-b64>$<hash-b64>`.
pub fn hash_password(password: &str, iterations: u32) -> Result<String, ApiError> {
    let mut salt = [0_u8; SALT_LEN];
    getrandom::getrandom(&mut salt).map_err(|e| {
        ApiError::new(
            makazi_api::ApiErrorCode::Internal,
            "entropy source failed",
            serde_json::json!({"message": e.to_string()}),
        )
    })?;
    let mut derived = [0_u8; DERIVED_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);
    Ok(format!(
        "{PASSWORD_SCHEME}${iterations}${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(derived)
    ))
}

/// Verification never errors: any malformed stored hash simply fails to
/// match.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != PASSWORD_SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = URL_SAFE_NO_PAD.decode(salt) else {
        return false;
    };
    let Ok(expected) = URL_SAFE_NO_PAD.decode(hash) else {
        return false;
    };
    let mut derived = vec![0_u8; expected.len().max(1)];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);
    constant_time_eq(&derived, &expected)
}

/// Fresh session token plus the hash that goes in the store. Only the hash
/// is ever persisted.
pub(crate) fn generate_session_token() -> Result<(String, String), ApiError> {
    let mut raw = [0_u8; SESSION_TOKEN_LEN];
    getrandom::getrandom(&mut raw).map_err(|e| {
        ApiError::new(
            makazi_api::ApiErrorCode::Internal,
            "entropy source failed",
            serde_json::json!({"message": e.to_string()}),
        )
    })?;
    let token = URL_SAFE_NO_PAD.encode(raw);
    let token_hash = sha256_hex(token.as_bytes());
    Ok((token, token_hash))
}

pub(crate) fn session_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get("cookie")?.to_str().ok()?;
    for piece in raw.split(';') {
        let Some((name, value)) = piece.trim().split_once('=') else {
            continue;
        };
        if name == cookie_name && !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

pub(crate) fn build_session_cookie(name: &str, token: &str, max_age_secs: u64) -> String {
    format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

pub(crate) fn expired_session_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// The session gate. Every admin/mutating handler calls this before touching
/// the data-access layer and threads the returned identity through.
pub async fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AdminIdentity, ApiError> {
    let token = session_cookie_value(headers, &state.api.session_cookie)
        .ok_or_else(ApiError::unauthorized)?;
    let token_hash = sha256_hex(token.as_bytes());
    let conn = state
        .store
        .acquire()
        .await
        .map_err(crate::http::handlers::store_error)?;
    let user = sessions::get_valid(&conn, &token_hash, Utc::now())
        .map_err(crate::http::handlers::store_error)?
        .ok_or_else(ApiError::unauthorized)?;
    Ok(AdminIdentity {
        user_id: user.id,
        username: user.username,
    })
}
