use crate::auth::{
    build_session_cookie, expired_session_cookie, generate_session_token, hash_password,
    require_admin, session_cookie_value, sha256_hex, verify_password,
};
use crate::http::handlers::{
    decode_body, finish, json_response, propagated_request_id, store_error,
};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{Duration as ChronoDuration, Utc};
use makazi_api::body::CredentialsBody;
use makazi_api::dto::SessionUserDto;
use makazi_api::{ApiError, ApiErrorCode};
use makazi_store::{sessions, users};
use std::time::Instant;
use tracing::{info, warn};

fn set_cookie(resp: &mut Response, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        resp.headers_mut().insert("set-cookie", value);
    }
}

fn session_expiry(state: &AppState) -> chrono::DateTime<Utc> {
    let ttl = ChronoDuration::from_std(state.api.session_ttl)
        .unwrap_or_else(|_| ChronoDuration::hours(24));
    Utc::now() + ttl
}

pub(crate) async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = login_inner(&state, &body).await;
    finish(&state, "/api/auth/login", started, &request_id, result).await
}

async fn login_inner(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let parsed: CredentialsBody = decode_body(body)?;
    let conn = state.store.acquire().await.map_err(store_error)?;

    let user = users::get_by_username(&conn, parsed.username.trim()).map_err(store_error)?;
    let Some(user) = user else {
        warn!(username = %parsed.username.trim(), "login for unknown user");
        return Err(ApiError::unauthorized());
    };
    if !verify_password(&parsed.password, &user.password_hash) {
        warn!(username = %user.username, "login with bad password");
        return Err(ApiError::unauthorized());
    }

    let (token, token_hash) = generate_session_token()?;
    sessions::create(&conn, &token_hash, user.id, session_expiry(state)).map_err(store_error)?;
    info!(username = %user.username, "login");

    let mut resp = json_response(StatusCode::OK, &SessionUserDto::from(&user));
    set_cookie(
        &mut resp,
        &build_session_cookie(
            &state.api.session_cookie,
            &token,
            state.api.session_ttl.as_secs(),
        ),
    );
    Ok(resp)
}

pub(crate) async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = logout_inner(&state, &headers).await;
    finish(&state, "/api/auth/logout", started, &request_id, result).await
}

async fn logout_inner(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = session_cookie_value(headers, &state.api.session_cookie) {
        let conn = state.store.acquire().await.map_err(store_error)?;
        sessions::delete(&conn, &sha256_hex(token.as_bytes())).map_err(store_error)?;
    }
    let mut resp = StatusCode::NO_CONTENT.into_response();
    set_cookie(&mut resp, &expired_session_cookie(&state.api.session_cookie));
    Ok(resp)
}

pub(crate) async fn register_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = register_inner(&state, &body).await;
    finish(&state, "/api/auth/register", started, &request_id, result).await
}

async fn register_inner(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let parsed: CredentialsBody = decode_body(body)?;
    let new_admin = parsed.into_new_admin()?;

    let conn = state.store.acquire().await.map_err(store_error)?;
    // Open only for first-run bootstrap unless explicitly enabled.
    let user_count = users::count(&conn).map_err(store_error)?;
    if user_count > 0 && !state.api.allow_registration {
        return Err(ApiError::new(
            ApiErrorCode::RegistrationClosed,
            "registration is closed",
            serde_json::Value::Null,
        ));
    }

    let password_hash = hash_password(&new_admin.password, state.api.pbkdf2_iterations)?;
    let created = match users::create(&conn, &new_admin.username, &password_hash) {
        Ok(user) => user,
        Err(makazi_store::StoreError::Conflict(_)) => {
            return Err(ApiError::new(
                ApiErrorCode::UsernameTaken,
                "username already taken",
                serde_json::json!({"username": new_admin.username}),
            ));
        }
        Err(e) => return Err(store_error(e)),
    };
    info!(username = %created.username, "admin account registered");
    Ok(json_response(
        StatusCode::CREATED,
        &SessionUserDto::from(&created),
    ))
}

pub(crate) async fn session_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => Ok(json_response(
            StatusCode::OK,
            &SessionUserDto {
                id: admin.user_id,
                username: admin.username,
            },
        )),
        Err(err) => Err(err),
    };
    finish(&state, "/api/auth/user", started, &request_id, result).await
}
