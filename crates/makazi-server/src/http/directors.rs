use crate::auth::{require_admin, AdminIdentity};
use crate::http::handlers::{
    decode_body, finish, json_response, parse_id, propagated_request_id, store_error,
};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use makazi_api::body::DirectorBody;
use makazi_api::dto::DirectorDto;
use makazi_api::ApiError;
use makazi_store::directors;
use std::time::Instant;
use tracing::info;

pub(crate) async fn list_directors_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = list_inner(&state).await;
    finish(&state, "/api/directors", started, &request_id, result).await
}

async fn list_inner(state: &AppState) -> Result<Response, ApiError> {
    let conn = state.store.acquire().await.map_err(store_error)?;
    let rows = directors::list(&conn).map_err(store_error)?;
    let body: Vec<DirectorDto> = rows.into_iter().map(DirectorDto::from).collect();
    Ok(json_response(StatusCode::OK, &body))
}

pub(crate) async fn create_director_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => create_inner(&state, &admin, &body).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/directors", started, &request_id, result).await
}

async fn create_inner(
    state: &AppState,
    admin: &AdminIdentity,
    body: &[u8],
) -> Result<Response, ApiError> {
    let parsed: DirectorBody = decode_body(body)?;
    let new_director = parsed.into_new_director()?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    let created = directors::create(&conn, &new_director).map_err(store_error)?;
    info!(admin = %admin.username, director = created.id, "director created");
    Ok(json_response(
        StatusCode::CREATED,
        &DirectorDto::from(created),
    ))
}

pub(crate) async fn update_director_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => update_inner(&state, &admin, &raw_id, &body).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/directors/:id", started, &request_id, result).await
}

async fn update_inner(
    state: &AppState,
    admin: &AdminIdentity,
    raw_id: &str,
    body: &[u8],
) -> Result<Response, ApiError> {
    let id = parse_id(raw_id)?;
    let parsed: DirectorBody = decode_body(body)?;
    let new_director = parsed.into_new_director()?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    match directors::update(&conn, id, &new_director).map_err(store_error)? {
        Some(updated) => {
            info!(admin = %admin.username, director = id, "director updated");
            Ok(json_response(StatusCode::OK, &DirectorDto::from(updated)))
        }
        None => Err(ApiError::director_not_found(id)),
    }
}

pub(crate) async fn delete_director_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => delete_inner(&state, &admin, &raw_id).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/directors/:id", started, &request_id, result).await
}

async fn delete_inner(
    state: &AppState,
    admin: &AdminIdentity,
    raw_id: &str,
) -> Result<Response, ApiError> {
    let id = parse_id(raw_id)?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    if directors::delete(&conn, id).map_err(store_error)? {
        info!(admin = %admin.username, director = id, "director deleted");
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(ApiError::director_not_found(id))
    }
}
