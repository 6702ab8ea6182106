use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use makazi_api::error_mapping::map_error;
use makazi_api::{ApiError, ApiErrorCode};
use makazi_store::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::error;

/// Store failures reach the client as a generic 503/500; the detail goes to
/// the log, not the wire.
pub(crate) fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::Unavailable(msg) => {
            error!(detail = %msg, "store unavailable");
            ApiError::new(
                ApiErrorCode::StoreUnavailable,
                "store temporarily unavailable",
                serde_json::Value::Null,
            )
        }
        StoreError::Conflict(msg) | StoreError::Internal(msg) => {
            error!(detail = %msg, "store operation failed");
            ApiError::new(
                ApiErrorCode::Internal,
                "internal error",
                serde_json::Value::Null,
            )
        }
    }
}

pub(crate) fn query_error(e: makazi_query::QueryError) -> ApiError {
    error!(detail = %e, "listing query failed");
    ApiError::new(
        ApiErrorCode::Internal,
        "internal error",
        serde_json::Value::Null,
    )
}

pub(crate) fn api_error_response(err: ApiError, request_id: &str) -> Response {
    let err = err.with_request_id(request_id);
    let status =
        StatusCode::from_u16(map_error(&err)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": err}))).into_response()
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> Response {
    (status, Json(payload)).into_response()
}

pub(crate) fn attach_request_id(resp: &mut Response, request_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        resp.headers_mut().insert("x-request-id", value);
    }
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.len() <= 128 {
            return trimmed.to_string();
        }
    }
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn to_parse_map(params: &HashMap<String, String>) -> BTreeMap<String, String> {
    params.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::invalid_param("id", raw)),
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| {
        ApiError::validation_failed(json!([{"field": "body", "reason": e.to_string()}]))
    })
}

/// Uniform tail for every handler: map the error branch, stamp the request
/// id, record metrics.
pub(crate) async fn finish(
    state: &AppState,
    route: &'static str,
    started: Instant,
    request_id: &str,
    result: Result<Response, ApiError>,
) -> Response {
    let mut resp = match result {
        Ok(resp) => resp,
        Err(err) => api_error_response(err, request_id),
    };
    attach_request_id(&mut resp, request_id);
    state
        .metrics
        .observe_request(route, resp.status(), started.elapsed())
        .await;
    resp
}

pub(crate) async fn healthz_handler() -> Response {
    (StatusCode::OK, "ok").into_response()
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    if !state.ready.load(Ordering::Relaxed) {
        return (StatusCode::SERVICE_UNAVAILABLE, "starting").into_response();
    }
    match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            error!(detail = %e, "readiness store check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable").into_response()
        }
    }
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> Response {
    (StatusCode::OK, state.metrics.render().await).into_response()
}
