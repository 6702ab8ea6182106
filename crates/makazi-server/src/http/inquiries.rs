use crate::auth::{require_admin, AdminIdentity};
use crate::http::handlers::{
    decode_body, finish, json_response, parse_id, propagated_request_id, store_error, to_parse_map,
};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use makazi_api::body::{CreateInquiryBody, UpdateInquiryStatusBody, CONTACT_DEFAULT_SUBJECT};
use makazi_api::dto::InquiryDto;
use makazi_api::{params, ApiError};
use makazi_store::inquiries;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Subject applied when the property inquiry form leaves it blank.
const INQUIRY_DEFAULT_SUBJECT: &str = "Property Inquiry";

pub(crate) async fn create_inquiry_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = create_inner(&state, &body, INQUIRY_DEFAULT_SUBJECT).await;
    finish(&state, "/api/inquiries", started, &request_id, result).await
}

pub(crate) async fn contact_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = create_inner(&state, &body, CONTACT_DEFAULT_SUBJECT).await;
    finish(&state, "/api/contact", started, &request_id, result).await
}

async fn create_inner(
    state: &AppState,
    body: &[u8],
    default_subject: &str,
) -> Result<Response, ApiError> {
    let parsed: CreateInquiryBody = decode_body(body)?;
    let new_inquiry = parsed.into_new_inquiry(default_subject)?;
    let created = {
        let conn = state.store.acquire().await.map_err(store_error)?;
        inquiries::create(&conn, &new_inquiry).map_err(store_error)?
    };
    info!(inquiry = created.id, "inquiry created");

    // Best-effort: the row is durable, delivery failures only get logged.
    let notifier = Arc::clone(&state.notifier);
    let notification = created.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.inquiry_created(&notification).await {
            warn!(inquiry = notification.id, error = %e, "inquiry notification failed");
        }
    });

    Ok(json_response(
        StatusCode::CREATED,
        &InquiryDto::from(created),
    ))
}

pub(crate) async fn list_inquiries_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => list_inner(&state, &admin, &raw).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/inquiries", started, &request_id, result).await
}

async fn list_inner(
    state: &AppState,
    _admin: &AdminIdentity,
    raw: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let parsed = params::parse_inquiry_list_params(&to_parse_map(raw))?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    let rows = inquiries::list(&conn, parsed.search.as_deref(), parsed.status)
        .map_err(store_error)?;
    let body: Vec<InquiryDto> = rows.into_iter().map(InquiryDto::from).collect();
    Ok(json_response(StatusCode::OK, &body))
}

pub(crate) async fn update_inquiry_status_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => update_status_inner(&state, &admin, &raw_id, &body).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/inquiries/:id", started, &request_id, result).await
}

async fn update_status_inner(
    state: &AppState,
    admin: &AdminIdentity,
    raw_id: &str,
    body: &[u8],
) -> Result<Response, ApiError> {
    let id = parse_id(raw_id)?;
    let parsed: UpdateInquiryStatusBody = decode_body(body)?;
    let status = parsed.parse_status()?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    match inquiries::update_status(&conn, id, status).map_err(store_error)? {
        Some(updated) => {
            info!(admin = %admin.username, inquiry = id, status = %status, "inquiry triaged");
            Ok(json_response(StatusCode::OK, &InquiryDto::from(updated)))
        }
        None => Err(ApiError::inquiry_not_found(id)),
    }
}
