use crate::auth::{require_admin, AdminIdentity};
use crate::http::handlers::{
    decode_body, finish, json_response, parse_id, propagated_request_id, query_error, store_error,
    to_parse_map,
};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use makazi_api::body::{CreatePropertyBody, UpdatePropertyBody};
use makazi_api::dto::{DashboardStatsResponse, PropertyDto, PropertyListResponse};
use makazi_api::{params, ApiError};
use makazi_model::{InquiryStatus, ListingStatus};
use makazi_query::query_property_page;
use makazi_store::{inquiries, properties};
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

pub(crate) async fn list_admin_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => list_admin_inner(&state, &admin, &raw).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/properties/admin", started, &request_id, result).await
}

async fn list_admin_inner(
    state: &AppState,
    _admin: &AdminIdentity,
    raw: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let parsed = params::parse_admin_list_params(&to_parse_map(raw), state.api.default_page_size)?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    let page = query_property_page(&conn, &parsed.filter, &parsed.page).map_err(query_error)?;
    let body = PropertyListResponse {
        properties: page.rows.into_iter().map(PropertyDto::from).collect(),
        total: page.total,
        pages: page.pages,
    };
    Ok(json_response(StatusCode::OK, &body))
}

pub(crate) async fn create_property_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => create_property_inner(&state, &admin, &body).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/properties", started, &request_id, result).await
}

async fn create_property_inner(
    state: &AppState,
    admin: &AdminIdentity,
    body: &[u8],
) -> Result<Response, ApiError> {
    let parsed: CreatePropertyBody = decode_body(body)?;
    let new_property = parsed.into_new_property()?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    let created = properties::create(&conn, &new_property).map_err(store_error)?;
    info!(admin = %admin.username, property = created.id, "property created");
    Ok(json_response(
        StatusCode::CREATED,
        &PropertyDto::from(created),
    ))
}

pub(crate) async fn update_property_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => update_property_inner(&state, &admin, &raw_id, &body).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/properties/:id", started, &request_id, result).await
}

async fn update_property_inner(
    state: &AppState,
    admin: &AdminIdentity,
    raw_id: &str,
    body: &[u8],
) -> Result<Response, ApiError> {
    let id = parse_id(raw_id)?;
    let parsed: UpdatePropertyBody = decode_body(body)?;
    let patch = parsed.into_patch()?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    match properties::update(&conn, id, &patch).map_err(store_error)? {
        Some(updated) => {
            info!(admin = %admin.username, property = id, "property updated");
            Ok(json_response(StatusCode::OK, &PropertyDto::from(updated)))
        }
        None => Err(ApiError::property_not_found(id)),
    }
}

pub(crate) async fn delete_property_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => delete_property_inner(&state, &admin, &raw_id).await,
        Err(err) => Err(err),
    };
    finish(&state, "/api/properties/:id", started, &request_id, result).await
}

async fn delete_property_inner(
    state: &AppState,
    admin: &AdminIdentity,
    raw_id: &str,
) -> Result<Response, ApiError> {
    let id = parse_id(raw_id)?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    if properties::delete(&conn, id).map_err(store_error)? {
        info!(admin = %admin.username, property = id, "property deleted");
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(ApiError::property_not_found(id))
    }
}

pub(crate) async fn dashboard_stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = match require_admin(&state, &headers).await {
        Ok(admin) => dashboard_stats_inner(&state, &admin).await,
        Err(err) => Err(err),
    };
    finish(
        &state,
        "/api/admin/dashboard-stats",
        started,
        &request_id,
        result,
    )
    .await
}

async fn dashboard_stats_inner(
    state: &AppState,
    _admin: &AdminIdentity,
) -> Result<Response, ApiError> {
    let conn = state.store.acquire().await.map_err(store_error)?;
    let stats = DashboardStatsResponse {
        total_properties: properties::count_all(&conn).map_err(store_error)?,
        for_sale: properties::count_by_status(&conn, ListingStatus::ForSale)
            .map_err(store_error)?,
        for_rent: properties::count_by_status(&conn, ListingStatus::ForRent)
            .map_err(store_error)?,
        for_lease: properties::count_by_status(&conn, ListingStatus::ForLease)
            .map_err(store_error)?,
        sold: properties::count_by_status(&conn, ListingStatus::Sold).map_err(store_error)?,
        pending: properties::count_by_status(&conn, ListingStatus::Pending)
            .map_err(store_error)?,
        featured: properties::count_featured(&conn).map_err(store_error)?,
        total_inquiries: inquiries::count_all(&conn).map_err(store_error)?,
        new_inquiries: inquiries::count_by_status(&conn, InquiryStatus::New)
            .map_err(store_error)?,
    };
    Ok(json_response(StatusCode::OK, &stats))
}
