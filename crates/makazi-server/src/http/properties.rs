use crate::http::handlers::{
    finish, json_response, parse_id, propagated_request_id, query_error, store_error, to_parse_map,
};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use makazi_api::dto::{FilterOptionsResponse, PropertyDto, PropertyListResponse};
use makazi_api::{params, ApiError};
use makazi_query::query_property_page;
use makazi_store::properties;
use std::collections::HashMap;
use std::time::Instant;

pub(crate) async fn list_public_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = list_public_inner(&state, &raw).await;
    finish(&state, "/api/properties", started, &request_id, result).await
}

async fn list_public_inner(
    state: &AppState,
    raw: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let parsed =
        params::parse_public_list_params(&to_parse_map(raw), state.api.default_page_size)?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    let page = query_property_page(&conn, &parsed.filter, &parsed.page).map_err(query_error)?;
    let body = PropertyListResponse {
        properties: page.rows.into_iter().map(PropertyDto::from).collect(),
        total: page.total,
        pages: page.pages,
    };
    Ok(json_response(StatusCode::OK, &body))
}

pub(crate) async fn get_property_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = get_property_inner(&state, &raw_id).await;
    finish(&state, "/api/properties/:id", started, &request_id, result).await
}

async fn get_property_inner(state: &AppState, raw_id: &str) -> Result<Response, ApiError> {
    let id = parse_id(raw_id)?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    match properties::get(&conn, id).map_err(store_error)? {
        Some(property) => Ok(json_response(StatusCode::OK, &PropertyDto::from(property))),
        None => Err(ApiError::property_not_found(id)),
    }
}

pub(crate) async fn filter_options_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = filter_options_inner(&state).await;
    finish(
        &state,
        "/api/properties/filter-options",
        started,
        &request_id,
        result,
    )
    .await
}

async fn filter_options_inner(state: &AppState) -> Result<Response, ApiError> {
    let conn = state.store.acquire().await.map_err(store_error)?;
    let body = FilterOptionsResponse {
        locations: properties::distinct_locations(&conn).map_err(store_error)?,
        property_types: properties::distinct_types(&conn).map_err(store_error)?,
    };
    Ok(json_response(StatusCode::OK, &body))
}

pub(crate) async fn featured_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let result = featured_inner(&state, &raw).await;
    finish(
        &state,
        "/api/properties/featured",
        started,
        &request_id,
        result,
    )
    .await
}

async fn featured_inner(
    state: &AppState,
    raw: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let limit = params::parse_featured_limit(&to_parse_map(raw))?;
    let conn = state.store.acquire().await.map_err(store_error)?;
    let rows = properties::featured(&conn, limit).map_err(store_error)?;
    let body: Vec<PropertyDto> = rows.into_iter().map(PropertyDto::from).collect();
    Ok(json_response(StatusCode::OK, &body))
}
