#![forbid(unsafe_code)]
//! HTTP surface for the makazi catalog: route table, shared state, the
//! session gate, and the best-effort inquiry notifier.

mod auth;
mod config;
mod http;
mod metrics;
mod notify;

pub use auth::{hash_password, require_admin, verify_password, AdminIdentity};
pub use config::{validate_startup_config, ApiConfig};
pub use metrics::RequestMetrics;
pub use notify::{InquiryNotifier, NoopNotifier, NotifyError, WebhookNotifier};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post, put};
use axum::Router;
use chrono::Utc;
use makazi_store::{sessions, StorePool};
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use tracing::warn;

pub const CRATE_NAME: &str = "makazi-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StorePool>,
    pub api: ApiConfig,
    pub notifier: Arc<dyn InquiryNotifier>,
    pub metrics: Arc<RequestMetrics>,
    pub request_id_seed: Arc<AtomicU64>,
    pub ready: Arc<AtomicBool>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<StorePool>, api: ApiConfig, notifier: Arc<dyn InquiryNotifier>) -> Self {
        Self {
            store,
            api,
            notifier,
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Periodically drops expired session rows so the table does not grow
    /// without bound.
    pub fn spawn_session_purge(&self) {
        let store = Arc::clone(&self.store);
        let interval = self.api.session_purge_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match store.acquire().await {
                    Ok(conn) => {
                        if let Err(e) = sessions::purge_expired(&conn, Utc::now()) {
                            warn!(error = %e, "session purge failed");
                        }
                    }
                    Err(e) => warn!(error = %e, "session purge could not acquire connection"),
                }
            }
        });
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route(
            "/api/properties",
            get(http::properties::list_public_handler).post(http::admin::create_property_handler),
        )
        .route(
            "/api/properties/featured",
            get(http::properties::featured_handler),
        )
        .route(
            "/api/properties/filter-options",
            get(http::properties::filter_options_handler),
        )
        .route(
            "/api/properties/admin",
            get(http::admin::list_admin_handler),
        )
        .route(
            "/api/admin/dashboard-stats",
            get(http::admin::dashboard_stats_handler),
        )
        .route(
            "/api/properties/:id",
            get(http::properties::get_property_handler)
                .put(http::admin::update_property_handler)
                .delete(http::admin::delete_property_handler),
        )
        .route(
            "/api/directors",
            get(http::directors::list_directors_handler)
                .post(http::directors::create_director_handler),
        )
        .route(
            "/api/directors/:id",
            put(http::directors::update_director_handler)
                .delete(http::directors::delete_director_handler),
        )
        .route(
            "/api/inquiries",
            get(http::inquiries::list_inquiries_handler)
                .post(http::inquiries::create_inquiry_handler),
        )
        .route(
            "/api/inquiries/:id",
            patch(http::inquiries::update_inquiry_status_handler),
        )
        .route("/api/contact", post(http::inquiries::contact_handler))
        .route("/api/auth/login", post(http::auth_routes::login_handler))
        .route("/api/auth/logout", post(http::auth_routes::logout_handler))
        .route(
            "/api/auth/register",
            post(http::auth_routes::register_handler),
        )
        .route(
            "/api/auth/user",
            get(http::auth_routes::session_user_handler),
        )
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
