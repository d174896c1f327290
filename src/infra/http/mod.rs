//! HTTP surface: the content lifecycle webhook and the admin API.

mod error;
mod handlers;
mod middleware;

pub use error::{ApiError, ApiErrorBody, ApiErrorMessage};

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

use crate::application::dispatcher::PurgeDispatcher;
use crate::application::history::HistoryService;
use crate::application::settings::EdgeSettingsService;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AdminState {
    pub dispatcher: Arc<PurgeDispatcher>,
    pub history: HistoryService,
    pub settings: EdgeSettingsService,
    pub admin_token: Option<String>,
}

/// Assemble the full router: an open health probe plus token-gated webhook
/// and admin routes.
pub fn build_router(state: AdminState) -> Router {
    let guarded = Router::new()
        .route("/hooks/content-status", post(handlers::content_status))
        .route("/admin/purge/url", post(handlers::purge_url))
        .route("/admin/purge/all", post(handlers::purge_all))
        .route("/admin/history", get(handlers::history_list))
        .route("/admin/history/clear", post(handlers::history_clear))
        .route(
            "/admin/settings",
            get(handlers::settings_show).put(handlers::settings_update),
        )
        .layer(from_fn_with_state(state.clone(), middleware::require_admin_token));

    Router::new()
        .route("/healthz", get(handlers::health))
        .merge(guarded)
        .with_state(state)
}
