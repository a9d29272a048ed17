// src/handlers/mod.rs
use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::middleware;
use crate::AppState;

pub mod campaign;
pub mod progress;
pub mod ui;

/// Every route of the studio with logging, CORS and shared state attached
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(ui::ui_routes())
        .merge(campaign::campaign_routes())
        .merge(progress::progress_routes())
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
