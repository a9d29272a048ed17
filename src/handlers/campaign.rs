// src/handlers/campaign.rs
//! JSON endpoints driving the two generation phases

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::WorkflowError;
use crate::types::{
    CampaignForm, VideoForm, BUSINESS_TYPES, CAMPAIGN_THEMES, CHARACTER_GENDERS, MAX_SCENES,
};
use crate::workflow::render::DOWNLOAD_PATH;
use crate::AppState;

const DOWNLOAD_FILE_NAME: &str = "final_ai_ad.mp4";

async fn error_response(err: WorkflowError, state: &AppState) -> Response {
    let status = match err {
        WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
        WorkflowError::Busy => StatusCode::CONFLICT,
        WorkflowError::Transport(_) => StatusCode::BAD_GATEWAY,
    };
    let plan = state.orchestrator.render_plan().await;
    (
        status,
        Json(json!({
            "error": err.to_string(),
            "kind": err.kind(),
            "state": plan,
        })),
    )
        .into_response()
}

/// GET /api/state - Render plan for the current session
pub async fn get_state(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(state.orchestrator.render_plan().await)
}

/// GET /api/form - Form defaults and choices
pub async fn get_form_defaults() -> impl IntoResponse {
    Json(json!({
        "campaign": CampaignForm::default(),
        "video": VideoForm::default(),
        "choices": {
            "business_types": BUSINESS_TYPES,
            "campaign_themes": CAMPAIGN_THEMES,
            "character_genders": CHARACTER_GENDERS,
            "max_scenes": MAX_SCENES,
        }
    }))
}

/// POST /api/campaign - Phase 1
pub async fn generate_campaign(
    Extension(state): Extension<Arc<AppState>>,
    Json(form): Json<CampaignForm>,
) -> Response {
    match state.orchestrator.generate_images(form).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => error_response(e, &state).await,
    }
}

/// POST /api/videos - Phase 2
pub async fn generate_videos(
    Extension(state): Extension<Arc<AppState>>,
    Json(form): Json<VideoForm>,
) -> Response {
    match state.orchestrator.generate_videos(form).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => error_response(e, &state).await,
    }
}

/// POST /api/reset - Start over
pub async fn reset_session(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.orchestrator.reset().await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => error_response(e, &state).await,
    }
}

/// GET /api/videos/final/download - Merged video as an attachment
pub async fn download_final_video(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.orchestrator.download_final_video().await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "video/mp4".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(warning) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "warning": warning.to_string() })),
        )
            .into_response(),
    }
}

/// GET /api/status - Health check
pub async fn api_status(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let config = state.orchestrator.config();
    let snapshot = state.orchestrator.snapshot().await;
    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "backend_url": config.base_url,
        "phase": snapshot.phase(),
        "timeouts": {
            "images_secs": config.image_timeout.as_secs(),
            "videos_secs": config.video_timeout.as_secs(),
        }
    }))
}

pub fn campaign_routes() -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/form", get(get_form_defaults))
        .route("/api/campaign", post(generate_campaign))
        .route("/api/videos", post(generate_videos))
        .route("/api/reset", post(reset_session))
        .route(DOWNLOAD_PATH, get(download_final_video))
        .route("/api/status", get(api_status))
}
