//! HTTP API routes for the Studio engine
//!
//! The editing UI talks to the engine through these endpoints; everything is
//! plain JSON over REST, with the status endpoint as the UI's poll target.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

pub mod session;

use crate::app_state::AppState;

#[derive(Clone)]
pub struct ApiState {
    pub app_state: Arc<AppState>,
}

/// Configure all API routes
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/sites/{site_id}/session",
            get(session::get_session).delete(session::close_session),
        )
        .route("/sites/{site_id}/content", patch(session::edit_content_field))
        .route("/sites/{site_id}/brand", patch(session::edit_brand_field))
        .route("/sites/{site_id}/layout", put(session::set_layout))
        .route("/sites/{site_id}/undo", post(session::undo))
        .route("/sites/{site_id}/instruct", post(session::instruct))
        .route("/sites/{site_id}/status", get(session::get_status))
        .route(
            "/sites/{site_id}/preview/refresh",
            post(session::refresh_preview),
        )
}

/// Health check endpoint
pub async fn health_check(State(_state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "siteloom-studio",
            "version": "0.1.0"
        })),
    )
}
