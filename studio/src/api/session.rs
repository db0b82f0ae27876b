//! Edit-session API endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use site_types::Layout;

use crate::actors::session::{SessionError, SessionMsg};
use crate::api::ApiState;
use crate::app_state::AppState;

async fn get_session_actor(
    app_state: &Arc<AppState>,
    site_id: &str,
) -> Result<ractor::ActorRef<SessionMsg>, Response> {
    app_state
        .get_or_create_session(site_id.to_string())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": format!("Failed to open session: {e}")
                })),
            )
                .into_response()
        })
}

fn rpc_failed(e: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": format!("Session unavailable: {e}")
        })),
    )
        .into_response()
}

/// Request for a single field edit (content or brand).
#[derive(Debug, Deserialize)]
pub struct FieldEditRequest {
    pub path: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SetLayoutRequest {
    pub layout: Layout,
}

#[derive(Debug, Deserialize)]
pub struct InstructRequest {
    pub instruction: String,
}

/// Full session snapshot for the editor.
pub async fn get_session(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let session = match get_session_actor(&state.app_state, &site_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match ractor::call!(session, |reply| SessionMsg::GetSnapshot { reply }) {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({"success": true, "session": snapshot})),
        )
            .into_response(),
        Err(e) => rpc_failed(e),
    }
}

/// Direct field edit on the Content Document.
pub async fn edit_content_field(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
    Json(req): Json<FieldEditRequest>,
) -> impl IntoResponse {
    let session = match get_session_actor(&state.app_state, &site_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match ractor::call!(session, |reply| SessionMsg::EditContentField {
        path: req.path,
        value: req.value,
        reply,
    }) {
        Ok(()) => (StatusCode::OK, Json(json!({"success": true}))).into_response(),
        Err(e) => rpc_failed(e),
    }
}

/// Brand field edit through the same path machinery.
pub async fn edit_brand_field(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
    Json(req): Json<FieldEditRequest>,
) -> impl IntoResponse {
    let session = match get_session_actor(&state.app_state, &site_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match ractor::call!(session, |reply| SessionMsg::EditBrandField {
        path: req.path,
        value: req.value,
        reply,
    }) {
        Ok(Ok(())) => (StatusCode::OK, Json(json!({"success": true}))).into_response(),
        Ok(Err(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"success": false, "error": e.to_string()})),
        )
            .into_response(),
        Err(e) => rpc_failed(e),
    }
}

pub async fn set_layout(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
    Json(req): Json<SetLayoutRequest>,
) -> impl IntoResponse {
    let session = match get_session_actor(&state.app_state, &site_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match ractor::call!(session, |reply| SessionMsg::SetLayout {
        layout: req.layout,
        reply,
    }) {
        Ok(()) => (StatusCode::OK, Json(json!({"success": true}))).into_response(),
        Err(e) => rpc_failed(e),
    }
}

/// Pop the undo stack. `undone` is false when there was nothing to revert.
pub async fn undo(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let session = match get_session_actor(&state.app_state, &site_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match ractor::call!(session, |reply| SessionMsg::Undo { reply }) {
        Ok(undone) => (
            StatusCode::OK,
            Json(json!({"success": true, "undone": undone})),
        )
            .into_response(),
        Err(e) => rpc_failed(e),
    }
}

/// Run one natural-language instruction through the planner.
pub async fn instruct(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
    Json(req): Json<InstructRequest>,
) -> impl IntoResponse {
    let session = match get_session_actor(&state.app_state, &site_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match ractor::call!(session, |reply| SessionMsg::Instruct {
        instruction: req.instruction,
        reply,
    }) {
        Ok(Ok(report)) => (
            StatusCode::OK,
            Json(json!({"success": true, "report": report})),
        )
            .into_response(),
        Ok(Err(e @ SessionError::InstructionRunning)) => (
            StatusCode::CONFLICT,
            Json(json!({"success": false, "error": e.to_string()})),
        )
            .into_response(),
        Ok(Err(e)) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"success": false, "error": e.to_string()})),
        )
            .into_response(),
        Err(e) => rpc_failed(e),
    }
}

/// Poll target: save status, background tasks, the transient action report,
/// and the current preview URL.
pub async fn get_status(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let session = match get_session_actor(&state.app_state, &site_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match ractor::call!(session, |reply| SessionMsg::GetSnapshot { reply }) {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "save_status": snapshot.save_status,
                "dirty": snapshot.dirty,
                "tasks": snapshot.tasks,
                "report": snapshot.report,
                "preview_url": snapshot.preview_url,
            })),
        )
            .into_response(),
        Err(e) => rpc_failed(e),
    }
}

pub async fn refresh_preview(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let session = match get_session_actor(&state.app_state, &site_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match ractor::call!(session, |reply| SessionMsg::RefreshPreview { reply }) {
        Ok(preview_url) => (
            StatusCode::OK,
            Json(json!({"success": true, "preview_url": preview_url})),
        )
            .into_response(),
        Err(e) => rpc_failed(e),
    }
}

/// Close (discard) the session for a site.
pub async fn close_session(
    Path(site_id): Path<String>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    match state.app_state.close_session(site_id).await {
        Ok(closed) => (
            StatusCode::OK,
            Json(json!({"success": true, "closed": closed})),
        )
            .into_response(),
        Err(e) => rpc_failed(e),
    }
}
