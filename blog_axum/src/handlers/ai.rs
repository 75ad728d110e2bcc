//! Pass-through to the CMS-hosted AI writing assistant

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;

use blog_core::AiTask;

use crate::error::ApiError;
use crate::state::AppState;

/// Routes reachable without a session.
pub(crate) fn public_router() -> Router<AppState> {
    Router::new()
        .route("/ai/metadata", post(metadata))
        .route("/ai/review", post(review))
        .route("/ai/status", get(status))
        .route("/ai/test-key", post(test_key))
}

pub(crate) fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/ai/outline", post(outline))
        .route("/ai/continue", post(continue_writing))
        .route("/ai/transform", post(transform))
}

async fn forward(
    state: &AppState,
    task: AiTask,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = body?;
    if !payload.is_object() {
        return Err(ApiError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    }

    tracing::debug!("Forwarding AI {} request", task.path());
    Ok(Json(state.cms.ai(task, payload).await?))
}

async fn metadata(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    forward(&state, AiTask::Metadata, body).await
}

async fn review(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    forward(&state, AiTask::Review, body).await
}

async fn status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.cms.ai(AiTask::Status, Value::Null).await?))
}

/// Errors here use `{error: {message}}` rather than `{error}`; clients depend on it.
async fn test_key(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match forward(&state, AiTask::TestKey, body).await {
        Ok(json) => json.into_response(),
        Err(err) => err.into_nested_response(),
    }
}

async fn outline(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    forward(&state, AiTask::Outline, body).await
}

async fn continue_writing(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    forward(&state, AiTask::Continue, body).await
}

async fn transform(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    forward(&state, AiTask::Transform, body).await
}
