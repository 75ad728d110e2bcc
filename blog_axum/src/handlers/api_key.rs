use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use blog_core::{ApiKeyStatus, GeneratedApiKey};

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/api-key", get(status))
        .route("/api-key/enable", post(enable))
        .route("/api-key/disable", post(disable))
        .route("/api-key/generate", post(generate))
}

async fn status(State(state): State<AppState>) -> Result<Json<ApiKeyStatus>, ApiError> {
    Ok(Json(state.cms.api_key_status().await?))
}

async fn enable(State(state): State<AppState>) -> Result<Json<ApiKeyStatus>, ApiError> {
    Ok(Json(state.cms.set_api_key_enabled(true).await?))
}

async fn disable(State(state): State<AppState>) -> Result<Json<ApiKeyStatus>, ApiError> {
    Ok(Json(state.cms.set_api_key_enabled(false).await?))
}

async fn generate(State(state): State<AppState>) -> Result<Json<GeneratedApiKey>, ApiError> {
    let generated = state.cms.generate_api_key().await?;
    tracing::info!("Generated a new CMS API key");
    Ok(Json(generated))
}
