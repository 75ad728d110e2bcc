use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};

use blog_core::Settings;

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/settings", get(show).put(update))
}

async fn show(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    Ok(Json(state.cms.get_settings().await?))
}

async fn update(
    State(state): State<AppState>,
    body: Result<Json<Settings>, JsonRejection>,
) -> Result<Json<Settings>, ApiError> {
    let Json(settings) = body?;
    let updated = state.cms.update_settings(&settings).await?;
    tracing::info!("Updated {} site setting(s)", settings.len());
    Ok(Json(updated))
}
