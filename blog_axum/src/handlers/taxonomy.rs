//! Categories and tags

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use blog_core::{Category, CategoryInput, Tag, TagInput};

use crate::error::ApiError;
use crate::state::AppState;

/// Read-only listings, mounted both publicly and under `/api/admin`.
pub(crate) fn public_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/tags", get(list_tags))
}

pub(crate) fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/reorder", post(reorder_categories))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", put(update_tag).delete(delete_tag))
}

fn require_name(name: Option<&str>) -> Result<(), ApiError> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(()),
        _ => Err(ApiError::Validation("Name is required".to_string())),
    }
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.cms.list_categories().await?))
}

async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(input) = body?;
    require_name(input.name.as_deref())?;
    Ok(Json(state.cms.create_category(&input).await?))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(input) = body?;
    if input.name.is_some() {
        require_name(input.name.as_deref())?;
    }
    Ok(Json(state.cms.update_category(&id, &input).await?))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.cms.delete_category(&id).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
struct ReorderRequest {
    ids: Vec<String>,
}

async fn reorder_categories(
    State(state): State<AppState>,
    body: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let Json(request) = body?;
    if request.ids.is_empty() {
        return Err(ApiError::Validation("ids must not be empty".to_string()));
    }
    Ok(Json(state.cms.reorder_categories(&request.ids).await?))
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.cms.list_tags().await?))
}

async fn create_tag(
    State(state): State<AppState>,
    body: Result<Json<TagInput>, JsonRejection>,
) -> Result<Json<Tag>, ApiError> {
    let Json(input) = body?;
    require_name(input.name.as_deref())?;
    Ok(Json(state.cms.create_tag(&input).await?))
}

async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TagInput>, JsonRejection>,
) -> Result<Json<Tag>, ApiError> {
    let Json(input) = body?;
    if input.name.is_some() {
        require_name(input.name.as_deref())?;
    }
    Ok(Json(state.cms.update_tag(&id, &input).await?))
}

async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.cms.delete_tag(&id).await?;
    Ok(Json(json!({ "success": true })))
}
