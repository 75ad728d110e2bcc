use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use blog_core::{
    Article, ArticleInput, ArticleQuery, ArticleStatus, PageItem, PaginationError, page_window,
    total_pages,
};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_ADMIN_PAGE_SIZE: u32 = 20;
const MAX_ADMIN_PAGE_SIZE: u32 = 100;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list).post(create))
        .route("/articles/{id}", get(show).put(update).delete(remove))
        .route("/articles/{id}/publish", post(publish))
        .route("/articles/{id}/unpublish", post(unpublish))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page: Option<u32>,
    page_size: Option<u32>,
    status: Option<ArticleStatus>,
    q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticlePage {
    items: Vec<Article>,
    total: usize,
    page: u32,
    page_size: u32,
    total_pages: u32,
    window: Vec<PageItem>,
}

async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ArticlePage>, ApiError> {
    let Query(params) = params?;
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(PaginationError::PageOutOfRange {
            page,
            total_pages: 0,
        }
        .into());
    }
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_ADMIN_PAGE_SIZE)
        .clamp(1, MAX_ADMIN_PAGE_SIZE);

    let query = ArticleQuery {
        page: Some(page),
        page_size: Some(page_size),
        status: params.status,
        search: params.q.filter(|q| !q.trim().is_empty()),
        ..Default::default()
    };
    let list = state.cms.list_articles(&query).await?;
    let total_pages = total_pages(list.total, page_size);
    if page > total_pages.max(1) {
        return Err(PaginationError::PageOutOfRange { page, total_pages }.into());
    }

    Ok(Json(ArticlePage {
        items: list.items,
        total: list.total,
        page,
        page_size,
        total_pages,
        window: page_window(page, total_pages),
    }))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.cms.get_article(&id).await?))
}

async fn create(
    State(state): State<AppState>,
    body: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<Json<Article>, ApiError> {
    let Json(input) = body?;
    input.validate_for_create()?;

    let article = state.cms.create_article(&input).await?;
    tracing::info!("Created article {}", article.id);
    Ok(Json(article))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<Json<Article>, ApiError> {
    let Json(input) = body?;
    let article = state.cms.update_article(&id, &input).await?;
    tracing::info!("Updated article {}", article.id);
    Ok(Json(article))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.cms.delete_article(&id).await?;
    tracing::info!("Deleted article {}", id);
    Ok(Json(json!({ "success": true })))
}

async fn publish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(
        state
            .cms
            .set_article_status(&id, ArticleStatus::Published)
            .await?,
    ))
}

async fn unpublish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(
        state
            .cms
            .set_article_status(&id, ArticleStatus::Draft)
            .await?,
    ))
}
