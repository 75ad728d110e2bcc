//! Reader-facing listing, article, feed and sitemap endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use blog_core::{
    ArticleSummary, Page, PostDetail, PostFilter, find_published, published_posts, render_rss,
    render_sitemap,
};

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn api_router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/{slug}", get(show_post))
}

pub(crate) fn feed_router() -> Router<AppState> {
    Router::new()
        .route("/feed.xml", get(feed))
        .route("/sitemap.xml", get(sitemap))
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    page: Option<u32>,
    tag: Option<String>,
    category: Option<String>,
    q: Option<String>,
}

async fn list_posts(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<ArticleSummary>>, ApiError> {
    let Query(params) = params?;
    let filter = PostFilter {
        tag: params.tag,
        category: params.category,
        q: params.q,
    };

    let all = state.cms.list_all_published().await?;
    let posts = published_posts(all, &filter);
    let page = Page::from_items(posts, params.page.unwrap_or(1), state.site.page_size)?;

    Ok(Json(page.map(|article| ArticleSummary::new(&article, &state.site))))
}

async fn show_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, ApiError> {
    let all = state.cms.list_all_published().await?;
    let article = find_published(&all, &slug)
        .ok_or_else(|| ApiError::NotFound("Article not found".to_string()))?;
    Ok(Json(PostDetail::new(article, &state.site)))
}

async fn feed(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let all = state.cms.list_all_published().await?;
    let mut posts = published_posts(all, &PostFilter::default());
    posts.truncate(state.site.feed_limit);

    let xml = render_rss(&state.site, &posts)?;
    Ok(([(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")], xml))
}

async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let articles = state.cms.list_all_published().await?;
    let tags = state.cms.list_tags().await?;
    let categories = state.cms.list_categories().await?;

    let xml = render_sitemap(&state.site, &articles, &tags, &categories)?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}
