//! Combined router for the public site API, the admin API and the admin UI

use std::path::Path;

use axum::{Router, middleware::from_fn_with_state};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ADMIN_ASSETS_DIR;
use crate::handlers::{admin_pages, ai, api_key, articles, auth, images, public, settings, taxonomy};
use crate::middleware::is_authenticated_401;
use crate::state::AppState;

/// Everything under `/api/admin`. Reads need a session; writes also need
/// the CSRF header.
fn admin_api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(articles::router())
        .merge(taxonomy::admin_router())
        .merge(settings::router())
        .merge(images::admin_router())
        .merge(api_key::router())
        .merge(ai::admin_router())
        .route_layer(from_fn_with_state(state.clone(), is_authenticated_401))
}

fn api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin_api_router(state))
        .merge(public::api_router())
        .merge(taxonomy::public_router())
        .merge(ai::public_router())
}

/// Create the full application router without HTTP tracing
pub fn blog_router_no_trace(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router(&state))
        .merge(images::public_router())
        .merge(public::feed_router())
        .merge(admin_pages::router(
            state.clone(),
            Path::new(ADMIN_ASSETS_DIR.as_str()),
        ))
        .with_state(state)
}

/// Create the full application router
///
/// Routes:
/// - `/api/auth/...` login, logout and session bootstrap
/// - `/api/posts`, `/api/tags`, `/api/categories`, `/api/ai/...` public API
/// - `/api/admin/...` admin API behind the session and CSRF gate
/// - `/images/...`, `/feed.xml`, `/sitemap.xml` public files
/// - `/admin/...` admin UI, redirecting to the login page without a session
pub fn blog_router(state: AppState) -> Router {
    blog_router_no_trace(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}
