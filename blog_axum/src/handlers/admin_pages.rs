use std::path::Path;

use axum::{Router, middleware::from_fn_with_state};
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::is_authenticated_redirect;
use crate::state::AppState;

/// Static admin UI under `/admin`, with unknown paths falling back to the
/// SPA entry point.
pub(crate) fn router(state: AppState, assets_dir: &Path) -> Router<AppState> {
    let index = assets_dir.join("index.html");
    let assets = ServeDir::new(assets_dir).fallback(ServeFile::new(index));

    Router::new()
        .nest_service("/admin", assets)
        .layer(from_fn_with_state(state, is_authenticated_redirect))
}
