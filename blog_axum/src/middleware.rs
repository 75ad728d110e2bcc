use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use blog_core::CSRF_HEADER_NAME;

use crate::config::ADMIN_LOGIN_URL;
use crate::error::ApiError;
use crate::session::{AdminSession, authorize, require_auth};
use crate::state::AppState;

/// Admin UI paths reachable without a session
const PUBLIC_ADMIN_PREFIXES: &[&str] = &["/admin/assets/"];

// Helper function to add CSRF token to response
fn add_csrf_header(mut response: Response, csrf_token: &str, enabled: bool) -> Response {
    if !enabled {
        return response;
    }

    if let Ok(header_value) = HeaderValue::from_str(csrf_token) {
        response
            .headers_mut()
            .insert(CSRF_HEADER_NAME, header_value);
    } else {
        tracing::error!("Failed to create CSRF header value from token");
    }
    response
}

async fn run_authenticated(
    state: &AppState,
    session: AdminSession,
    mut req: Request,
    next: Next,
) -> Response {
    let csrf_token = session.csrf_token.clone();
    req.extensions_mut().insert(session);
    let response = next.run(req).await;
    add_csrf_header(response, &csrf_token, state.auth.respond_with_csrf_header)
}

/// Gate for `/api/admin`: 401 without a valid session, 403 when a
/// state-changing request lacks the matching CSRF header.
pub async fn is_authenticated_401(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match authorize(req.headers(), req.method(), &state.auth) {
        Ok(session) => run_authenticated(&state, session, req, next).await,
        Err(err) => {
            tracing::debug!("{} {} rejected: {}", req.method(), req.uri().path(), err);
            err.into_response()
        }
    }
}

/// Gate for admin pages: unauthenticated GETs are redirected to the login page.
pub async fn is_authenticated_redirect(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    if path == ADMIN_LOGIN_URL.as_str()
        || PUBLIC_ADMIN_PREFIXES.iter().any(|p| path.starts_with(p))
    {
        return next.run(req).await;
    }

    match require_auth(req.headers(), &state.auth) {
        Ok(session) => run_authenticated(&state, session, req, next).await,
        Err(ApiError::Authentication(_))
            if req.method() == Method::GET || req.method() == Method::HEAD =>
        {
            tracing::debug!("Redirecting to {}", ADMIN_LOGIN_URL.as_str());
            Redirect::temporary(ADMIN_LOGIN_URL.as_str()).into_response()
        }
        Err(err) => err.into_response(),
    }
}
