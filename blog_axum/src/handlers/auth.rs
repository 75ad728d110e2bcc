//! Login, logout and session bootstrap for the admin UI

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use blog_core::{CSRF_HEADER_NAME, SessionCookie, verify_password};

use crate::error::ApiError;
use crate::session::AdminSession;
use crate::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    password: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;

    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("Password is required".to_string()))?;

    let auth = &state.auth;
    let hash = auth.admin_password_hash.as_deref().ok_or_else(|| {
        ApiError::Configuration("Admin password is not configured".to_string())
    })?;

    if !verify_password(&password, hash) {
        tracing::warn!("Admin login failed: wrong password");
        return Err(ApiError::Authentication("Invalid password".to_string()));
    }

    let token = auth.signer.create_session()?;
    let csrf_token = auth.signer.csrf_token_for(&token)?;

    let mut headers = HeaderMap::new();
    SessionCookie::session(&auth.cookies, &token).append_to(&mut headers)?;
    SessionCookie::csrf(&auth.cookies, &csrf_token).append_to(&mut headers)?;
    if auth.respond_with_csrf_header {
        let value = HeaderValue::from_str(&csrf_token)
            .map_err(|e| ApiError::Internal(format!("Invalid CSRF header value: {e}")))?;
        headers.insert(CSRF_HEADER_NAME, value);
    }

    tracing::info!("Admin logged in");
    Ok((headers, Json(json!({ "success": true }))))
}

/// Always succeeds, with or without a session.
async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let mut headers = HeaderMap::new();
    SessionCookie::clear(&state.auth.cookies).append_to(&mut headers)?;
    SessionCookie::clear_csrf(&state.auth.cookies).append_to(&mut headers)?;

    tracing::info!("Admin logged out");
    Ok((headers, Json(json!({ "success": true }))))
}

async fn session(session: Option<AdminSession>) -> impl IntoResponse {
    match session {
        Some(session) => Json(json!({
            "authenticated": true,
            "csrfToken": session.csrf_token,
            "expiresAt": session.claims.expires_at(),
        })),
        None => Json(json!({ "authenticated": false })),
    }
}
