use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, request::Parts},
};

use blog_core::{
    CSRF_HEADER_NAME, SessionClaims, cookie_value, is_state_changing, verify_csrf_token,
};

use crate::error::ApiError;
use crate::state::{AppState, AuthConfig};

/// A verified admin session, available as an Axum extractor
///
/// As an extractor it always checks the session cookie, and additionally
/// requires a matching `X-CSRF-Token` header for POST, PUT, PATCH and DELETE.
#[derive(Clone, Debug)]
pub struct AdminSession {
    pub claims: SessionClaims,
    /// CSRF token bound to this session
    pub csrf_token: String,
}

/// Reject unless the request carries a valid, unexpired session cookie.
pub fn require_auth(headers: &HeaderMap, auth: &AuthConfig) -> Result<AdminSession, ApiError> {
    let token = cookie_value(headers, &auth.cookies.session_name)
        .map_err(|e| {
            tracing::debug!("Unreadable cookie header: {}", e);
            ApiError::Authentication("Unauthorized".to_string())
        })?
        .ok_or_else(|| {
            tracing::debug!("No session cookie");
            ApiError::Authentication("Unauthorized".to_string())
        })?;

    let claims = auth.signer.session_claims(token).ok_or_else(|| {
        tracing::debug!("Invalid or expired session token");
        ApiError::Authentication("Unauthorized".to_string())
    })?;

    let csrf_token = auth.signer.csrf_token_for(token)?;
    Ok(AdminSession { claims, csrf_token })
}

/// `require_auth` plus a matching `X-CSRF-Token` header.
pub fn require_auth_with_csrf(
    headers: &HeaderMap,
    auth: &AuthConfig,
) -> Result<AdminSession, ApiError> {
    let session = require_auth(headers, auth)?;

    let supplied = headers
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok());
    if !verify_csrf_token(&session.csrf_token, supplied) {
        tracing::warn!(
            "CSRF check failed: header {}",
            if supplied.is_some() { "mismatched" } else { "missing" }
        );
        return Err(ApiError::Csrf("Invalid CSRF token".to_string()));
    }

    Ok(session)
}

/// Dispatch on method: state-changing requests also need the CSRF header.
pub(crate) fn authorize(
    headers: &HeaderMap,
    method: &http::Method,
    auth: &AuthConfig,
) -> Result<AdminSession, ApiError> {
    if is_state_changing(method) {
        require_auth_with_csrf(headers, auth)
    } else {
        require_auth(headers, auth)
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AdminSession>() {
            return Ok(session.clone());
        }
        authorize(&parts.headers, &parts.method, &state.auth)
    }
}

impl OptionalFromRequestParts<AppState> for AdminSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(require_auth(&parts.headers, &state.auth).ok())
    }
}
