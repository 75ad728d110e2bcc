//! Error type shared by every handler and its JSON response shape

use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use blog_core::{CmsError, ContentError, PaginationError, SessionError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Authentication(String),

    /// Missing or mismatched CSRF token
    #[error("Forbidden: {0}")]
    Csrf(String),

    #[error("Bad request: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Error status relayed from the CMS
    #[error("Upstream error {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Server is missing required setup; the message is safe to show clients
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Csrf(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the client. Internal details are logged, never sent.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal server error");
                "Internal server error".to_string()
            }
            ApiError::Configuration(message) => {
                tracing::error!(error = %message, "Server misconfiguration");
                message.clone()
            }
            ApiError::Authentication(msg)
            | ApiError::Csrf(msg)
            | ApiError::Validation(msg)
            | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Upstream { message, .. } => message.clone(),
        }
    }

    /// Render as `{error: {message}}`, the shape the AI key check has always used.
    pub fn into_nested_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": { "message": self.public_message() }
        }));
        (status, body).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.public_message()
        }));
        (status, body).into_response()
    }
}

impl From<CmsError> for ApiError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::Status {
                status: 404,
                message,
            } => ApiError::NotFound(message),
            CmsError::Status { status, message } => {
                match StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                {
                    Some(status) => ApiError::Upstream { status, message },
                    None => {
                        tracing::warn!("CMS returned unexpected status {}: {}", status, message);
                        ApiError::Upstream {
                            status: StatusCode::BAD_GATEWAY,
                            message: "Unexpected response from CMS".to_string(),
                        }
                    }
                }
            }
            CmsError::Transport(detail) => {
                tracing::error!(error = %detail, "CMS unreachable");
                ApiError::Upstream {
                    status: StatusCode::BAD_GATEWAY,
                    message: "CMS is unavailable".to_string(),
                }
            }
            CmsError::Decode(detail) => {
                tracing::error!(error = %detail, "Malformed CMS response");
                ApiError::Upstream {
                    status: StatusCode::BAD_GATEWAY,
                    message: "Invalid response from CMS".to_string(),
                }
            }
            CmsError::InvalidInput(msg) => ApiError::Validation(msg),
            CmsError::InvalidUrl(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingSecret => {
                ApiError::Configuration("Session secret is not configured".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        tracing::debug!("{}", err);
        ApiError::NotFound("Page not found".to_string())
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection);
        ApiError::Validation("Invalid request body".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection);
        ApiError::Validation("Invalid query parameters".to_string())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!("Rejected multipart body: {}", rejection);
        ApiError::Validation("Expected a multipart/form-data upload".to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Validation(format!("Invalid upload: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Extract status code and JSON body from a response.
    async fn body_of(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_internal_hides_details() {
        let (status, body) = body_of(
            ApiError::Internal("signing key at /etc/secret failed".to_string()).into_response(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_configuration_is_distinct_500() {
        let (status, body) = body_of(
            ApiError::Configuration("Admin password is not configured".to_string())
                .into_response(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Admin password is not configured");
    }

    #[tokio::test]
    async fn test_auth_and_csrf_statuses() {
        let (status, body) =
            body_of(ApiError::Authentication("Unauthorized".to_string()).into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let (status, _) =
            body_of(ApiError::Csrf("Invalid CSRF token".to_string()).into_response()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_nested_shape() {
        let (status, body) = body_of(
            ApiError::Validation("API key is required".to_string()).into_nested_response(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": {"message": "API key is required"}}));
    }

    #[test]
    fn test_from_cms_error() {
        assert!(matches!(
            ApiError::from(CmsError::not_found("Article not found")),
            ApiError::NotFound(_)
        ));
        assert_eq!(
            ApiError::from(CmsError::Status {
                status: 409,
                message: "taken".to_string()
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(CmsError::Transport("connection refused".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(CmsError::Status {
                status: 302,
                message: "moved".to_string()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert!(matches!(
            ApiError::from(CmsError::InvalidInput("Title is required".to_string())),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn test_from_session_error() {
        assert!(matches!(
            ApiError::from(SessionError::MissingSecret),
            ApiError::Configuration(_)
        ));
        assert!(matches!(
            ApiError::from(SessionError::Crypto("x".to_string())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_from_pagination_error() {
        let err = PaginationError::PageOutOfRange {
            page: 9,
            total_pages: 2,
        };
        assert_eq!(ApiError::from(err).status(), StatusCode::NOT_FOUND);
    }
}
