use thiserror::Error;

/// Errors that can occur while talking to the content service
#[derive(Debug, Error, Clone)]
pub enum CmsError {
    /// The request never produced a response (connection, timeout)
    #[error("CMS request failed: {0}")]
    Transport(String),

    /// The CMS answered with a non-success status
    #[error("CMS returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid CMS response: {0}")]
    Decode(String),

    #[error("Invalid CMS URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CmsError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Status {
            status: 404,
            message: what.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for CmsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for CmsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_helper() {
        let err = CmsError::not_found("Article not found");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "CMS returned 404: Article not found");
    }

    #[test]
    fn test_other_status_is_not_not_found() {
        let err = CmsError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_not_found());
        assert!(!CmsError::Transport("refused".to_string()).is_not_found());
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert!(matches!(CmsError::from(serde_err), CmsError::Decode(_)));
    }
}
