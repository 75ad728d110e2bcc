use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ContentError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("XML error: {0}")]
    Xml(String),
}

impl From<std::io::Error> for ContentError {
    fn from(err: std::io::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for ContentError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Xml(err.to_string())
    }
}
