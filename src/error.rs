//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// Human-readable message suitable for a transient notification.
    ///
    /// Backend-supplied detail is surfaced verbatim; everything else falls
    /// back to the error's display form.
    pub fn user_message(&self) -> String {
        match self {
            SdkError::Http(e) => e.user_message(),
            SdkError::Validation(msg) | SdkError::Other(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the failure means the stored token is no longer accepted.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SdkError::Http(HttpError::Unauthorized { .. }))
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl HttpError {
    /// Status code for backend-reported failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            HttpError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            HttpError::Api { message, .. } | HttpError::Unauthorized { message } => {
                message.clone()
            }
            #[cfg(feature = "http")]
            HttpError::Network(_) => "Network error - please check your connection".to_string(),
            other => other.to_string(),
        }
    }
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Admin role required")]
    AdminRequired,
}

/// Session persistence errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),
}
