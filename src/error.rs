//! Error handling for the portal client

use std::fmt;

use pgstay_auth::{AuthError, RecoveryError};
use pgstay_upload::UploadError;
use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for the portal client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication and session errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A password recovery step did not go through
    #[error("{0}")]
    Recovery(#[from] RecoveryError),

    /// Image upload errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create an API error from a failed response body
    pub fn api(status: StatusCode, body: &str) -> Self {
        Error::Api {
            status,
            message: pgstay_auth::backend_message(body),
        }
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The reason supplied by the backend, if any
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Error::Api {
                message: Some(message),
                ..
            } => Some(message),
            Error::Auth(e) => e.backend_message(),
            _ => None,
        }
    }

    /// Message for the user: validation errors speak for themselves, other
    /// failures use the backend's reason when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::Recovery(e) => e.to_string(),
            _ => self.backend_message().unwrap_or(fallback).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let err = Error::api(StatusCode::FORBIDDEN, r#"{"detail": "You do not have permission to perform this action."}"#);
        assert_eq!(
            err.user_message("Error! Please try again."),
            "You do not have permission to perform this action."
        );

        let err = Error::general("connection reset");
        assert_eq!(err.user_message("Error! Please try again."), "Error! Please try again.");

        let err = Error::from(AuthError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "Invalid email or password"}"#,
        ));
        assert_eq!(err.backend_message(), Some("Invalid email or password"));
    }
}
