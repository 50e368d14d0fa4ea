//! Error type for the auth client

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`crate::AuthClient`]
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend answered with a non-success status
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Credential storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Missing session")]
    MissingSession,
}

impl AuthError {
    /// Build an API error from a failed response body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        AuthError::Api {
            status,
            message: backend_message(body),
        }
    }

    /// The reason supplied by the backend, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            AuthError::Api {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Message to show for a failed action: the backend's reason when present,
    /// otherwise `fallback`. Transport failures always get the fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}

/// Extract the human readable reason from a backend error body.
///
/// The backend reports business failures as `{"error": "..."}` and
/// permission failures as `{"detail": "..."}`.
pub fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "detail"]
        .iter()
        .find_map(|key| {
            value
                .get(*key)
                .and_then(|v| v.as_str())
                .filter(|message| !message.trim().is_empty())
        })
        .map(str::to_string)
}
