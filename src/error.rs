//! Error types emitted at the library seams.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the AI chat completion / translation endpoint.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    #[error("Failed to connect to API endpoint {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("API request failed with status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Stream error: {0}")]
    Stream(String),
    #[error("API returned an empty response")]
    EmptyResponse,
}

/// Errors from the auth/database backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("Backend request failed with status {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    #[error("Cleanup age of {0} days is out of range")]
    InvalidAge(u32),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    /// The message to show a user: the server's own text for API errors.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors from the local `SQLite` store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("Failed to open local store {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("Corrupt session record {id}: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A user-facing failure carrying a stable code, shown inline by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct FlowError {
    pub code: String,
    pub message: String,
}

impl FlowError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_error_displays_message_only() {
        let err = FlowError::new("token_validation_error", "Invalid or missing reset token");
        assert_eq!(err.to_string(), "Invalid or missing reset token");
        assert_eq!(err.code, "token_validation_error");
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Api {
            status: reqwest::StatusCode::UNAUTHORIZED,
            message: "JWT expired".to_string(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("JWT expired"));
        assert_eq!(err.user_message(), "JWT expired");
    }
}
