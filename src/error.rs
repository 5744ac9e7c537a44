// src/error.rs
//! Failure taxonomy for everything that talks to the backend.
//!
//! The collection pipeline itself is total and never produces these; only the
//! fetch and write calls around it do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused, timeout).
    #[error("could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// Rejected on the client before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short text suitable for an alert or snackbar.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network { .. } => {
                "Unable to connect. Check your connection and try again.".to_string()
            }
            ApiError::Backend { message, .. } => message.clone(),
            ApiError::Validation(message) => message.clone(),
            ApiError::Decode { .. } => "The server sent an unexpected response.".to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ApiError::Backend {
            status: 400,
            message: "Title and description are required".to_string(),
        };
        assert_eq!(err.user_message(), "Title and description are required");
        assert_eq!(err.status_code(), Some(400));
    }

    #[test]
    fn test_validation_has_no_status() {
        let err = ApiError::validation("Title is required");
        assert_eq!(err.to_string(), "Title is required");
        assert_eq!(err.status_code(), None);
    }
}
