//! # Client Error Types
//!
//! Error types for ERP communication.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidBaseUrl │  │  Transport      │  │  Decode                 │ │
//! │  │                 │  │  Status         │  │  UnexpectedShape        │ │
//! │  │                 │  │                 │  │  InvalidToken           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no retry categorization here: the client never
//! retries. The single alternate-value fallbacks (ACTIVE vs SENT on draft
//! save, CANCELLED vs CANCELED on cancel) live in the workflow layer and
//! are not a retry policy.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering ERP communication failures.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL is unusable.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The ERP responded with a non-success status. `message` is extracted
    /// from the response body when possible, otherwise a generic reason.
    #[error("Server responded {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded as JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The response decoded, but no known envelope shape matched.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// The session token is missing a claims segment or the segment is not
    /// valid base64/JSON.
    #[error("Session token is missing or malformed")]
    InvalidToken,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidBaseUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            status: 422,
            message: "customer_id is required".into(),
        };
        assert_eq!(
            err.to_string(),
            "Server responded 422: customer_id is required"
        );
    }
}
