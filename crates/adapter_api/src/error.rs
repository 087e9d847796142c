//! Error types for the API adapter.

use targeting_core::types::CoreError;
use thiserror::Error;

/// Fallback message when an error response carries no `message` field.
pub fn generic_status_message(status: u16) -> String {
    format!("Request failed with status {}", status)
}

/// API communication error
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. Displays as the backend's message.
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Backend `message` field, or a generic fallback
        message: String,
    },

    /// Connection, TLS, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request body could not be encoded
    #[error("Could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A record failed validation at the boundary
    #[error("Invalid {entity} record: {reason}")]
    Schema {
        /// Record type
        entity: &'static str,
        /// What was wrong
        reason: String,
    },

    /// The base URL cannot carry path segments
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),

    /// No CSRF token could be obtained for a mutating request
    #[error("CSRF token unavailable: {0}")]
    Csrf(String),
}

impl ApiError {
    /// Build an HTTP error from a status code and raw response body.
    ///
    /// Uses the body's `message` field when the body is a JSON object
    /// carrying a string message.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| generic_status_message(status));
        Self::Http { status, message }
    }

    /// Create a schema error
    pub fn schema(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::Schema {
            entity,
            reason: reason.into(),
        }
    }

    /// Wrap a domain translation error
    pub fn from_core(entity: &'static str, err: CoreError) -> Self {
        Self::schema(entity, err.to_string())
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_taken_from_body() {
        let err = ApiError::from_response(422, br#"{"message":"Target outside AO"}"#);
        assert_eq!(err.to_string(), "Target outside AO");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_generic_message_for_non_json() {
        let err = ApiError::from_response(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_generic_message_for_non_string_message() {
        let err = ApiError::from_response(400, br#"{"message":{"code":7}}"#);
        assert_eq!(err.to_string(), generic_status_message(400));
    }
}
