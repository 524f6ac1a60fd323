//! Error types for cloud API interactions
//!
//! The listing core needs to branch on HTTP status codes (the Compute
//! Engine capability probe treats 403 as "not enabled", everything else
//! as a real failure), so API errors carry their status explicitly.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response from a provider API. The body is sanitized and
    /// truncated before it is stored.
    #[error("API request failed: {status}")]
    Api { status: StatusCode, body: String },

    /// Connection-level failure before any response was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider violated its own documented contract, e.g. returned
    /// an instance outside the state the request filtered for.
    #[error("provider contract violation: {0}")]
    Contract(String),

    /// A list endpoint kept returning continuation tokens past the page
    /// cap and never terminated.
    #[error("pagination did not terminate after {0} pages")]
    PaginationOverflow(usize),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Status code of the underlying API failure, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Format an API error for display in a chat message.
/// Security: avoids leaking raw API payloads or structure details to users.
pub fn user_message(error: &Error) -> String {
    let status = match error.status() {
        Some(status) => status,
        None => {
            return match error {
                Error::Contract(_) => {
                    "The cloud provider returned inconsistent data. Please try again.".to_string()
                }
                Error::PaginationOverflow(_) => {
                    "The listing never finished. Please try again later.".to_string()
                }
                _ => "Request failed. Check your network connection and try again.".to_string(),
            };
        }
    };

    match status.as_u16() {
        401 => "Authentication failed. Please sign in again.".to_string(),
        403 => "Permission denied. Check your cloud IAM permissions.".to_string(),
        404 => "Resource not found.".to_string(),
        429 => "Rate limit exceeded. Please try again later.".to_string(),
        400 => "Invalid request. Check your parameters.".to_string(),
        500 | 503 => "Cloud service temporarily unavailable. Please try again.".to_string(),
        _ => "Request failed. Check your network connection and try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status() {
        let err = Error::Api {
            status: StatusCode::FORBIDDEN,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(Error::Contract("x".into()).status().is_none());
    }

    #[test]
    fn user_messages_do_not_leak_bodies() {
        let err = Error::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "secret-internal-detail".to_string(),
        };
        assert!(!user_message(&err).contains("secret"));
    }
}
