//! Errors surfaced by the record-store client.

use serde_json::Value;
use thiserror::Error;

/// Failure of a client call.
///
/// Backend errors are reported as returned; nothing is retried or translated.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered 404, or a first-item query matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success response, with the backend's error body.
    #[error("backend returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        data: Value,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected record payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),

    #[error("client has not been initialized")]
    NotInitialized,

    #[error("client has already been initialized")]
    AlreadyInitialized,
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}
