//! Error types for Dropbox calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the Dropbox client.
///
/// Provider responses are never reinterpreted: a non-success reply keeps its
/// status and raw body so the caller can hand them back as-is.
#[derive(Debug, Error)]
pub enum DropboxError {
    /// Dropbox answered with a non-success status
    #[error("Dropbox API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    /// The request never produced a response (DNS, TLS, connection reset...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response could not be decoded into the expected shape
    #[error("Failed to decode Dropbox response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DropboxError>;

impl DropboxError {
    /// The provider status, when Dropbox actually answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DropboxError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
