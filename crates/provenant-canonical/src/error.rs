//! Error types for Provenant Canonical

use thiserror::Error;

/// Errors that can occur while converting an input into canonical JSON
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("input is not representable as JSON: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for CanonicalError {
    fn from(err: serde_json::Error) -> Self {
        CanonicalError::Malformed(err.to_string())
    }
}
