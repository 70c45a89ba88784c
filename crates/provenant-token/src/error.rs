//! Error types for Provenant Token

use thiserror::Error;

/// Errors raised while signing tokens, verifying tokens, or handling keys
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unknown key id: {0}")]
    UnknownKeyId(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Key store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
