//! Failure taxonomy for dual-token verification.

use provenant_canonical::CanonicalError;
use provenant_token::TokenError;
use std::fmt;
use thiserror::Error;

use crate::keysource::KeySourceError;

/// Which of the two tokens a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSlot {
    Integrity,
    Signer,
}

impl fmt::Display for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSlot::Integrity => write!(f, "integrity"),
            TokenSlot::Signer => write!(f, "signer"),
        }
    }
}

/// Verification failures. Mutually exclusive; the first failing check wins
/// and later checks never run.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Cryptographic verification failed for the named token (bad
    /// signature, unresolvable key id, unsupported algorithm)
    #[error("{which} token signature invalid: {source}")]
    SignatureInvalid {
        which: TokenSlot,
        #[source]
        source: TokenError,
    },

    /// A token's embedded hash claim disagrees with the freshly recomputed
    /// hash: the record was altered after signing, or the wrong record was
    /// supplied
    #[error("{which} token hash mismatch: token asserts {actual}, recomputed {expected}")]
    HashMismatch {
        which: TokenSlot,
        expected: String,
        actual: String,
    },

    /// Both tokens individually valid but asserting different hashes; they
    /// belong to different transactions
    #[error("tokens disagree: integrity token asserts {integrity_hash}, signer token asserts {signer_hash}")]
    CrossTokenMismatch {
        integrity_hash: String,
        signer_hash: String,
    },

    /// The supplied record is not serializable JSON
    #[error("malformed input: {0}")]
    MalformedInput(#[from] CanonicalError),

    /// A public key set could not be obtained
    #[error("key source error: {0}")]
    KeySource(#[from] KeySourceError),
}
