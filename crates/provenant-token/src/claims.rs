//! Token claims carried inside a signed provenance token.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Which attestation a token makes about a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenRole {
    /// Issued by the party attesting the data was not altered
    Integrity,
    /// Issued by the party attesting authorization/origin
    Signer,
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenRole::Integrity => write!(f, "integrity"),
            TokenRole::Signer => write!(f, "signer"),
        }
    }
}

/// Claims committed to by a token signature.
///
/// `hash` is the transaction hash the issuer asserts; everything else is
/// audit metadata. Tokens are created once at commitment time and never
/// mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Transaction hash (64-char lowercase hex) asserted by the issuer
    pub hash: String,

    /// Issuer identifier
    pub iss: String,

    /// Token role: "integrity" or "signer"
    pub sub: TokenRole,

    /// Issued-at, Unix seconds
    pub iat: i64,

    /// Unique token id
    pub jti: Uuid,

    /// Additional issuer-defined claims
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Create claims over a transaction hash, stamped with the current time
    /// and a fresh token id.
    pub fn new(hash: impl Into<String>, issuer: impl Into<String>, role: TokenRole) -> Self {
        Self {
            hash: hash.into(),
            iss: issuer.into(),
            sub: role,
            iat: Utc::now().timestamp(),
            jti: Uuid::new_v4(),
            extra: Map::new(),
        }
    }

    /// Attach an additional claim.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
