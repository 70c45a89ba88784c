//! # Provenant Canonical
//!
//! Deterministic JSON serialization and hashing for the Provenant dual-token
//! provenance protocol.
//!
//! This crate provides:
//! - Canonical JSON serialization with sorted keys
//! - The `canonicalize` value transform (recursive key reordering)
//! - SHA256 transaction hashing over the canonical bytes
//!
//! ## Canonical JSON Rules
//!
//! 1. Object keys sorted lexicographically by UTF-8 bytes at every depth
//! 2. Arrays preserve insertion order
//! 3. No whitespace
//! 4. UTF-8 encoding
//! 5. Integers rendered as plain decimals; finite doubles rendered as the
//!    shortest decimal that round-trips (serde_json's Ryu formatting)
//!
//! Two records that differ only in object key order therefore hash
//! identically, while any change to a value, key name, nesting, or array
//! order produces a different hash.
//!
//! ## Example
//!
//! ```rust
//! use provenant_canonical::{to_canonical_json_string, hash_deterministic_json};
//!
//! let value = serde_json::json!({"b": 2, "a": 1});
//! let canonical = to_canonical_json_string(&value).unwrap();
//! assert_eq!(canonical, r#"{"a":1,"b":2}"#);
//!
//! let hash = hash_deterministic_json(&value);
//! assert_eq!(hash, hash_deterministic_json(&serde_json::json!({"a": 1, "b": 2})));
//! ```
//!
//! ## Number Stability
//!
//! Cross-platform hash agreement hinges on one fixed number-to-text rule.
//! This crate uses serde_json's: values in i64/u64 range print as plain
//! decimal integers, finite doubles print as the shortest round-trippable
//! decimal. `serde_json::Value` cannot hold non-finite numbers, so records
//! built as JSON values are well-formed by construction; a `Serialize` type
//! that fails conversion is rejected with [`CanonicalError`] rather than
//! coerced.

mod canonical;
mod error;
mod hash;

pub use canonical::*;
pub use error::*;
pub use hash::*;
