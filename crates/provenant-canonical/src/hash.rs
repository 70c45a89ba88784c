//! SHA256 transaction hashing

use crate::canonical::{to_canonical_json, to_canonical_json_value};
use crate::error::CanonicalError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Hash raw bytes with SHA256
///
/// Returns a 64-character lowercase hex string.
///
/// # Example
///
/// ```rust
/// use provenant_canonical::hash_bytes;
///
/// let hash = hash_bytes(b"Hello, world!");
/// assert_eq!(hash.len(), 64);
/// assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    // Convert to lowercase hex
    hex_encode(&result)
}

/// Hash a string with SHA256
///
/// The string is treated as UTF-8 bytes.
pub fn hash_string(s: &str) -> String {
    hash_bytes(s.as_bytes())
}

/// Compute the transaction hash of a JSON value
///
/// Equivalent to hashing the canonical serialization: two values that
/// differ only in object key order produce the same hash. Pure function;
/// no I/O; safe to call concurrently.
///
/// # Example
///
/// ```rust
/// use provenant_canonical::hash_deterministic_json;
///
/// let h1 = hash_deterministic_json(&serde_json::json!({"b": 2, "a": 1}));
/// let h2 = hash_deterministic_json(&serde_json::json!({"a": 1, "b": 2}));
/// assert_eq!(h1, h2);
/// ```
pub fn hash_deterministic_json(value: &serde_json::Value) -> String {
    hash_bytes(&to_canonical_json_value(value))
}

/// Canonicalize and hash any serializable value
///
/// # Errors
///
/// Returns `CanonicalError` if the value cannot be converted to JSON.
///
/// # Example
///
/// ```rust
/// use provenant_canonical::hash_canonical;
///
/// let value = serde_json::json!({"b": 1, "a": 2});
/// let hash = hash_canonical(&value).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn hash_canonical<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let canonical = to_canonical_json(value)?;
    Ok(hash_bytes(&canonical))
}

/// Verify that a hash matches the expected value
///
/// # Example
///
/// ```rust
/// use provenant_canonical::{hash_bytes, verify_hash};
///
/// let data = b"Hello, world!";
/// let hash = hash_bytes(data);
///
/// assert!(verify_hash(data, &hash));
/// assert!(!verify_hash(b"Different data", &hash));
/// ```
pub fn verify_hash(data: &[u8], expected_hash: &str) -> bool {
    let computed = hash_bytes(data);
    constant_time_compare(&computed, expected_hash)
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Convert bytes to lowercase hex string
fn hex_encode(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(hex, "{:02x}", byte).unwrap();
    }
    hex
}

/// Validate a SHA256 hash string format
///
/// Returns `true` if the string is a valid 64-character hex string.
pub fn is_valid_sha256(hash: &str) -> bool {
    hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit())
}
