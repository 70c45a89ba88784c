//! # Provenant Verify
//!
//! The dual-token verification protocol: given a transaction record and two
//! signed tokens (integrity and signer), recompute the record's canonical
//! hash and confirm both tokens commit to that exact hash.
//!
//! Five ordered checks, short-circuiting on the first failure:
//!
//! 1. Recompute the transaction hash from the record
//! 2. Verify the integrity token signature against the integrity key set
//! 3. Verify the signer token signature against the signer key set
//! 4. Confirm each token's `hash` claim equals the recomputed hash
//! 5. Confirm both tokens assert the same hash
//!
//! Every failure carries exactly one [`VerifyError`] kind with the concrete
//! values involved; there is no generic "verification failed".
//!
//! # Example
//!
//! ```
//! use provenant_token::{sign_claims, JwkSet, KeyPair, TokenClaims, TokenRole};
//! use provenant_verify::verify_dual_token;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let record = serde_json::json!({"amount": 5000, "status": "paid"});
//! let hash = provenant_canonical::hash_deterministic_json(&record);
//!
//! let integrity_key = KeyPair::generate();
//! let signer_key = KeyPair::generate();
//!
//! let integrity_token = sign_claims(
//!     &TokenClaims::new(&hash, "uhp.example", TokenRole::Integrity),
//!     &integrity_key,
//! ).unwrap();
//! let signer_token = sign_claims(
//!     &TokenClaims::new(&hash, "uhp.example", TokenRole::Signer),
//!     &signer_key,
//! ).unwrap();
//!
//! let verification = verify_dual_token(
//!     &record,
//!     &integrity_token,
//!     &signer_token,
//!     &JwkSet::from(integrity_key.public_jwk()),
//!     &JwkSet::from(signer_key.public_jwk()),
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(verification.hash, hash);
//! # }
//! ```

mod error;
mod keysource;
mod verifier;

pub use error::*;
pub use keysource::*;
pub use verifier::*;
