//! # Provenant Token
//!
//! Signed provenance tokens: EdDSA (Ed25519) compact JWS encoding and
//! verification, JWK key sets addressable by key id, and a file-backed key
//! store.
//!
//! A token is an immutable signed artifact whose claims commit to a
//! transaction hash. Two tokens are issued per transaction: an *integrity*
//! token and a *signer* token. This crate provides the signing and
//! verification primitives consumed by the dual-token verifier.
//!
//! # Example
//!
//! ```
//! use provenant_token::{sign_claims, verify_token, JwkSet, KeyPair, TokenClaims, TokenRole};
//!
//! let keypair = KeyPair::generate();
//! let claims = TokenClaims::new(
//!     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
//!     "example.com",
//!     TokenRole::Integrity,
//! );
//!
//! let token = sign_claims(&claims, &keypair).expect("signing failed");
//!
//! let keys = JwkSet::from(keypair.public_jwk());
//! let decoded = verify_token(&token, &keys).expect("verification failed");
//! assert_eq!(decoded.claims.hash, claims.hash);
//! ```

mod claims;
mod error;
mod jws;
mod keys;
mod keystore;

pub use claims::*;
pub use error::*;
pub use jws::*;
pub use keys::*;
pub use keystore::*;
