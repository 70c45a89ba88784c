//! The dual-token verifier.

use async_trait::async_trait;
use provenant_canonical::{constant_time_compare, hash_canonical};
use provenant_token::{verify_token, JwkSet, TokenClaims, TokenError};
use serde::Serialize;
use tracing::debug;

use crate::error::{TokenSlot, VerifyError};
use crate::keysource::KeySource;

/// Signature-verification capability consumed by the verifier.
///
/// Kept as a seam so any compliant token implementation can be substituted;
/// implementations may suspend (e.g., resolving key material remotely).
/// The default is [`Ed25519Verifier`].
#[async_trait]
pub trait VerifyCapability: Send + Sync {
    /// Verify a token against a key set and return its decoded claims, or
    /// fail with the specific [`TokenError`].
    async fn verify(&self, token: &str, keys: &JwkSet) -> Result<TokenClaims, TokenError>;
}

/// Default capability: EdDSA compact tokens checked in-process.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Verifier;

#[async_trait]
impl VerifyCapability for Ed25519Verifier {
    async fn verify(&self, token: &str, keys: &JwkSet) -> Result<TokenClaims, TokenError> {
        verify_token(token, keys).map(|decoded| decoded.claims)
    }
}

/// Result of a successful verification: the recomputed hash and both
/// decoded token payloads. Created fresh per call; failures are reported
/// through [`VerifyError`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// The independently recomputed transaction hash both tokens commit to
    pub hash: String,
    pub integrity: TokenClaims,
    pub signer: TokenClaims,
}

/// Stateless, re-entrant dual-token verifier.
///
/// Holds only the signature-verification capability; every call runs the
/// full five-check sequence from scratch.
#[derive(Debug, Clone, Default)]
pub struct DualTokenVerifier<C = Ed25519Verifier> {
    capability: C,
}

impl DualTokenVerifier {
    /// Verifier using the in-process EdDSA capability.
    pub fn new() -> Self {
        Self {
            capability: Ed25519Verifier,
        }
    }
}

impl<C: VerifyCapability> DualTokenVerifier<C> {
    /// Verifier delegating signature checks to a custom capability.
    pub fn with_capability(capability: C) -> Self {
        Self { capability }
    }

    /// Run the five ordered checks against a record and its two tokens.
    ///
    /// Short-circuits on the first failure; the hash-binding comparisons
    /// never start until both signature verifications have completed.
    pub async fn verify<T: Serialize>(
        &self,
        record: &T,
        integrity_token: &str,
        signer_token: &str,
        integrity_keys: &JwkSet,
        signer_keys: &JwkSet,
    ) -> Result<Verification, VerifyError> {
        // 1. Recompute the transaction hash from the supplied record
        let expected = hash_canonical(record)?;
        debug!(hash = %expected, "recomputed transaction hash");

        // 2. Integrity token signature
        let integrity = self
            .capability
            .verify(integrity_token, integrity_keys)
            .await
            .map_err(|source| VerifyError::SignatureInvalid {
                which: TokenSlot::Integrity,
                source,
            })?;
        debug!(jti = %integrity.jti, "integrity token signature verified");

        // 3. Signer token signature
        let signer = self
            .capability
            .verify(signer_token, signer_keys)
            .await
            .map_err(|source| VerifyError::SignatureInvalid {
                which: TokenSlot::Signer,
                source,
            })?;
        debug!(jti = %signer.jti, "signer token signature verified");

        // 4. Each token's hash claim must equal the recomputed hash
        if !constant_time_compare(&integrity.hash, &expected) {
            return Err(VerifyError::HashMismatch {
                which: TokenSlot::Integrity,
                expected,
                actual: integrity.hash,
            });
        }
        if !constant_time_compare(&signer.hash, &expected) {
            return Err(VerifyError::HashMismatch {
                which: TokenSlot::Signer,
                expected,
                actual: signer.hash,
            });
        }

        // 5. Both tokens must assert the same hash. Implied by the two
        // checks above, but kept as an independent guard on the invariant
        // that both tokens commit to the same fact.
        if integrity.hash != signer.hash {
            return Err(VerifyError::CrossTokenMismatch {
                integrity_hash: integrity.hash,
                signer_hash: signer.hash,
            });
        }

        debug!(hash = %expected, "dual-token verification succeeded");
        Ok(Verification {
            hash: expected,
            integrity,
            signer,
        })
    }

    /// Resolve both key sets from their sources, then verify.
    pub async fn verify_with_sources<T, I, S>(
        &self,
        record: &T,
        integrity_token: &str,
        signer_token: &str,
        integrity_source: &I,
        signer_source: &S,
    ) -> Result<Verification, VerifyError>
    where
        T: Serialize,
        I: KeySource + ?Sized,
        S: KeySource + ?Sized,
    {
        let integrity_keys = integrity_source.fetch().await?;
        let signer_keys = signer_source.fetch().await?;

        self.verify(
            record,
            integrity_token,
            signer_token,
            &integrity_keys,
            &signer_keys,
        )
        .await
    }
}

/// Verify a record against its two tokens with the default capability.
///
/// The exposed one-call surface of the protocol; see
/// [`DualTokenVerifier::verify`] for the check sequence.
pub async fn verify_dual_token<T: Serialize>(
    record: &T,
    integrity_token: &str,
    signer_token: &str,
    integrity_keys: &JwkSet,
    signer_keys: &JwkSet,
) -> Result<Verification, VerifyError> {
    DualTokenVerifier::new()
        .verify(
            record,
            integrity_token,
            signer_token,
            integrity_keys,
            signer_keys,
        )
        .await
}
