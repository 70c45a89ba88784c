//! Ed25519 keypairs and JWK key sets.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::TokenError;

const OKP_KEY_TYPE: &str = "OKP";
const ED25519_CURVE: &str = "Ed25519";

/// Signature algorithm carried in token headers and JWKs.
pub const EDDSA_ALG: &str = "EdDSA";

/// A JSON Web Key holding an Ed25519 key.
///
/// Public keys carry only `x`; private keys additionally carry the seed `d`.
/// Both members are base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub crv: String,

    /// Public key bytes
    pub x: String,

    /// Private seed bytes (never published)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    /// Key identifier used to select this key at verification time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
}

impl Jwk {
    /// Decode the public half into a verifying key.
    pub fn verifying_key(&self) -> Result<VerifyingKey, TokenError> {
        if self.kty != OKP_KEY_TYPE || self.crv != ED25519_CURVE {
            return Err(TokenError::InvalidKey(format!(
                "expected {}/{} key, got {}/{}",
                OKP_KEY_TYPE, ED25519_CURVE, self.kty, self.crv
            )));
        }

        let bytes = decode_key_member(&self.x)?;
        VerifyingKey::from_bytes(&bytes)
            .map_err(|e| TokenError::InvalidKey(format!("invalid public key: {}", e)))
    }

    /// Strip the private seed, leaving the publishable half.
    pub fn to_public(&self) -> Jwk {
        Jwk {
            d: None,
            ..self.clone()
        }
    }
}

/// A set of JWKs addressable by key id, the `{"keys": [...]}` document
/// published in a well-known key directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }

    /// Look up a key by its `kid`.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

impl From<Jwk> for JwkSet {
    fn from(key: Jwk) -> Self {
        Self { keys: vec![key] }
    }
}

/// Ed25519 keypair for issuing provenance tokens.
pub struct KeyPair {
    signing_key: SigningKey,
    kid: String,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose seed material in logs
        f.debug_struct("KeyPair").field("kid", &self.kid).finish()
    }
}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Create a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Import a keypair from a private JWK (must carry `d`).
    pub fn from_jwk(jwk: &Jwk) -> Result<Self, TokenError> {
        if jwk.kty != OKP_KEY_TYPE || jwk.crv != ED25519_CURVE {
            return Err(TokenError::InvalidKey(format!(
                "expected {}/{} key, got {}/{}",
                OKP_KEY_TYPE, ED25519_CURVE, jwk.kty, jwk.crv
            )));
        }

        let seed_b64 = jwk
            .d
            .as_deref()
            .ok_or_else(|| TokenError::InvalidKey("JWK has no private member 'd'".to_string()))?;
        let seed = decode_key_member(seed_b64)?;

        let pair = Self::from_seed(&seed);

        // A kid stamped in the JWK wins over the derived one
        if let Some(kid) = &jwk.kid {
            return Ok(Self {
                kid: kid.clone(),
                ..pair
            });
        }
        Ok(pair)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let kid = derive_kid(&signing_key.verifying_key());
        Self { signing_key, kid }
    }

    /// Key identifier embedded in token headers.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// The public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Export the publishable JWK.
    pub fn public_jwk(&self) -> Jwk {
        Jwk {
            kty: OKP_KEY_TYPE.to_string(),
            crv: ED25519_CURVE.to_string(),
            x: B64.encode(self.signing_key.verifying_key().to_bytes()),
            d: None,
            kid: Some(self.kid.clone()),
            alg: Some(EDDSA_ALG.to_string()),
            key_use: Some("sig".to_string()),
        }
    }

    /// Export the full private JWK (keep this secret).
    pub fn private_jwk(&self) -> Jwk {
        Jwk {
            d: Some(B64.encode(self.signing_key.to_bytes())),
            ..self.public_jwk()
        }
    }

    /// Sign arbitrary bytes, returning the raw 64-byte signature.
    pub(crate) fn sign_bytes(&self, data: &[u8]) -> [u8; 64] {
        self.signing_key.sign(data).to_bytes()
    }
}

/// Verify a raw Ed25519 signature over data.
pub(crate) fn verify_bytes(
    key: &VerifyingKey,
    data: &[u8],
    signature: &[u8; 64],
) -> Result<(), TokenError> {
    let signature = Signature::from_bytes(signature);
    key.verify(data, &signature)
        .map_err(|_| TokenError::InvalidSignature("signature verification failed".to_string()))
}

/// Derive a key id from the public key: hex of the first 8 bytes of its
/// SHA256 digest.
fn derive_kid(key: &VerifyingKey) -> String {
    let digest = Sha256::digest(key.to_bytes());
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode a base64url JWK member into a fixed 32-byte array.
fn decode_key_member(encoded: &str) -> Result<[u8; 32], TokenError> {
    let bytes = B64
        .decode(encoded)
        .map_err(|e| TokenError::InvalidKey(format!("invalid base64url: {}", e)))?;

    if bytes.len() != 32 {
        return Err(TokenError::InvalidKey(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }

    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let kp1 = KeyPair::generate();
        let kp2 = KeyPair::generate();

        // Different keypairs should have different public keys
        assert_ne!(kp1.public_jwk().x, kp2.public_jwk().x);
        assert_ne!(kp1.kid(), kp2.kid());
    }

    #[test]
    fn test_private_jwk_roundtrip() {
        let kp = KeyPair::generate();
        let private = kp.private_jwk();

        let restored = KeyPair::from_jwk(&private).unwrap();
        assert_eq!(restored.public_jwk(), kp.public_jwk());
        assert_eq!(restored.kid(), kp.kid());
    }

    #[test]
    fn test_public_jwk_has_no_seed() {
        let kp = KeyPair::generate();
        assert!(kp.public_jwk().d.is_none());
        assert!(kp.private_jwk().d.is_some());
    }

    #[test]
    fn test_public_jwk_cannot_sign() {
        let kp = KeyPair::generate();
        let public = kp.public_jwk();

        let result = KeyPair::from_jwk(&public);
        assert!(matches!(result, Err(TokenError::InvalidKey(_))));
    }

    #[test]
    fn test_kid_format() {
        let kp = KeyPair::generate();
        let kid = kp.kid();

        assert_eq!(kid.len(), 16);
        assert!(kid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_jwk_set_find() {
        let kp1 = KeyPair::generate();
        let kp2 = KeyPair::generate();

        let set = JwkSet::new(vec![kp1.public_jwk(), kp2.public_jwk()]);

        assert_eq!(set.find(kp1.kid()), Some(&kp1.public_jwk()));
        assert_eq!(set.find(kp2.kid()), Some(&kp2.public_jwk()));
        assert_eq!(set.find("missing"), None);
    }

    #[test]
    fn test_verifying_key_rejects_wrong_curve() {
        let mut jwk = KeyPair::generate().public_jwk();
        jwk.crv = "P-256".to_string();

        assert!(matches!(
            jwk.verifying_key(),
            Err(TokenError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_verifying_key_rejects_truncated_material() {
        let mut jwk = KeyPair::generate().public_jwk();
        jwk.x = B64.encode([0u8; 16]);

        assert!(matches!(
            jwk.verifying_key(),
            Err(TokenError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_seed_determinism() {
        let seed = [7u8; 32];
        let kp1 = KeyPair::from_seed(&seed);
        let kp2 = KeyPair::from_seed(&seed);

        assert_eq!(kp1.public_jwk(), kp2.public_jwk());
    }
}
