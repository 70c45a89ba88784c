//! Compact JWS encoding and verification for provenance tokens.
//!
//! A token is `base64url(header).base64url(claims).base64url(signature)`
//! with no padding. The header carries the algorithm and the key id used
//! to select the verification key; the signature covers the first two
//! segments exactly as transmitted.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64, Engine};

use crate::claims::TokenClaims;
use crate::error::TokenError;
use crate::keys::{verify_bytes, JwkSet, KeyPair, EDDSA_ALG};
use serde::{Deserialize, Serialize};

/// Protected token header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signature algorithm; always "EdDSA" for tokens this crate issues
    pub alg: String,

    /// Key identifier resolvable against the issuer's published key set
    pub kid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Header {
    fn new(kid: impl Into<String>) -> Self {
        Self {
            alg: EDDSA_ALG.to_string(),
            kid: kid.into(),
            typ: Some("JWT".to_string()),
        }
    }
}

/// A verified token: its header and decoded claims.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: Header,
    pub claims: TokenClaims,
}

/// Sign claims into a compact token string.
///
/// The header's `kid` is taken from the keypair so verifiers can resolve
/// the matching public key.
///
/// # Errors
///
/// Returns `TokenError::Serialization` if the claims cannot be encoded.
pub fn sign_claims(claims: &TokenClaims, keypair: &KeyPair) -> Result<String, TokenError> {
    let header = Header::new(keypair.kid());

    let header_b64 = B64.encode(serde_json::to_vec(&header)?);
    let claims_b64 = B64.encode(serde_json::to_vec(claims)?);

    let signing_input = format!("{}.{}", header_b64, claims_b64);
    let signature = keypair.sign_bytes(signing_input.as_bytes());

    Ok(format!("{}.{}", signing_input, B64.encode(signature)))
}

/// Verify a compact token against a key set and decode its claims.
///
/// Checks, in order: token structure, algorithm, key-id resolution,
/// signature, claims decoding. Any failure maps to a specific
/// [`TokenError`] variant; nothing is swallowed.
pub fn verify_token(token: &str, keys: &JwkSet) -> Result<DecodedToken, TokenError> {
    let (header_b64, claims_b64, signature_b64) = split_token(token)?;

    let header: Header = serde_json::from_slice(&decode_segment(header_b64, "header")?)
        .map_err(|e| TokenError::Malformed(format!("invalid header: {}", e)))?;

    if header.alg != EDDSA_ALG {
        return Err(TokenError::UnsupportedAlgorithm(header.alg));
    }

    let jwk = keys
        .find(&header.kid)
        .ok_or_else(|| TokenError::UnknownKeyId(header.kid.clone()))?;
    let verifying_key = jwk.verifying_key()?;

    let signature = decode_signature(signature_b64)?;
    let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
    verify_bytes(&verifying_key, signing_input.as_bytes(), &signature)?;

    let claims: TokenClaims = serde_json::from_slice(&decode_segment(claims_b64, "claims")?)
        .map_err(|e| TokenError::Malformed(format!("invalid claims: {}", e)))?;

    Ok(DecodedToken { header, claims })
}

/// Decode a token's claims without checking its signature.
///
/// For diagnostics only; never feed the result into a trust decision.
pub fn decode_claims_unverified(token: &str) -> Result<TokenClaims, TokenError> {
    let (_, claims_b64, _) = split_token(token)?;
    serde_json::from_slice(&decode_segment(claims_b64, "claims")?)
        .map_err(|e| TokenError::Malformed(format!("invalid claims: {}", e)))
}

fn split_token(token: &str) -> Result<(&str, &str, &str), TokenError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(c), Some(s), None) if !h.is_empty() && !c.is_empty() && !s.is_empty() => {
            Ok((h, c, s))
        }
        _ => Err(TokenError::Malformed(
            "expected three dot-separated segments".to_string(),
        )),
    }
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, TokenError> {
    B64.decode(segment)
        .map_err(|e| TokenError::Malformed(format!("invalid base64url in {}: {}", name, e)))
}

fn decode_signature(segment: &str) -> Result<[u8; 64], TokenError> {
    let bytes = decode_segment(segment, "signature")?;

    if bytes.len() != 64 {
        return Err(TokenError::InvalidSignature(format!(
            "expected 64 signature bytes, got {}",
            bytes.len()
        )));
    }

    let mut out = [0u8; 64];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenRole;

    fn test_claims() -> TokenClaims {
        TokenClaims::new("ab".repeat(32), "uhp.example", TokenRole::Integrity)
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = KeyPair::generate();
        let claims = test_claims();

        let token = sign_claims(&claims, &keypair).unwrap();
        let keys = JwkSet::from(keypair.public_jwk());

        let decoded = verify_token(&token, &keys).unwrap();
        assert_eq!(decoded.claims, claims);
        assert_eq!(decoded.header.alg, EDDSA_ALG);
        assert_eq!(decoded.header.kid, keypair.kid());
    }

    #[test]
    fn test_verify_with_wrong_key_fails() {
        let keypair = KeyPair::generate();
        let other = KeyPair::generate();

        let token = sign_claims(&test_claims(), &keypair).unwrap();
        let wrong_keys = JwkSet::from(other.public_jwk());

        // The kid doesn't resolve in the other party's key set
        assert!(matches!(
            verify_token(&token, &wrong_keys),
            Err(TokenError::UnknownKeyId(_))
        ));
    }

    #[test]
    fn test_verify_with_substituted_key_fails() {
        let keypair = KeyPair::generate();
        let other = KeyPair::generate();

        let token = sign_claims(&test_claims(), &keypair).unwrap();

        // Same kid, different key material
        let mut forged = other.public_jwk();
        forged.kid = Some(keypair.kid().to_string());

        assert!(matches!(
            verify_token(&token, &JwkSet::from(forged)),
            Err(TokenError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_tampered_claims_fail() {
        let keypair = KeyPair::generate();
        let token = sign_claims(&test_claims(), &keypair).unwrap();
        let keys = JwkSet::from(keypair.public_jwk());

        // Re-encode the claims segment with a different hash
        let (header_b64, _, sig_b64) = split_token(&token).unwrap();
        let forged_claims = TokenClaims::new("cd".repeat(32), "uhp.example", TokenRole::Integrity);
        let forged_b64 = B64.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged_token = format!("{}.{}.{}", header_b64, forged_b64, sig_b64);

        assert!(matches!(
            verify_token(&forged_token, &keys),
            Err(TokenError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_corrupted_signature_fails() {
        let keypair = KeyPair::generate();
        let token = sign_claims(&test_claims(), &keypair).unwrap();
        let keys = JwkSet::from(keypair.public_jwk());

        let mut corrupted = token.clone();
        let last = corrupted.pop().unwrap();
        corrupted.push(if last == 'A' { 'B' } else { 'A' });

        let result = verify_token(&corrupted, &keys);
        assert!(matches!(
            result,
            Err(TokenError::InvalidSignature(_)) | Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_unsupported_algorithm_rejected() {
        let keypair = KeyPair::generate();
        let claims = test_claims();

        // Hand-build a token whose header claims a different algorithm
        let header = Header {
            alg: "HS256".to_string(),
            kid: keypair.kid().to_string(),
            typ: Some("JWT".to_string()),
        };
        let header_b64 = B64.encode(serde_json::to_vec(&header).unwrap());
        let claims_b64 = B64.encode(serde_json::to_vec(&claims).unwrap());
        let signing_input = format!("{}.{}", header_b64, claims_b64);
        let signature = B64.encode([0u8; 64]);
        let token = format!("{}.{}", signing_input, signature);

        assert!(matches!(
            verify_token(&token, &JwkSet::from(keypair.public_jwk())),
            Err(TokenError::UnsupportedAlgorithm(alg)) if alg == "HS256"
        ));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let keys = JwkSet::from(KeyPair::generate().public_jwk());

        for bad in ["", "one", "one.two", "one.two.three.four", "..", "a..b"] {
            assert!(matches!(
                verify_token(bad, &keys),
                Err(TokenError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_decode_claims_unverified() {
        let keypair = KeyPair::generate();
        let claims = test_claims();
        let token = sign_claims(&claims, &keypair).unwrap();

        let decoded = decode_claims_unverified(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_token_is_url_safe() {
        let keypair = KeyPair::generate();
        let token = sign_claims(&test_claims(), &keypair).unwrap();

        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));
    }
}
