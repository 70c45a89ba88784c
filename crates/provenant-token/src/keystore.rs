//! File-backed key store.
//!
//! Publishes the public half of a keypair as a JWKS document (the file a
//! key directory serves) and keeps the private JWK in a separate
//! directory. All locations are explicit configuration; nothing is
//! resolved against the process working directory or the environment.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::TokenError;
use crate::keys::{Jwk, JwkSet, KeyPair};

/// Where generated keys are written.
#[derive(Debug, Clone)]
pub struct KeyStoreConfig {
    /// Directory for publishable `<name>.public.json` JWKS files
    pub public_dir: PathBuf,

    /// Directory for secret `<name>.private.json` JWK files
    pub private_dir: PathBuf,
}

impl KeyStoreConfig {
    pub fn new(public_dir: impl Into<PathBuf>, private_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
            private_dir: private_dir.into(),
        }
    }

    /// Path of the published key set for `name`.
    pub fn public_path(&self, name: &str) -> PathBuf {
        self.public_dir.join(format!("{}.public.json", name))
    }

    /// Path of the private key for `name`.
    pub fn private_path(&self, name: &str) -> PathBuf {
        self.private_dir.join(format!("{}.private.json", name))
    }
}

/// Generate an Ed25519 keypair and write both halves to the store.
///
/// The public key is wrapped in a `{"keys": [...]}` JWKS document so the
/// file can be served from a well-known key directory as-is.
pub fn generate_and_save(config: &KeyStoreConfig, name: &str) -> Result<KeyPair, TokenError> {
    let keypair = KeyPair::generate();

    fs::create_dir_all(&config.public_dir)?;
    fs::create_dir_all(&config.private_dir)?;

    let public_path = config.public_path(name);
    let key_set = JwkSet::from(keypair.public_jwk());
    fs::write(&public_path, serde_json::to_vec_pretty(&key_set)?)?;
    info!(path = %public_path.display(), kid = keypair.kid(), "wrote public key set");

    let private_path = config.private_path(name);
    fs::write(&private_path, serde_json::to_vec_pretty(&keypair.private_jwk())?)?;
    info!(path = %private_path.display(), "wrote private key");

    Ok(keypair)
}

/// Load a published JWKS document.
pub fn load_key_set(path: impl AsRef<Path>) -> Result<JwkSet, TokenError> {
    let bytes = fs::read(path.as_ref())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Load a private JWK and restore the signing keypair.
pub fn load_keypair(path: impl AsRef<Path>) -> Result<KeyPair, TokenError> {
    let bytes = fs::read(path.as_ref())?;
    let jwk: Jwk = serde_json::from_slice(&bytes)?;
    KeyPair::from_jwk(&jwk)
}
