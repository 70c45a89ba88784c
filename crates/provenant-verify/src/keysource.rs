//! Public key distribution.
//!
//! The verifier consumes key sets; where they come from is a deployment
//! concern. A [`KeySource`] yields a JWK set on demand, either from memory
//! or from an issuer's published key directory over HTTP.

use async_trait::async_trait;
use provenant_token::JwkSet;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors while obtaining a key set.
#[derive(Debug, Error)]
pub enum KeySourceError {
    #[error("key fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// A source of public verification keys, addressable by key id once
/// fetched.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, KeySourceError>;
}

/// A key set already in hand.
#[derive(Debug, Clone)]
pub struct StaticKeys(pub JwkSet);

#[async_trait]
impl KeySource for StaticKeys {
    async fn fetch(&self) -> Result<JwkSet, KeySourceError> {
        Ok(self.0.clone())
    }
}

/// A JWKS document published at a well-known URL.
///
/// # Example
///
/// ```ignore
/// use provenant_verify::{KeySource, RemoteJwks};
///
/// let source = RemoteJwks::new("https://uhp.example/.well-known/integrity.public.json");
/// let keys = source.fetch().await?;
/// ```
pub struct RemoteJwks {
    client: Client,
    url: String,
}

impl RemoteJwks {
    /// Fetch from the given URL with a 30-second timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap(),
            url: url.into(),
        }
    }

    /// Fetch with a caller-configured client.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The key directory URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySource for RemoteJwks {
    async fn fetch(&self) -> Result<JwkSet, KeySourceError> {
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let keys: JwkSet = response.json().await?;
        Ok(keys)
    }
}
