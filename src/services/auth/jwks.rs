//! Identity-provider signing keys (JWKS).
//!
//! Responsibility:
//! - Fetch the provider's JSON Web Key Set (`KeySource`)
//! - Keep the last fetched set for a bounded time (`JwksCache`)
//! - Turn a matching RSA entry into a `jsonwebtoken::DecodingKey`
//!
//! Policy:
//! - A cached set is served while it is younger than `ttl`. `ttl == 0` turns
//!   caching off: every call fetches.
//! - An unknown `kid` against a cached set triggers one refetch (key rotation),
//!   rate-limited by `min_refresh_interval`.
//! - Concurrent refreshes are coalesced behind a single lock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("jwks request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("jwks endpoint returned {0}")]
    Status(reqwest::StatusCode),
}

/// JWKS document (RFC 7517).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwkSet {
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

/// A single key entry. Only the RSA fields are read.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
}

impl Jwk {
    /// Build a verification key from `kty`, `n`, `e`.
    ///
    /// Returns `None` for non-RSA keys, encryption keys, or unusable components.
    pub fn decoding_key(&self) -> Option<DecodingKey> {
        if self.kty != "RSA" {
            return None;
        }
        if let Some(key_use) = &self.key_use
            && key_use != "sig"
        {
            return None;
        }

        let (n, e) = (self.n.as_deref()?, self.e.as_deref()?);
        match DecodingKey::from_rsa_components(n, e) {
            Ok(key) => Some(key),
            Err(err) => {
                warn!(kid = ?self.kid, error = %err, "unusable RSA components in JWKS entry");
                None
            }
        }
    }
}

/// Where key sets come from.
#[async_trait]
pub trait KeySource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<JwkSet, JwksError>;
}

/// Fetches `https://{domain}/.well-known/jwks.json` (or any configured URL).
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    client: reqwest::Client,
    url: String,
}

impl HttpKeySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        debug!(url = %self.url, "fetching JWKS");

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(JwksError::Status(response.status()));
        }

        Ok(response.json::<JwkSet>().await?)
    }
}

/// A fixed key set (pinned keys, tests).
#[derive(Debug, Clone)]
pub struct StaticKeySource {
    set: JwkSet,
}

impl StaticKeySource {
    pub fn new(set: JwkSet) -> Self {
        Self { set }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        Ok(self.set.clone())
    }
}

#[derive(Debug)]
struct CachedSet {
    set: Arc<JwkSet>,
    fetched_at: Instant,
}

/// The key set handed to a verifier, and whether it was fetched for this call.
#[derive(Debug, Clone)]
pub struct CurrentKeys {
    pub set: Arc<JwkSet>,
    pub just_fetched: bool,
}

pub struct JwksCache {
    source: Arc<dyn KeySource>,
    ttl: Duration,
    min_refresh_interval: Duration,
    cached: RwLock<Option<CachedSet>>,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for JwksCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksCache")
            .field("ttl", &self.ttl)
            .field("min_refresh_interval", &self.min_refresh_interval)
            .finish()
    }
}

impl JwksCache {
    pub fn new(source: Arc<dyn KeySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            min_refresh_interval: Duration::from_secs(10),
            cached: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Key set to verify against: the cached one while fresh, otherwise a new fetch.
    pub async fn current(&self) -> Result<CurrentKeys, JwksError> {
        if let Some(set) = self.cached_younger_than(self.ttl).await {
            return Ok(CurrentKeys {
                set,
                just_fetched: false,
            });
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(set) = self.cached_younger_than(self.ttl).await {
            return Ok(CurrentKeys {
                set,
                just_fetched: false,
            });
        }

        Ok(CurrentKeys {
            set: self.fetch_and_store().await?,
            just_fetched: true,
        })
    }

    /// Refetch after a `kid` miss. Returns the cached set instead when it is
    /// younger than `min_refresh_interval`.
    pub async fn refresh(&self) -> Result<Arc<JwkSet>, JwksError> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(set) = self.cached_younger_than(self.min_refresh_interval).await {
            return Ok(set);
        }

        self.fetch_and_store().await
    }

    async fn cached_younger_than(&self, age: Duration) -> Option<Arc<JwkSet>> {
        if self.ttl.is_zero() {
            return None;
        }

        self.cached
            .read()
            .await
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < age)
            .map(|c| Arc::clone(&c.set))
    }

    async fn fetch_and_store(&self) -> Result<Arc<JwkSet>, JwksError> {
        let set = Arc::new(self.source.fetch().await?);
        debug!(keys = set.keys.len(), "JWKS refreshed");

        if !self.ttl.is_zero() {
            *self.cached.write().await = Some(CachedSet {
                set: Arc::clone(&set),
                fetched_at: Instant::now(),
            });
        }

        Ok(set)
    }
}
