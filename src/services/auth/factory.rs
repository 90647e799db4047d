/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthService, HttpKeySource, JwksCache, JwksError};

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, JwksError> {
    let source = HttpKeySource::new(config.auth.jwks_url.as_str(), config.auth.jwks_fetch_timeout)?;
    tracing::info!(url = %source.url(), ttl = ?config.auth.jwks_cache_ttl, "using remote JWKS");

    let jwks = JwksCache::new(Arc::new(source), config.auth.jwks_cache_ttl);

    Ok(Arc::new(AuthService::new(
        jwks,
        config.auth.issuer.as_str(),
        &config.auth.audience,
        &config.auth.algorithms,
        config.auth.leeway_seconds,
    )))
}
