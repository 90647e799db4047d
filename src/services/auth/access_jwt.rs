use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::AppError;
use crate::services::auth::{AuthError, JwksCache};

/// Verified access-token claims the service cares about.
///
/// `iss`, `aud`, `exp` and `nbf` are checked by `jsonwebtoken::Validation` and not kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default, deserialize_with = "permission_list")]
    pub permissions: Option<Vec<String>>,
}

// A `permissions` claim that is not a list counts as absent; non-string entries are ignored.
fn permission_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(permission) => Some(permission),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// RS256 access-token verifier backed by the identity provider's JWKS.
pub struct AuthService {
    jwks: JwksCache,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwks", &self.jwks)
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        jwks: JwksCache,
        issuer: &str,
        audience: &str,
        algorithms: &[Algorithm],
        leeway_seconds: u64,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        if !algorithms.is_empty() {
            validation.algorithms = algorithms.to_vec();
        }
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;

        Self { jwks, validation }
    }

    /// Authenticate the request, then require `permission` in its claims.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<TokenClaims, AppError> {
        let token = bearer_token(headers)?;
        let claims = self.verify_decode(token).await?;
        check_permission(permission, &claims)?;
        Ok(claims)
    }

    /// Verify signature, issuer, audience and expiry; return the decoded claims.
    ///
    /// Key-set fetch failures surface as `AppError::Internal`, everything else
    /// as an `AuthError`.
    pub async fn verify_decode(&self, token: &str) -> Result<TokenClaims, AppError> {
        let keys = self.jwks.current().await?;

        let header =
            jsonwebtoken::decode_header(token).map_err(|_| AuthError::undecodable_header())?;
        let kid = header.kid.ok_or_else(AuthError::missing_kid)?;

        let jwk = match keys.set.find(&kid) {
            Some(jwk) => jwk.clone(),
            // The provider may have rotated keys since we cached them.
            None if !keys.just_fetched => self
                .jwks
                .refresh()
                .await?
                .find(&kid)
                .cloned()
                .ok_or_else(AuthError::key_not_found)?,
            None => return Err(AuthError::key_not_found().into()),
        };

        let decoding_key = jwk.decoding_key().ok_or_else(AuthError::unparsable_token)?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &decoding_key, &self.validation)
            .map_err(|e| classify(&e))?;

        Ok(data.claims)
    }
}

fn classify(err: &jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::token_expired(),
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::invalid_claims(),
        _ => AuthError::unparsable_token(),
    }
}

/// Extract `<token>` from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(AuthError::header_missing)?
        .to_str()
        .map_err(|_| AuthError::bearer_not_found())?;

    let mut parts = value.split("Bearer ");
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some(""), Some(token), None) => token,
        _ => return Err(AuthError::bearer_not_found()),
    };

    if token.is_empty() {
        return Err(AuthError::bearer_empty());
    }

    Ok(token)
}

/// `permission` must be listed in the token's `permissions` claim.
pub fn check_permission(permission: &str, claims: &TokenClaims) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or_else(AuthError::permissions_missing)?;

    if !granted.iter().any(|p| p == permission) {
        return Err(AuthError::permission_denied());
    }

    Ok(())
}
