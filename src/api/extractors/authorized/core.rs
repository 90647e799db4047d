use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::services::auth::TokenClaims;
use crate::state::AppState;

use super::types::Permission;

/// Handler 引数に置くと、token 検証 → permission チェックを通過した場合のみ handler が走る。
///
/// Place it before any body extractor: parts extractors run first, so an
/// unauthenticated request is rejected before its body is looked at.
pub struct Authorized<P> {
    pub claims: TokenClaims,
    _marker: PhantomData<P>,
}

impl<P> FromRequestParts<AppState> for Authorized<P>
where
    P: Permission,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = state
            .auth
            .authorize(&parts.headers, P::NAME)
            .await
            .inspect_err(|err| {
                tracing::warn!(permission = P::NAME, error = %err, "authorization failed");
            })?;

        tracing::debug!(permission = P::NAME, sub = ?claims.sub, "authorized");

        Ok(Self {
            claims,
            _marker: PhantomData,
        })
    }
}

impl<P: Permission> std::fmt::Debug for Authorized<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorized")
            .field("permission", &P::NAME)
            .field("sub", &self.claims.sub)
            .finish()
    }
}
