pub mod access_jwt;
pub mod error;
pub mod factory;
pub mod jwks;

pub use access_jwt::{AuthService, TokenClaims};
pub use error::AuthError;
pub use factory::build_auth_service;
pub use jwks::{HttpKeySource, JwkSet, JwksCache, JwksError, KeySource, StaticKeySource};
