//! Shared harness for the HTTP-level tests.
//!
//! The router runs in-process against `MemoryDrinkStore` and a pinned JWKS
//! holding the public half of `fixtures/rsa_signing_key.pem`.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use coffee_shop::{
    app::build_router,
    config::Config,
    repos::MemoryDrinkStore,
    services::auth::{AuthService, JwkSet, JwksCache, KeySource, StaticKeySource},
    state::AppState,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const DOMAIN: &str = "coffee.test.auth0.com";
pub const ISSUER: &str = "https://coffee.test.auth0.com/";
pub const AUDIENCE: &str = "coffee_shop";
pub const KID: &str = "test-key-1";

pub const SIGNING_KEY_PEM: &str = include_str!("../fixtures/rsa_signing_key.pem");
pub const FOREIGN_KEY_PEM: &str = include_str!("../fixtures/rsa_foreign_key.pem");
const JWKS: &str = include_str!("../fixtures/jwks.json");

pub const BARISTA: &[&str] = &["get:drinks-detail"];
pub const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

pub fn test_config() -> Config {
    Config::from_vars(|key| match key {
        "AUTH_DOMAIN" => Some(DOMAIN.to_string()),
        "AUTH_AUDIENCE" => Some(AUDIENCE.to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn test_app() -> Router {
    let jwks: JwkSet = serde_json::from_str(JWKS).expect("jwks fixture");
    test_app_with_keys(Arc::new(StaticKeySource::new(jwks)))
}

/// Same router, verifying tokens against keys from `source`.
pub fn test_app_with_keys(source: Arc<dyn KeySource>) -> Router {
    let config = test_config();

    let cache = JwksCache::new(source, Duration::from_secs(600));
    let auth = AuthService::new(
        cache,
        config.auth.issuer.as_str(),
        &config.auth.audience,
        &config.auth.algorithms,
        config.auth.leeway_seconds,
    );

    let state = AppState::new(Arc::new(MemoryDrinkStore::new()), Arc::new(auth));
    build_router(state, &config)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Sign arbitrary claims with `pem`, optionally stamping a `kid`.
pub fn sign(claims: &Value, kid: Option<&str>, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("rsa pem");
    jsonwebtoken::encode(&header, claims, &key).expect("sign token")
}

pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "aud": AUDIENCE,
        "sub": "auth0|barista",
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

/// A valid token carrying `permissions`.
pub fn token(permissions: &[&str]) -> String {
    sign(&claims(permissions), Some(KID), SIGNING_KEY_PEM)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

/// JSON request, with `Authorization: Bearer <token>` when a token is given.
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub fn latte() -> Value {
    json!({
        "title": "Latte",
        "recipe": [
            {"name": "milk", "color": "white", "parts": 3},
            {"name": "espresso", "color": "brown", "parts": 1}
        ]
    })
}

/// Create a drink through the API and return its id.
pub async fn create(app: &Router, body: Value) -> i64 {
    let (status, res) = send(
        app,
        request(Method::POST, "/drinks", Some(&token(MANAGER)), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{res}");
    res["drinks"][0]["id"].as_i64().expect("drink id")
}
