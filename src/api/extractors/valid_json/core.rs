/*
 * Responsibility
 * - JSON body の形式チェックを handler の前で行う extractor
 * - Content-Type が JSON でない / body が JSON として読めない → 415
 * - body が上限 (DefaultBodyLimit) を超える → 413
 * - 必須キーの組み合わせ (All / Any) を満たさない、型が合わない → 422
 * - 成功時は DTO に deserialize 済みの値を handler に渡す
 */
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, StatusCode, header},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    // every key must be present
    All,
    // at least one key must be present
    Any,
}

impl Combinator {
    pub fn holds(self, object: &Map<String, Value>, keys: &[&str]) -> bool {
        match self {
            Combinator::All => keys.iter().all(|k| object.contains_key(*k)),
            Combinator::Any => keys.iter().any(|k| object.contains_key(*k)),
        }
    }
}

/// A request body type that declares which top-level keys it needs.
pub trait JsonKeys: DeserializeOwned {
    const KEYS: &'static [&'static str];
    const COMBINATOR: Combinator;

    // Semantic checks that run after deserialization.
    fn validate(&self) -> Result<(), &'static str> {
        Ok(())
    }
}

pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: JsonKeys,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Err(AppError::UnsupportedMediaType);
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|err| {
            tracing::debug!(error = %err, "failed to read request body");
            if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::UnsupportedMediaType
            }
        })?;

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|_| AppError::UnsupportedMediaType)?;

        let Value::Object(object) = value else {
            return Err(AppError::Unprocessable("request body must be a JSON object"));
        };

        if !T::COMBINATOR.holds(&object, T::KEYS) {
            return Err(AppError::Unprocessable("required fields are missing"));
        }

        let body: T = serde_json::from_value(Value::Object(object)).map_err(|err| {
            tracing::debug!(error = %err, "request body does not match the expected shape");
            AppError::Unprocessable("fields have invalid types")
        })?;

        body.validate().map_err(AppError::Unprocessable)?;

        Ok(ValidJson(body))
    }
}

// `application/json` or any `application/*+json`, parameters ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::HeaderValue};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Both {
        a: String,
        b: u32,
    }

    impl JsonKeys for Both {
        const KEYS: &'static [&'static str] = &["a", "b"];
        const COMBINATOR: Combinator = Combinator::All;
    }

    #[derive(Debug, Deserialize)]
    struct Either {
        a: Option<String>,
        b: Option<u32>,
    }

    impl JsonKeys for Either {
        const KEYS: &'static [&'static str] = &["a", "b"];
        const COMBINATOR: Combinator = Combinator::Any;

        fn validate(&self) -> Result<(), &'static str> {
            match (&self.a, self.b) {
                (Some(a), _) if a.is_empty() => Err("a cannot be empty"),
                _ => Ok(()),
            }
        }
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn extract<T: JsonKeys>(content_type: Option<&str>, body: &str) -> Result<T, AppError> {
        ValidJson::<T>::from_request(request(content_type, body), &())
            .await
            .map(|ValidJson(v)| v)
    }

    #[tokio::test]
    async fn all_keys_present_passes() {
        let body = extract::<Both>(Some("application/json"), r#"{"a":"x","b":2}"#)
            .await
            .unwrap();
        assert_eq!(body.a, "x");
        assert_eq!(body.b, 2);
    }

    #[tokio::test]
    async fn non_json_content_type_is_unsupported() {
        for ct in [None, Some("text/plain"), Some("application/x-www-form-urlencoded")] {
            let err = extract::<Both>(ct, r#"{"a":"x","b":2}"#).await.unwrap_err();
            assert!(matches!(err, AppError::UnsupportedMediaType), "{ct:?}");
        }
    }

    #[tokio::test]
    async fn unparsable_body_is_unsupported() {
        let err = extract::<Both>(Some("application/json"), "{not json")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType));
    }

    #[tokio::test]
    async fn combinator_failures_are_unprocessable() {
        let err = extract::<Both>(Some("application/json"), r#"{"a":"x"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unprocessable(_)));

        let err = extract::<Either>(Some("application/json"), r#"{"c":1}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn any_accepts_a_single_key() {
        let body = extract::<Either>(Some("application/json; charset=utf-8"), r#"{"b":7}"#)
            .await
            .unwrap();
        assert_eq!(body.b, Some(7));
        assert!(body.a.is_none());
    }

    #[tokio::test]
    async fn wrong_types_and_failed_validation_are_unprocessable() {
        let err = extract::<Both>(Some("application/json"), r#"{"a":"x","b":"two"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unprocessable(_)));

        let err = extract::<Either>(Some("application/json"), r#"{"a":""}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unprocessable("a cannot be empty")));
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        // Past axum's default limit, no `DefaultBodyLimit` layer needed.
        let body = format!(r#"{{"a":"{}","b":1}}"#, "x".repeat(3 * 1024 * 1024));
        let err = extract::<Both>(Some("application/json"), &body)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge));
    }

    #[test]
    fn vendor_json_types_count_as_json() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/merge-patch+json"),
        );
        assert!(is_json_content_type(&headers));
    }
}
