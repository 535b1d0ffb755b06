//! Request schema checks run before any handler logic.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AppError;

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trim and lower-case, so lookups and the unique index agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// JSON body that deserialized and passed `Validate`. Every rejection,
/// including a missing body, is a 400.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| rejected(rejection.body_text()))?;
        checked(value).map(Self)
    }
}

/// Body of a partial update. An empty body, with or without a content type,
/// is the empty patch; anything else must be JSON and pass `Validate`.
pub struct PatchJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for PatchJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_content = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| rejected(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return checked(T::default()).map(Self);
        }
        if !json_content {
            return Err(rejected(
                "Expected request with `Content-Type: application/json`".into(),
            ));
        }
        let Json(value) =
            Json::<T>::from_bytes(&bytes).map_err(|rejection| rejected(rejection.body_text()))?;
        checked(value).map(Self)
    }
}

fn is_json_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json")
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn rejected(reason: String) -> AppError {
    warn!(reason = %reason, "rejected request body");
    AppError::Validation(reason)
}

fn checked<T: Validate>(value: T) -> Result<T, AppError> {
    value.validate().map_err(|msg| {
        warn!(reason = %msg, "request body failed validation");
        AppError::Validation(msg)
    })?;
    Ok(value)
}

/// Integer `:id` path segment.
pub struct IdParam(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("id must be an integer".into()))?;
        Ok(Self(id))
    }
}
