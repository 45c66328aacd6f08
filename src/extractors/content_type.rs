//! JSON request body guarded by an exact `Content-Type: application/json` check.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
};
use serde_json::Value;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request body parsed as untyped JSON. Shape checks happen in the serializer.
#[derive(Clone, Debug)]
pub struct JsonPayload(pub Value);

/// Rejects requests whose `Content-Type` is absent or not exactly `application/json`.
pub fn check_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let rejected = || AppError::UnsupportedMediaType(format!("Content-Type must be {}", JSON_CONTENT_TYPE));
    let Some(value) = headers.get(CONTENT_TYPE) else {
        tracing::error!("no Content-Type specified");
        return Err(rejected());
    };
    if value.as_bytes() == JSON_CONTENT_TYPE.as_bytes() {
        return Ok(());
    }
    tracing::error!(content_type = ?value, "invalid Content-Type");
    Err(rejected())
}

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        check_content_type(req.headers())?;
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(e.body_text())
            } else {
                AppError::Validation(e.body_text())
            }
        })?;
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Validation(format!(
                "Invalid Customer: body of request contained bad or no data ({})",
                e
            ))
        })?;
        Ok(JsonPayload(value))
    }
}
