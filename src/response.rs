//! Response helpers shared by the handlers.

use crate::state::AppState;
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

/// 201 with the body and a `Location` header.
pub fn created_at<T: Serialize>(location: String, data: T) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(data)).into_response()
}

/// Absolute URL for `path`: configured public base, else `http://<Host>`, else the bare path.
pub fn absolute_url(state: &AppState, headers: &HeaderMap, path: &str) -> String {
    if let Some(base) = state.public_base_url.as_deref() {
        return format!("{}{}", base, path);
    }
    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) if !host.is_empty() => format!("http://{}{}", host, path),
        _ => path.to_string(),
    }
}

pub fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}
