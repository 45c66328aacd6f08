//! Service root: metadata on GET, fixed 405 for every other verb.

use crate::response::{absolute_url, error_body};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

pub const SERVICE_NAME: &str = "Customer Service REST API";
pub const SERVICE_VERSION: &str = "1.0";
pub const ROOT_METHOD_NOT_ALLOWED: &str = "Method not allowed. Please use GET method for this endpoint.";

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub paths: String,
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Json<ServiceInfo> {
    tracing::info!("request for root URL");
    Json(ServiceInfo {
        name: SERVICE_NAME,
        version: SERVICE_VERSION,
        paths: absolute_url(&state, &headers, "/customers"),
    })
}

pub async fn method_not_allowed() -> (StatusCode, Json<serde_json::Value>) {
    tracing::info!("non-GET request for root URL");
    (StatusCode::METHOD_NOT_ALLOWED, Json(error_body(ROOT_METHOD_NOT_ALLOWED)))
}
