//! Customer handlers: create, read, update, list, delete, suspend.

use crate::error::AppError;
use crate::extractors::JsonPayload;
use crate::model::CustomerFilter;
use crate::response::{absolute_url, created_at, ok};
use crate::service::{
    deserialize, deserialize_into, serialize, serializer::parse_date, CustomerResource,
};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;

fn customer_path(id: i32) -> String {
    format!("/customers/{}", id)
}

/// Only unsigned decimal ids name a resource; signs, blanks and overflow are all 404.
fn parse_id(id_str: &str, not_found: impl FnOnce() -> String) -> Result<i32, AppError> {
    if id_str.is_empty() || !id_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound(not_found()));
    }
    id_str.parse().map_err(|_| AppError::NotFound(not_found()))
}

fn not_found_message(id: &str) -> String {
    format!("Customer with id '{}' was not found.", id)
}

/// First non-empty filter in precedence order: name, address, email, phone_number, member_since.
pub fn filter_from_params(
    params: &HashMap<String, String>,
) -> Result<Option<CustomerFilter>, AppError> {
    let get = |key: &str| params.get(key).map(String::as_str).filter(|v| !v.is_empty());
    if let Some(v) = get("name") {
        return Ok(Some(CustomerFilter::Name(v.to_string())));
    }
    if let Some(v) = get("address") {
        return Ok(Some(CustomerFilter::Address(v.to_string())));
    }
    if let Some(v) = get("email") {
        return Ok(Some(CustomerFilter::Email(v.to_string())));
    }
    if let Some(v) = get("phone_number") {
        return Ok(Some(CustomerFilter::PhoneNumber(v.to_string())));
    }
    if let Some(v) = get("member_since") {
        return Ok(Some(CustomerFilter::MemberSince(parse_date(v)?)));
    }
    Ok(None)
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonPayload(body): JsonPayload,
) -> Result<Response, AppError> {
    tracing::info!("request to create a customer");
    let mut customer = deserialize(&body)?;
    state.store.create(&mut customer).await?;
    let id = customer
        .id
        .ok_or_else(|| AppError::Validation("customer was stored without an id".into()))?;
    tracing::info!(id, "customer saved");
    let location = absolute_url(&state, &headers, &customer_path(id));
    Ok(created_at(location, serialize(&customer)))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<(StatusCode, Json<CustomerResource>), AppError> {
    tracing::info!(id = %id_str, "request to retrieve a customer");
    let missing = || format!("Customer with id [{}] not found", id_str);
    let id = parse_id(&id_str, missing)?;
    let customer = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(missing()))?;
    Ok(ok(serialize(&customer)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonPayload(body): JsonPayload,
) -> Result<(StatusCode, Json<CustomerResource>), AppError> {
    tracing::info!(id = %id_str, "request to update a customer");
    let id = parse_id(&id_str, || not_found_message(&id_str))?;
    let mut customer = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found_message(&id_str)))?;
    deserialize_into(&mut customer, &body)?;
    state.store.update(&mut customer).await?;
    tracing::info!(id, "customer updated");
    Ok(ok(serialize(&customer)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<(StatusCode, Json<Vec<CustomerResource>>), AppError> {
    tracing::info!("request for customer list");
    let customers = match filter_from_params(&params)? {
        Some(filter) => {
            tracing::info!(column = filter.column(), "find by filter");
            state.store.find_by(&filter).await?
        }
        None => {
            tracing::info!("find all");
            state.store.all().await?
        }
    };
    let results: Vec<CustomerResource> = customers.iter().map(serialize).collect();
    tracing::info!(count = results.len(), "returning customers");
    Ok(ok(results))
}

/// Idempotent: a missing customer still yields 204.
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, AppError> {
    tracing::info!(id = %id_str, "request to delete a customer");
    let id = parse_id(&id_str, || not_found_message(&id_str))?;
    if let Some(customer) = state.store.find(id).await? {
        state.store.delete(&customer).await?;
    }
    tracing::info!(id, "customer delete complete");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn suspend(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<(StatusCode, Json<CustomerResource>), AppError> {
    tracing::info!(id = %id_str, "request to suspend a customer");
    let id = parse_id(&id_str, || not_found_message(&id_str))?;
    let mut customer = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found_message(&id_str)))?;
    customer.suspend();
    state.store.update(&mut customer).await?;
    Ok(ok(serialize(&customer)))
}

/// Verbs a customer route does not serve, e.g. DELETE on the collection.
pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    AppError::MethodNotAllowed(format!("Method {} is not allowed on this resource.", method))
}
