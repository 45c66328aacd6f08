//! Router assembly.

mod common;
mod customer;

pub use common::common_routes;
pub use customer::customer_routes;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

/// Full application router: customer resource plus probes, with request tracing and a body size
/// cap. The cap is enforced while buffering the body, so an oversized request gets the JSON 413.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(customer_routes(state.clone()))
        .merge(common_routes(state))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}
