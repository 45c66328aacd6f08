//! Root and customer resource routes.

use crate::handlers::customer::{
    create, delete as delete_handler, list, method_not_allowed, read, suspend, update,
};
use crate::handlers::root::{index, method_not_allowed as root_method_not_allowed};
use crate::state::AppState;
use axum::{routing::get, routing::put, Router};

pub fn customer_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(index)
                .post(root_method_not_allowed)
                .put(root_method_not_allowed)
                .patch(root_method_not_allowed)
                .delete(root_method_not_allowed),
        )
        .route(
            "/customers",
            get(list).post(create).fallback(method_not_allowed),
        )
        .route(
            "/customers/:id",
            get(read)
                .put(update)
                .delete(delete_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/customers/:id/suspend",
            put(suspend).fallback(method_not_allowed),
        )
        .with_state(state)
}
