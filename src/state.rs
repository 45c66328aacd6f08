//! Shared application state for all routes.

use crate::store::CustomerStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CustomerStore>,
    /// Overrides the request `Host` header when building absolute links.
    pub public_base_url: Option<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        AppState {
            store,
            public_base_url: None,
        }
    }

    pub fn with_public_base_url(mut self, url: Option<String>) -> Self {
        self.public_base_url = url;
        self
    }
}
