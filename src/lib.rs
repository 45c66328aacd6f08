//! Customer service: a REST resource over a single PostgreSQL table.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod logging;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::ServiceConfig;
pub use error::{AppError, ConfigError, PayloadError};
pub use migration::ensure_customers_table;
pub use model::{Customer, CustomerFilter, STATUS_SUSPENDED};
pub use routes::{app, common_routes, customer_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, CustomerStore, PgCustomerStore};
