//! HTTP handlers for the service root and the customer resource.

pub mod customer;
pub mod root;
