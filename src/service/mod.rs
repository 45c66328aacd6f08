//! Boundary conversion between request/response JSON and the customer entity.

pub mod serializer;
pub use serializer::{deserialize, deserialize_into, serialize, CustomerFields, CustomerResource};
