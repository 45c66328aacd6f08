//! Request extractors.

pub mod content_type;
pub use content_type::{check_content_type, JsonPayload, JSON_CONTENT_TYPE};
