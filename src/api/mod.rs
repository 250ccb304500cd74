//! REST adapter for the conversations API.

pub mod client;
pub mod dto;
pub mod error;

pub use client::RestClient;
pub use error::{ApiError, ApiResult};

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}
