//! Infrastructure layer: config, logging, credentials and OS-facing sinks.

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod notifications;
pub mod secrets;

/// Returns the infra module name for smoke checks.
pub fn module_name() -> &'static str {
    "infra"
}
