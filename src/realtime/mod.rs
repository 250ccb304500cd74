//! Realtime layer: broker connection, subscription registry and wire codec.

pub mod cable;
pub mod registry;
pub mod session;
pub mod socket;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    /// No credential was available when connecting. Not retried.
    #[error("no credential available for the realtime connection")]
    Authentication,
    /// Subscribe attempted before `connect`.
    #[error("realtime session is not connected; call connect first")]
    NotConnected,
    /// Transport-level failure. Recovery is reconnect + re-subscribe.
    #[error("realtime connection failed: {0}")]
    Connection(String),
    /// A frame did not follow the broker protocol.
    #[error("realtime protocol violation: {0}")]
    Protocol(String),
}

/// Returns the realtime module name for smoke checks.
pub fn module_name() -> &'static str {
    "realtime"
}
