//! Domain layer: core entities and chat state machines.

pub mod channel;
pub mod conversation;
pub mod events;
pub mod message;
pub mod message_stream;
pub mod status;
pub mod timer;
pub mod typing;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
