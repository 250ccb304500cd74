//! UI layer: line-based console rendering and input.

pub mod chat_loop;
pub mod console;
mod event_source;

pub(crate) use event_source::StdinEventSource;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
