use anyhow::Result;

use crate::{domain::events::SessionEvent, infra::notifications::LocalNotification};

/// Input side of an interactive chat session.
pub trait SessionEventSource {
    /// Blocks for at most one tick. `Ok(None)` means input is exhausted.
    fn next_event(&mut self) -> Result<Option<SessionEvent>>;
}

/// Surfaces local notifications for messages from other participants.
pub trait NotificationSink {
    fn notify(&self, notification: &LocalNotification) -> Result<()>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn notify(&self, notification: &LocalNotification) -> Result<()> {
        (*self).notify(notification)
    }
}
