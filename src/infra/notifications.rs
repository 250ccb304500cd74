use anyhow::Result;

use crate::{domain::conversation::ConversationId, usecases::contracts::NotificationSink};

const LOCAL_NOTIFICATION_SHOWN: &str = "LOCAL_NOTIFICATION_SHOWN";

/// A local notification for a message received while the chat is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    pub conversation_id: ConversationId,
}

/// Surfaces notifications as log events and a terminal bell. OS push
/// integration lives outside this client.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotificationSink;

impl NotificationSink for ConsoleNotificationSink {
    fn notify(&self, notification: &LocalNotification) -> Result<()> {
        tracing::info!(
            code = LOCAL_NOTIFICATION_SHOWN,
            conversation_id = %notification.conversation_id,
            title = %notification.title,
            "local notification"
        );
        eprint!("\x07");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoopNotificationSink;

impl NotificationSink for NoopNotificationSink {
    fn notify(&self, _notification: &LocalNotification) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotificationSink {
    shown: std::sync::Mutex<Vec<LocalNotification>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingNotificationSink {
    pub fn failing() -> Self {
        Self {
            shown: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn shown(&self) -> Vec<LocalNotification> {
        self.shown
            .lock()
            .map(|shown| shown.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, notification: &LocalNotification) -> Result<()> {
        if self.fail {
            anyhow::bail!("notifications are not supported here");
        }

        if let Ok(mut shown) = self.shown.lock() {
            shown.push(notification.clone());
        }
        Ok(())
    }
}
