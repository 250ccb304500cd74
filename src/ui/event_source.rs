use std::{
    io::BufRead,
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::Duration,
};

use anyhow::Result;

use crate::{domain::events::SessionEvent, usecases::contracts::SessionEventSource};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
const STDIN_READ_FAILED: &str = "UI_STDIN_READ_FAILED";

/// Reads stdin lines on a helper thread so the chat loop can keep pumping
/// frames and timers while the user is idle.
pub struct StdinEventSource {
    lines: Receiver<String>,
    poll_timeout: Duration,
}

impl StdinEventSource {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            return;
                        }
                    }
                    Err(error) => {
                        tracing::warn!(code = STDIN_READ_FAILED, error = %error, "stdin read failed");
                        return;
                    }
                }
            }
        });

        Self::from_receiver(rx)
    }

    fn from_receiver(lines: Receiver<String>) -> Self {
        Self {
            lines,
            poll_timeout: EVENT_POLL_TIMEOUT,
        }
    }
}

impl SessionEventSource for StdinEventSource {
    fn next_event(&mut self) -> Result<Option<SessionEvent>> {
        match self.lines.recv_timeout(self.poll_timeout) {
            Ok(line) => Ok(Some(SessionEvent::from_line(&line))),
            Err(RecvTimeoutError::Timeout) => Ok(Some(SessionEvent::Tick)),
            Err(RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<SessionEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<SessionEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl SessionEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<SessionEvent>> {
        Ok(self.queue.pop_front())
    }
}
