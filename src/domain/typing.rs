use std::time::{Duration, Instant};

use super::{message::UserId, timer::Timer};

pub const DEFAULT_TYPING_QUIET_PERIOD: Duration = Duration::from_secs(2);
pub const DEFAULT_TYPING_DECAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTypingState {
    Idle,
    Typing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeOutcome {
    /// Idle -> Typing: exactly one ping must be emitted to the broker.
    EmitPing,
    /// Already typing; the quiet period was restarted.
    Debounced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemotePingOutcome {
    /// The ping came from the local participant and was dropped.
    IgnoredSelf,
    /// The other participant started typing.
    Started,
    /// The other participant was already typing; the decay was restarted.
    Extended,
}

/// Transitions produced by timer expiry in a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypingExpiry {
    pub self_went_idle: bool,
    pub other_stopped: bool,
}

impl TypingExpiry {
    pub fn is_empty(&self) -> bool {
        !self.self_went_idle && !self.other_stopped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingTimings {
    pub quiet_period: Duration,
    pub decay: Duration,
}

impl Default for TypingTimings {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_TYPING_QUIET_PERIOD,
            decay: DEFAULT_TYPING_DECAY,
        }
    }
}

/// Typing state of one conversation.
///
/// Self typing is debounced: one ping per Idle -> Typing transition, back to
/// Idle after a quiet period without keystrokes. Remote typing decays: the
/// flag clears when no ping arrived within the decay window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingIndicator {
    self_id: UserId,
    timings: TypingTimings,
    self_state: SelfTypingState,
    quiet_timer: Timer,
    other_typing: bool,
    decay_timer: Timer,
}

impl TypingIndicator {
    pub fn new(self_id: UserId, timings: TypingTimings) -> Self {
        Self {
            self_id,
            timings,
            self_state: SelfTypingState::Idle,
            quiet_timer: Timer::default(),
            other_typing: false,
            decay_timer: Timer::default(),
        }
    }

    pub fn self_state(&self) -> SelfTypingState {
        self.self_state
    }

    pub fn is_other_typing(&self) -> bool {
        self.other_typing
    }

    pub fn on_keystroke(&mut self, now: Instant) -> KeystrokeOutcome {
        // A quiet period that ran out without a poll still ends the burst.
        if self.quiet_timer.fire_if_due(now) {
            self.self_state = SelfTypingState::Idle;
        }
        self.quiet_timer.arm(now, self.timings.quiet_period);

        match self.self_state {
            SelfTypingState::Idle => {
                self.self_state = SelfTypingState::Typing;
                KeystrokeOutcome::EmitPing
            }
            SelfTypingState::Typing => KeystrokeOutcome::Debounced,
        }
    }

    pub fn on_remote_ping(&mut self, author: UserId, now: Instant) -> RemotePingOutcome {
        if author == self.self_id {
            return RemotePingOutcome::IgnoredSelf;
        }

        if self.decay_timer.fire_if_due(now) {
            self.other_typing = false;
        }
        self.decay_timer.arm(now, self.timings.decay);

        if self.other_typing {
            RemotePingOutcome::Extended
        } else {
            self.other_typing = true;
            RemotePingOutcome::Started
        }
    }

    /// Applies every timer that is due at `now`.
    pub fn poll(&mut self, now: Instant) -> TypingExpiry {
        let mut expiry = TypingExpiry::default();

        if self.quiet_timer.fire_if_due(now) && self.self_state == SelfTypingState::Typing {
            self.self_state = SelfTypingState::Idle;
            expiry.self_went_idle = true;
        }

        if self.decay_timer.fire_if_due(now) && self.other_typing {
            self.other_typing = false;
            expiry.other_stopped = true;
        }

        expiry
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.quiet_timer.deadline(), self.decay_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn has_pending_timers(&self) -> bool {
        self.quiet_timer.is_pending() || self.decay_timer.is_pending()
    }

    /// Cancels both timers and resets to the idle, not-typing state.
    pub fn cancel_all(&mut self) {
        self.quiet_timer.cancel();
        self.decay_timer.cancel();
        self.self_state = SelfTypingState::Idle;
        self.other_typing = false;
    }
}
