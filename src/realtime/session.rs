use std::sync::mpsc::Sender;

use url::Url;

use crate::{
    domain::{
        channel::{ChannelEvent, SubscriptionKey, TopicKind},
        conversation::ConversationId,
        status::ConnectionState,
    },
    infra::{credentials::Credential, secrets::redact_url},
};

use super::{
    cable::{decode_frame, CableCommand, CableFrame},
    registry::{Registration, RouteOutcome, Subscription, SubscriptionRegistry},
    RealtimeError,
};

const REALTIME_CONNECTED: &str = "REALTIME_CONNECTED";
const REALTIME_DISCONNECTED: &str = "REALTIME_DISCONNECTED";
const REALTIME_DROPPED: &str = "REALTIME_DROPPED";
const REALTIME_SUBSCRIBED: &str = "REALTIME_SUBSCRIBED";
const REALTIME_UNSUBSCRIBED: &str = "REALTIME_UNSUBSCRIBED";
const REALTIME_SUBSCRIPTION_REJECTED: &str = "REALTIME_SUBSCRIPTION_REJECTED";
const REALTIME_FRAME_INVALID: &str = "REALTIME_FRAME_INVALID";
const REALTIME_SEND_FAILED: &str = "REALTIME_SEND_FAILED";

/// What the socket reports to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Text(String),
    Closed { reason: String },
}

/// One open socket to the broker.
pub trait CableLink {
    fn send(&mut self, command: &CableCommand) -> Result<(), RealtimeError>;
    /// Next pending event without blocking.
    fn try_next(&mut self) -> Option<LinkEvent>;
    fn close(&mut self);
}

/// Opens sockets; the seam between the session and the network.
pub trait CableConnector {
    fn open(&self, url: &Url) -> Result<Box<dyn CableLink>, RealtimeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpReport {
    pub frames: usize,
    pub delivered: usize,
    pub dropped_connection: bool,
}

/// Realtime session: owns the single broker connection and the
/// subscriptions registered on it.
///
/// Constructed explicitly and passed to whoever needs it. Reconnection is
/// never automatic: after a drop the caller must `connect` again and
/// re-subscribe.
pub struct RealtimeSession {
    connector: Box<dyn CableConnector>,
    cable_url: Url,
    link: Option<Box<dyn CableLink>>,
    registry: SubscriptionRegistry,
    state: ConnectionState,
}

impl RealtimeSession {
    pub fn new(connector: Box<dyn CableConnector>, cable_url: Url) -> Self {
        Self {
            connector,
            cable_url,
            link: None,
            registry: SubscriptionRegistry::new(),
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn subscription_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_subscribed(&self, key: &SubscriptionKey) -> bool {
        self.registry.contains(key)
    }

    /// Opens the broker socket with the bearer token as `token` query
    /// parameter. Already connected: no second socket is opened.
    pub fn connect(&mut self, credential: Option<&Credential>) -> Result<(), RealtimeError> {
        let credential = credential.ok_or(RealtimeError::Authentication)?;

        if self.state.is_connected() {
            tracing::debug!("realtime session already connected");
            return Ok(());
        }

        self.discard_link();

        let mut url = self.cable_url.clone();
        url.query_pairs_mut()
            .append_pair("token", &credential.token);

        let link = self.connector.open(&url).map_err(|error| {
            tracing::warn!(url = %redact_url(&url), error = %error, "realtime connect failed");
            error
        })?;

        self.link = Some(link);
        self.state = ConnectionState::Connected;
        tracing::info!(
            code = REALTIME_CONNECTED,
            url = %redact_url(&url),
            "realtime session connected"
        );

        Ok(())
    }

    /// Tears down every subscription and the socket. No-op when not connected.
    pub fn disconnect(&mut self) {
        if self.link.is_none() && self.registry.is_empty() {
            self.state = ConnectionState::Disconnected;
            return;
        }

        let keys = self.registry.drain_disconnected();
        self.discard_link();
        self.state = ConnectionState::Disconnected;
        tracing::info!(
            code = REALTIME_DISCONNECTED,
            subscriptions = keys.len(),
            "realtime session disconnected"
        );
    }

    /// Registers `handler` for (kind, conversation). Idempotent per key: a
    /// second call returns the existing subscription and sends nothing.
    pub fn subscribe(
        &mut self,
        kind: TopicKind,
        conversation_id: ConversationId,
        handler: Sender<ChannelEvent>,
    ) -> Result<Subscription, RealtimeError> {
        if !self.state.is_connected() {
            return Err(RealtimeError::NotConnected);
        }
        let link = self.link.as_mut().ok_or(RealtimeError::NotConnected)?;

        let key = SubscriptionKey::new(kind, conversation_id);
        match self.registry.register(key, handler) {
            Registration::Existing(subscription) => {
                tracing::debug!(key = %key, "already subscribed");
                Ok(subscription)
            }
            Registration::Created(subscription) => {
                if let Err(error) = link.send(&CableCommand::subscribe(&key)) {
                    self.registry.remove(&key);
                    return Err(error);
                }
                tracing::info!(code = REALTIME_SUBSCRIBED, key = %key, "subscribed");
                Ok(subscription)
            }
        }
    }

    /// Removes and tears down the registration for `key`; no-op when absent.
    pub fn unsubscribe(&mut self, key: &SubscriptionKey) {
        if self.registry.remove(key).is_none() {
            return;
        }

        self.send_unsubscribe(key);
        tracing::info!(code = REALTIME_UNSUBSCRIBED, key = %key, "unsubscribed");
    }

    /// Drains pending socket events and routes them. Never blocks.
    pub fn pump(&mut self) -> PumpReport {
        let mut report = PumpReport::default();

        while let Some(event) = self.link.as_mut().and_then(|link| link.try_next()) {
            match event {
                LinkEvent::Text(text) => {
                    report.frames += 1;
                    if self.handle_text(&text) {
                        report.delivered += 1;
                    }
                    if self.state == ConnectionState::Dropped {
                        report.dropped_connection = true;
                        break;
                    }
                }
                LinkEvent::Closed { reason } => {
                    self.mark_dropped(&reason);
                    report.dropped_connection = true;
                    break;
                }
            }
        }

        report
    }

    fn handle_text(&mut self, text: &str) -> bool {
        let frame = match decode_frame(text) {
            Ok(frame) => frame,
            Err(error) => {
                tracing::warn!(code = REALTIME_FRAME_INVALID, error = %error, "ignoring frame");
                return false;
            }
        };

        if let CableFrame::Disconnect { reason, reconnect } = &frame {
            tracing::info!(reason = ?reason, reconnect, "broker requested disconnect");
            self.mark_dropped(reason.as_deref().unwrap_or("server disconnect"));
            return false;
        }

        match self.registry.route(frame) {
            RouteOutcome::Delivered(_) => true,
            RouteOutcome::HandlerGone(key) => {
                self.send_unsubscribe(&key);
                false
            }
            RouteOutcome::Rejected(key) => {
                tracing::warn!(
                    code = REALTIME_SUBSCRIPTION_REJECTED,
                    key = %key,
                    "broker rejected subscription"
                );
                false
            }
            RouteOutcome::Ignored | RouteOutcome::Dropped => false,
        }
    }

    fn mark_dropped(&mut self, reason: &str) {
        let keys = self.registry.drain_disconnected();
        self.discard_link();
        self.state = ConnectionState::Dropped;
        tracing::warn!(
            code = REALTIME_DROPPED,
            reason,
            subscriptions = keys.len(),
            "realtime connection dropped; reconnect and re-subscribe to recover"
        );
    }

    fn send_unsubscribe(&mut self, key: &SubscriptionKey) {
        if let Some(link) = self.link.as_mut() {
            if let Err(error) = link.send(&CableCommand::unsubscribe(key)) {
                tracing::warn!(
                    code = REALTIME_SEND_FAILED,
                    key = %key,
                    error = %error,
                    "failed to send unsubscribe"
                );
            }
        }
    }

    fn discard_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close();
        }
    }
}

impl Drop for RealtimeSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for RealtimeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeSession")
            .field("cable_url", &self.cable_url.as_str())
            .field("state", &self.state)
            .field("subscriptions", &self.registry.len())
            .finish()
    }
}
