use std::{collections::HashMap, sync::mpsc::Sender};

use crate::domain::channel::{ChannelEvent, ChannelStatus, SubscriptionKey, TopicKind};

use super::cable::{decode_message_payload, decode_typing_payload, CableFrame};

const FRAME_UNROUTED: &str = "REALTIME_FRAME_UNROUTED";
const FRAME_PAYLOAD_INVALID: &str = "REALTIME_FRAME_PAYLOAD_INVALID";
const HANDLER_GONE: &str = "REALTIME_HANDLER_GONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Handle for one live registration. Subscribing twice to the same key
/// returns the same handle (same id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
    key: SubscriptionKey,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn key(&self) -> SubscriptionKey {
        self.key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(Subscription),
    Existing(Subscription),
}

impl Registration {
    pub fn subscription(&self) -> &Subscription {
        match self {
            Self::Created(subscription) | Self::Existing(subscription) => subscription,
        }
    }

    pub fn into_subscription(self) -> Subscription {
        match self {
            Self::Created(subscription) | Self::Existing(subscription) => subscription,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Delivered(SubscriptionKey),
    /// Control frame with nothing to route (welcome, ping).
    Ignored,
    /// No registration for the frame's key, or the payload was invalid.
    Dropped,
    /// The handler's receiver is gone; the registration was removed and the
    /// broker should be told to unsubscribe.
    HandlerGone(SubscriptionKey),
    /// The broker refused the subscription; the registration was removed.
    Rejected(SubscriptionKey),
}

#[derive(Debug)]
struct Entry {
    subscription: Subscription,
    handler: Sender<ChannelEvent>,
    confirmed: bool,
}

/// Named subscriptions of one connection, keyed by (topic kind, conversation).
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: HashMap<SubscriptionKey, Entry>,
    next_id: u64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `key` unless the key is already registered, in
    /// which case the existing subscription is returned and `handler` is
    /// discarded.
    pub fn register(&mut self, key: SubscriptionKey, handler: Sender<ChannelEvent>) -> Registration {
        if let Some(entry) = self.entries.get(&key) {
            return Registration::Existing(entry.subscription.clone());
        }

        self.next_id += 1;
        let subscription = Subscription {
            id: SubscriptionId(self.next_id),
            key,
        };
        self.entries.insert(
            key,
            Entry {
                subscription: subscription.clone(),
                handler,
                confirmed: false,
            },
        );

        Registration::Created(subscription)
    }

    pub fn remove(&mut self, key: &SubscriptionKey) -> Option<Subscription> {
        self.entries.remove(key).map(|entry| entry.subscription)
    }

    pub fn get(&self, key: &SubscriptionKey) -> Option<&Subscription> {
        self.entries.get(key).map(|entry| &entry.subscription)
    }

    pub fn contains(&self, key: &SubscriptionKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_confirmed(&self, key: &SubscriptionKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.confirmed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<SubscriptionKey> {
        self.entries.keys().copied().collect()
    }

    /// Routes one frame to the handler registered for its exact key.
    pub fn route(&mut self, frame: CableFrame) -> RouteOutcome {
        match frame {
            CableFrame::Welcome | CableFrame::Ping | CableFrame::Disconnect { .. } => {
                RouteOutcome::Ignored
            }
            CableFrame::Confirm { identifier } => {
                let Some(key) = identifier.to_key() else {
                    return self.unrouted(&identifier.channel);
                };
                match self.entries.get_mut(&key) {
                    Some(entry) => {
                        entry.confirmed = true;
                        self.deliver(
                            key,
                            ChannelEvent::Lifecycle {
                                key,
                                status: ChannelStatus::Connected,
                            },
                        )
                    }
                    None => self.unrouted(&key.to_string()),
                }
            }
            CableFrame::Reject { identifier } => {
                let Some(key) = identifier.to_key() else {
                    return self.unrouted(&identifier.channel);
                };
                match self.entries.remove(&key) {
                    Some(entry) => {
                        let _ = entry.handler.send(ChannelEvent::Lifecycle {
                            key,
                            status: ChannelStatus::Rejected,
                        });
                        RouteOutcome::Rejected(key)
                    }
                    None => self.unrouted(&key.to_string()),
                }
            }
            CableFrame::Broadcast {
                identifier,
                payload,
            } => {
                let Some(key) = identifier.to_key() else {
                    return self.unrouted(&identifier.channel);
                };
                if !self.entries.contains_key(&key) {
                    return self.unrouted(&key.to_string());
                }

                let event = match key.kind {
                    TopicKind::Message => {
                        decode_message_payload(payload).map(|message| ChannelEvent::Message {
                            conversation_id: key.conversation_id,
                            message,
                        })
                    }
                    TopicKind::Typing => {
                        decode_typing_payload(payload).map(|ping| ChannelEvent::Typing {
                            conversation_id: key.conversation_id,
                            ping,
                        })
                    }
                };

                match event {
                    Ok(event) => self.deliver(key, event),
                    Err(error) => {
                        tracing::warn!(
                            code = FRAME_PAYLOAD_INVALID,
                            key = %key,
                            error = %error,
                            "dropping realtime frame with invalid payload"
                        );
                        RouteOutcome::Dropped
                    }
                }
            }
        }
    }

    /// Notifies every handler that its channel is gone and empties the
    /// registry. Returns the removed keys.
    pub fn drain_disconnected(&mut self) -> Vec<SubscriptionKey> {
        self.entries
            .drain()
            .map(|(key, entry)| {
                let _ = entry.handler.send(ChannelEvent::Lifecycle {
                    key,
                    status: ChannelStatus::Disconnected,
                });
                key
            })
            .collect()
    }

    fn deliver(&mut self, key: SubscriptionKey, event: ChannelEvent) -> RouteOutcome {
        let delivered = self
            .entries
            .get(&key)
            .is_some_and(|entry| entry.handler.send(event).is_ok());

        if delivered {
            return RouteOutcome::Delivered(key);
        }

        self.entries.remove(&key);
        tracing::warn!(
            code = HANDLER_GONE,
            key = %key,
            "subscription handler dropped; removing registration"
        );
        RouteOutcome::HandlerGone(key)
    }

    fn unrouted(&self, target: &str) -> RouteOutcome {
        tracing::debug!(
            code = FRAME_UNROUTED,
            target,
            "realtime frame has no registered subscription"
        );
        RouteOutcome::Dropped
    }
}
