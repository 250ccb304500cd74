//! Screen-scoped chat orchestration.
//!
//! A `ChatSession` owns everything one open conversation needs: the message
//! reducer, the typing coordinator with its two timers, the draft and the two
//! realtime subscriptions. Closing it (explicitly or by dropping it) cancels
//! the timers and unsubscribes both keys.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    time::Instant,
};

use thiserror::Error;

use crate::{
    domain::{
        channel::{ChannelEvent, ChannelStatus, SubscriptionKey, TopicKind},
        conversation::{AppointmentRef, ConversationId, Participant},
        message::{Message, UserId},
        message_stream::{InboundOutcome, MessageStream},
        status::ConnectionState,
        typing::{KeystrokeOutcome, RemotePingOutcome, TypingIndicator, TypingTimings},
    },
    infra::{credentials::Credential, notifications::LocalNotification},
    realtime::{session::RealtimeSession, RealtimeError},
};

use super::{
    contracts::NotificationSink,
    load_conversation::{
        load_conversation, load_messages_page, ConversationSource, LoadConversationError,
        LoadMessagesQuery,
    },
    send_message::{
        send_message, send_typing_ping, MessageSender, SendMessageCommand, SendMessageError,
    },
};

const CHAT_SESSION_OPENED: &str = "CHAT_SESSION_OPENED";
const CHAT_SESSION_CLOSED: &str = "CHAT_SESSION_CLOSED";
const CHAT_SESSION_RESUBSCRIBED: &str = "CHAT_SESSION_RESUBSCRIBED";
const NOTIFICATION_FAILED: &str = "LOCAL_NOTIFICATION_FAILED";

/// Ports a chat session talks to.
#[derive(Clone, Copy)]
pub struct ChatPorts<'a> {
    pub conversations: &'a dyn ConversationSource,
    pub sender: &'a dyn MessageSender,
    pub notifier: &'a dyn NotificationSink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenChat {
    pub conversation_id: ConversationId,
    pub self_id: UserId,
    pub timings: TypingTimings,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatSessionError {
    #[error("failed to load conversation: {0:?}")]
    Load(LoadConversationError),
    #[error(transparent)]
    Realtime(#[from] RealtimeError),
    #[error("chat session is closed")]
    Closed,
}

/// Something the UI should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatUpdate {
    MessageAppended(Message),
    OtherTypingChanged(bool),
    ChannelStatus {
        key: SubscriptionKey,
        status: ChannelStatus,
    },
    ConnectionDropped,
}

pub struct ChatSession<'a> {
    conversation_id: ConversationId,
    self_id: UserId,
    ports: ChatPorts<'a>,
    realtime: &'a mut RealtimeSession,
    other_user: Participant,
    appointment: AppointmentRef,
    stream: MessageStream,
    typing: TypingIndicator,
    draft: String,
    events_tx: Sender<ChannelEvent>,
    events_rx: Receiver<ChannelEvent>,
    next_page: u32,
    closed: bool,
}

impl<'a> ChatSession<'a> {
    /// Loads history, seeds the reducer, connects if needed and subscribes
    /// both topics of the conversation.
    pub fn open(
        ports: ChatPorts<'a>,
        realtime: &'a mut RealtimeSession,
        credential: Option<&Credential>,
        request: OpenChat,
    ) -> Result<Self, ChatSessionError> {
        let conversation = load_conversation(ports.conversations, request.conversation_id)
            .map_err(ChatSessionError::Load)?;

        let mut stream = MessageStream::new(request.conversation_id);
        stream.replace_history(conversation.messages);

        let (events_tx, events_rx) = mpsc::channel();
        let mut session = Self {
            conversation_id: request.conversation_id,
            self_id: request.self_id,
            ports,
            realtime,
            other_user: conversation.other_user,
            appointment: conversation.appointment,
            stream,
            typing: TypingIndicator::new(request.self_id, request.timings),
            draft: String::new(),
            events_tx,
            events_rx,
            next_page: 2,
            closed: false,
        };

        session.realtime.connect(credential)?;
        session.subscribe_all()?;

        tracing::info!(
            code = CHAT_SESSION_OPENED,
            conversation_id = %session.conversation_id,
            messages = session.stream.len(),
            "chat session opened"
        );

        Ok(session)
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    pub fn self_id(&self) -> UserId {
        self.self_id
    }

    pub fn other_user(&self) -> &Participant {
        &self.other_user
    }

    pub fn appointment(&self) -> &AppointmentRef {
        &self.appointment
    }

    pub fn messages(&self) -> &[Message] {
        self.stream.messages()
    }

    pub fn is_other_typing(&self) -> bool {
        self.typing.is_other_typing()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.realtime.state()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Earliest timer deadline, for sizing the caller's wait.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.typing.next_deadline()
    }

    /// Drains the socket, applies every event for this conversation and then
    /// any timers due at `now`.
    pub fn pump(&mut self, now: Instant) -> Vec<ChatUpdate> {
        if self.closed {
            return Vec::new();
        }

        let report = self.realtime.pump();

        let mut updates = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            updates.extend(self.handle_channel_event(event, now));
        }
        if report.dropped_connection {
            updates.push(ChatUpdate::ConnectionDropped);
        }
        updates.extend(self.poll_timers(now));

        updates
    }

    /// Applies one inbound realtime event. Events for other conversations
    /// are ignored.
    pub fn handle_channel_event(&mut self, event: ChannelEvent, now: Instant) -> Option<ChatUpdate> {
        if self.closed || event.conversation_id() != self.conversation_id {
            return None;
        }

        match event {
            ChannelEvent::Message { message, .. } => {
                match self.stream.apply_inbound(message.clone()) {
                    InboundOutcome::Duplicate => None,
                    InboundOutcome::Appended => {
                        if !message.is_authored_by(self.self_id) {
                            self.notify(&message);
                        }
                        Some(ChatUpdate::MessageAppended(message))
                    }
                }
            }
            ChannelEvent::Typing { ping, .. } => match self.typing.on_remote_ping(ping.user_id, now) {
                RemotePingOutcome::Started => Some(ChatUpdate::OtherTypingChanged(true)),
                RemotePingOutcome::Extended | RemotePingOutcome::IgnoredSelf => None,
            },
            ChannelEvent::Lifecycle { key, status } => Some(ChatUpdate::ChannelStatus { key, status }),
        }
    }

    /// Records the current draft. The first keystroke after an idle period
    /// sends one typing ping; later ones only push the quiet deadline out.
    pub fn on_keystroke(&mut self, draft: impl Into<String>, now: Instant) -> KeystrokeOutcome {
        self.draft = draft.into();
        if self.closed {
            return KeystrokeOutcome::Debounced;
        }

        let outcome = self.typing.on_keystroke(now);
        if outcome == KeystrokeOutcome::EmitPing {
            send_typing_ping(self.ports.sender, self.conversation_id);
        }
        outcome
    }

    /// Sends the draft. On success the draft is cleared; on any failure it is
    /// kept so the caller can retry.
    pub fn send_draft(&mut self) -> Result<(), SendMessageError> {
        send_message(
            self.ports.sender,
            SendMessageCommand {
                conversation_id: self.conversation_id,
                text: self.draft.clone(),
            },
        )?;

        self.draft.clear();
        Ok(())
    }

    pub fn poll_timers(&mut self, now: Instant) -> Vec<ChatUpdate> {
        let expiry = self.typing.poll(now);

        let mut updates = Vec::new();
        if expiry.other_stopped {
            updates.push(ChatUpdate::OtherTypingChanged(false));
        }
        updates
    }

    /// Replaces the list with the server history. Safe to repeat.
    pub fn reload_history(&mut self) -> Result<(), ChatSessionError> {
        let conversation = load_conversation(self.ports.conversations, self.conversation_id)
            .map_err(ChatSessionError::Load)?;

        self.stream.replace_history(conversation.messages);
        self.next_page = 2;
        Ok(())
    }

    /// Fetches the next older page and merges it in front of the list.
    /// Returns how many messages were new.
    pub fn load_older(&mut self) -> Result<usize, ChatSessionError> {
        let output = load_messages_page(
            self.ports.conversations,
            LoadMessagesQuery::new(self.conversation_id).page(self.next_page),
        )
        .map_err(ChatSessionError::Load)?;

        let added = self.stream.prepend_older(output.messages);
        self.next_page = output.page + 1;
        Ok(added)
    }

    /// Caller-driven recovery after a drop: connect, re-subscribe both keys
    /// and reconcile through a history reload.
    pub fn reconnect(&mut self, credential: Option<&Credential>) -> Result<(), ChatSessionError> {
        if self.closed {
            return Err(ChatSessionError::Closed);
        }

        self.realtime.connect(credential)?;
        self.subscribe_all()?;
        self.reload_history()?;

        tracing::info!(
            code = CHAT_SESSION_RESUBSCRIBED,
            conversation_id = %self.conversation_id,
            "chat session resubscribed"
        );
        Ok(())
    }

    /// Cancels both timers and unsubscribes both keys. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.typing.cancel_all();
        for kind in TopicKind::ALL {
            self.realtime
                .unsubscribe(&SubscriptionKey::new(kind, self.conversation_id));
        }

        tracing::info!(
            code = CHAT_SESSION_CLOSED,
            conversation_id = %self.conversation_id,
            "chat session closed"
        );
    }

    fn subscribe_all(&mut self) -> Result<(), RealtimeError> {
        for kind in TopicKind::ALL {
            self.realtime
                .subscribe(kind, self.conversation_id, self.events_tx.clone())?;
        }
        Ok(())
    }

    fn notify(&self, message: &Message) {
        let title = if message.author_name.is_empty() {
            self.other_user.name.clone()
        } else {
            message.author_name.clone()
        };
        let notification = LocalNotification {
            title,
            body: message.content.clone(),
            conversation_id: self.conversation_id,
        };

        if let Err(error) = self.ports.notifier.notify(&notification) {
            tracing::warn!(
                code = NOTIFICATION_FAILED,
                conversation_id = %self.conversation_id,
                error = %error,
                "local notification failed; ignoring"
            );
        }
    }
}

impl Drop for ChatSession<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::{
        domain::typing::SelfTypingState,
        infra::notifications::RecordingNotificationSink,
        realtime::{
            cable::ChannelIdentifier,
            session::{fake, LinkEvent},
        },
        test_support::message,
        usecases::{
            load_conversation::{stub::StubConversationSource, ConversationSourceError},
            send_message::{stub::StubSender, SendMessageSourceError},
        },
    };

    const SELF: UserId = UserId(1);
    const OTHER: UserId = UserId(2);
    const CONVERSATION: ConversationId = ConversationId(42);

    fn credential() -> Credential {
        Credential {
            token: "jwt".to_owned(),
            user_id: Some(SELF),
        }
    }

    fn request() -> OpenChat {
        OpenChat {
            conversation_id: CONVERSATION,
            self_id: SELF,
            timings: TypingTimings::default(),
        }
    }

    fn message_event(id: i64, author: i64) -> ChannelEvent {
        ChannelEvent::Message {
            conversation_id: CONVERSATION,
            message: message(id, author, "hola"),
        }
    }

    fn typing_event(author: UserId) -> ChannelEvent {
        ChannelEvent::Typing {
            conversation_id: CONVERSATION,
            ping: crate::domain::channel::TypingPing { user_id: author },
        }
    }

    struct Fixture {
        source: StubConversationSource,
        sender: StubSender,
        notifier: RecordingNotificationSink,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                source: StubConversationSource::with_messages(
                    42,
                    vec![message(1, 1, "hola"), message(2, 2, "buenas")],
                ),
                sender: StubSender::accepting(),
                notifier: RecordingNotificationSink::default(),
            }
        }

        fn ports(&self) -> ChatPorts<'_> {
            ChatPorts {
                conversations: &self.source,
                sender: &self.sender,
                notifier: &self.notifier,
            }
        }
    }

    #[test]
    fn open_seeds_history_and_subscribes_both_topics() {
        let fixture = Fixture::new();
        let (mut realtime, broker) = fake::session();

        let session = ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
            .expect("open");

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.other_user().name, "Dr. Ruiz");
        assert_eq!(broker.borrow().subscribe_commands(), 2);
        assert_eq!(session.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn open_without_credential_fails_with_authentication_error() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();

        let result = ChatSession::open(fixture.ports(), &mut realtime, None, request());

        assert!(matches!(
            result,
            Err(ChatSessionError::Realtime(RealtimeError::Authentication))
        ));
    }

    #[test]
    fn failed_history_load_does_not_touch_the_broker() {
        let mut fixture = Fixture::new();
        fixture.source = StubConversationSource::failing(ConversationSourceError::NotFound);
        let (mut realtime, broker) = fake::session();

        let result = ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request());

        assert!(matches!(
            result,
            Err(ChatSessionError::Load(LoadConversationError::ConversationNotFound))
        ));
        assert!(broker.borrow().opened_urls.is_empty());
    }

    #[test]
    fn echo_of_loaded_message_is_dropped_without_notification() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");

        let update = session.handle_channel_event(message_event(2, 2), Instant::now());

        assert_eq!(update, None);
        let ids: Vec<i64> = session.messages().iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(fixture.notifier.shown().is_empty());
    }

    #[test]
    fn message_from_other_participant_appends_and_notifies_once() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");
        let now = Instant::now();

        let first = session.handle_channel_event(message_event(3, 2), now);
        let again = session.handle_channel_event(message_event(3, 2), now);

        assert!(matches!(first, Some(ChatUpdate::MessageAppended(_))));
        assert_eq!(again, None);
        let shown = fixture.notifier.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "user-2");
        assert_eq!(shown[0].body, "hola");
        assert_eq!(shown[0].conversation_id, CONVERSATION);
    }

    #[test]
    fn own_message_echo_appends_without_notification() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");

        let update = session.handle_channel_event(message_event(3, 1), Instant::now());

        assert!(matches!(update, Some(ChatUpdate::MessageAppended(_))));
        assert!(fixture.notifier.shown().is_empty());
    }

    #[test]
    fn failing_notifier_does_not_block_delivery() {
        let mut fixture = Fixture::new();
        fixture.notifier = RecordingNotificationSink::failing();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");

        let update = session.handle_channel_event(message_event(3, 2), Instant::now());

        assert!(matches!(update, Some(ChatUpdate::MessageAppended(_))));
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn events_for_other_conversations_are_ignored() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");

        let update = session.handle_channel_event(
            ChannelEvent::Message {
                conversation_id: ConversationId(7),
                message: message(9, 2, "elsewhere"),
            },
            Instant::now(),
        );

        assert_eq!(update, None);
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn remote_typing_decays_once_per_burst() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");
        let t0 = Instant::now();

        assert_eq!(
            session.handle_channel_event(typing_event(OTHER), t0),
            Some(ChatUpdate::OtherTypingChanged(true))
        );
        assert_eq!(
            session.handle_channel_event(typing_event(OTHER), t0 + Duration::from_secs(2)),
            None
        );

        assert!(session.poll_timers(t0 + Duration::from_secs(4)).is_empty());
        assert!(session.is_other_typing());
        assert_eq!(
            session.poll_timers(t0 + Duration::from_secs(5)),
            vec![ChatUpdate::OtherTypingChanged(false)]
        );
        assert!(session.poll_timers(t0 + Duration::from_secs(9)).is_empty());
    }

    #[test]
    fn late_ping_without_polling_announces_a_new_burst() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");
        let t0 = Instant::now();

        session.handle_channel_event(typing_event(OTHER), t0);

        assert_eq!(
            session.handle_channel_event(typing_event(OTHER), t0 + Duration::from_secs(10)),
            Some(ChatUpdate::OtherTypingChanged(true))
        );
    }

    #[test]
    fn own_typing_ping_never_sets_other_typing() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");

        assert_eq!(session.handle_channel_event(typing_event(SELF), Instant::now()), None);
        assert!(!session.is_other_typing());
    }

    #[test]
    fn keystroke_burst_sends_a_single_typing_ping() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");
        let t0 = Instant::now();

        for step in 0..10u64 {
            session.on_keystroke("h".repeat(step as usize + 1), t0 + Duration::from_millis(step * 300));
        }
        assert_eq!(fixture.sender.typing_pings.borrow().len(), 1);

        let idle_at = t0 + Duration::from_millis(9 * 300) + Duration::from_secs(2);
        session.poll_timers(idle_at);
        assert_eq!(session.typing.self_state(), SelfTypingState::Idle);

        session.on_keystroke("again", idle_at + Duration::from_millis(10));
        assert_eq!(fixture.sender.typing_pings.borrow().len(), 2);
    }

    #[test]
    fn empty_draft_is_rejected_without_a_request() {
        let fixture = Fixture::new();
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");
        session.on_keystroke("   ", Instant::now());

        assert_eq!(session.send_draft(), Err(SendMessageError::EmptyMessage));
        assert!(fixture.sender.sent.borrow().is_empty());
    }

    #[test]
    fn failed_send_keeps_draft_and_success_clears_it() {
        let fixture = Fixture::new();
        *fixture.sender.result.borrow_mut() = Err(SendMessageSourceError::Unavailable);
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");
        session.on_keystroke("see you at 10", Instant::now());

        assert_eq!(
            session.send_draft(),
            Err(SendMessageError::TemporarilyUnavailable)
        );
        assert_eq!(session.draft(), "see you at 10");

        *fixture.sender.result.borrow_mut() = Ok(());
        session.send_draft().expect("retry");

        assert_eq!(session.draft(), "");
        assert_eq!(fixture.sender.sent.borrow().len(), 2);
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn pump_routes_broker_frames_into_the_stream() {
        let fixture = Fixture::new();
        let (mut realtime, broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");
        broker.borrow_mut().push_text(
            json!({
                "identifier": ChannelIdentifier::for_key(&SubscriptionKey::message(CONVERSATION)).encode(),
                "message": {"id": 5, "content": "llego tarde", "user_id": 2, "user_name": "Dr. Ruiz", "created_at": ""}
            })
            .to_string(),
        );

        let updates = session.pump(Instant::now());

        assert_eq!(updates.len(), 1);
        assert_eq!(session.messages().len(), 3);
        assert_eq!(fixture.notifier.shown()[0].title, "Dr. Ruiz");
    }

    #[test]
    fn drop_then_reconnect_resubscribes_and_reloads_history() {
        let fixture = Fixture::new();
        let (mut realtime, broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");
        broker.borrow_mut().inbound.push_back(LinkEvent::Closed {
            reason: "wifi".to_owned(),
        });

        let updates = session.pump(Instant::now());

        assert!(updates.contains(&ChatUpdate::ConnectionDropped));
        assert_eq!(session.connection_state(), ConnectionState::Dropped);

        fixture
            .source
            .set_messages(42, vec![message(1, 1, "hola"), message(2, 2, "buenas"), message(3, 2, "?")]);
        session.reconnect(Some(&credential())).expect("reconnect");

        assert_eq!(session.connection_state(), ConnectionState::Connected);
        assert_eq!(broker.borrow().subscribe_commands(), 4);
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn load_older_prepends_and_advances_page() {
        let mut fixture = Fixture::new();
        fixture.source.page = Ok(vec![message(-1, 2, "older"), message(1, 1, "hola")]);
        let (mut realtime, _broker) = fake::session();
        let mut session =
            ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                .expect("open");

        let added = session.load_older().expect("older");

        assert_eq!(added, 1);
        assert_eq!(session.messages()[0].content, "older");
        assert_eq!(*fixture.source.captured_page.borrow(), Some(2));
        assert_eq!(session.next_page, 3);
    }

    #[test]
    fn close_unsubscribes_both_keys_and_cancels_timers_once() {
        let fixture = Fixture::new();
        let (mut realtime, broker) = fake::session();
        {
            let mut session =
                ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                    .expect("open");
            let now = Instant::now();
            session.on_keystroke("h", now);
            session.handle_channel_event(typing_event(OTHER), now);

            session.close();
            session.close();

            assert!(session.is_closed());
            assert!(!session.typing.has_pending_timers());
            assert!(!session.is_other_typing());
        }

        assert_eq!(broker.borrow().unsubscribe_commands(), 2);
        assert_eq!(realtime.subscription_count(), 0);
    }

    #[test]
    fn dropping_the_session_tears_it_down() {
        let fixture = Fixture::new();
        let (mut realtime, broker) = fake::session();
        {
            let _session =
                ChatSession::open(fixture.ports(), &mut realtime, Some(&credential()), request())
                    .expect("open");
        }

        assert_eq!(broker.borrow().unsubscribe_commands(), 2);
        assert!(realtime.is_connected());
        assert_eq!(realtime.subscription_count(), 0);
    }
}
