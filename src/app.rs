use anyhow::{anyhow, bail, Context, Result};

use crate::{
    api::{self, RestClient},
    cli::{Cli, Command},
    domain::{self, conversation::ConversationId, message_stream::MessageStream},
    infra::{
        self,
        credentials::{Credential, TOKEN_ENV, USER_ID_ENV},
        notifications::{ConsoleNotificationSink, NoopNotificationSink},
    },
    realtime::{self, session::RealtimeSession, socket::WsConnector},
    ui::{self, chat_loop, console, StdinEventSource},
    usecases::{
        self,
        bootstrap,
        chat_session::{ChatPorts, ChatSession, OpenChat},
        context::AppContext,
        contracts::NotificationSink,
        list_conversations::list_conversations,
        load_conversation::{load_messages_page, LoadMessagesQuery},
        unread_count::unread_count,
    },
};

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        api = api::module_name(),
        realtime = realtime::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Conversations => print_conversations(&context),
        Command::Unread => {
            let client = rest_client(&context)?;
            println!("{}", unread_count(&client));
            Ok(())
        }
        Command::History {
            conversation_id,
            page,
        } => print_history(&context, ConversationId(conversation_id), page),
        Command::Chat { conversation_id } => chat(&context, ConversationId(conversation_id)),
    }
}

fn require_credential(context: &AppContext) -> Result<&Credential> {
    context.credential.as_ref().ok_or_else(|| {
        anyhow!("no credential configured; set {TOKEN_ENV} or [auth] token in the config file")
    })
}

fn rest_client(context: &AppContext) -> Result<RestClient> {
    let credential = require_credential(context)?;
    let base_url = context.config.server.api_url()?;

    RestClient::new(
        context.runtime.clone(),
        &base_url,
        credential.token.clone(),
        context.config.server.request_timeout(),
    )
    .context("failed to build HTTP client")
}

fn print_conversations(context: &AppContext) -> Result<()> {
    let client = rest_client(context)?;
    let output =
        list_conversations(&client).map_err(|error| anyhow!("could not list conversations: {error:?}"))?;

    if output.conversations.is_empty() {
        println!("No conversations yet. They open when an appointment is confirmed.");
    }
    for summary in &output.conversations {
        println!("{}", console::conversation_line(summary));
    }
    Ok(())
}

fn print_history(context: &AppContext, conversation_id: ConversationId, page: u32) -> Result<()> {
    let client = rest_client(context)?;
    let self_id = context.credential.as_ref().and_then(|c| c.user_id);

    let output = load_messages_page(&client, LoadMessagesQuery::new(conversation_id).page(page))
        .map_err(|error| anyhow!("could not load conversation {conversation_id}: {error:?}"))?;

    let mut stream = MessageStream::new(conversation_id);
    stream.prepend_older(output.messages);

    println!("-- conversation {conversation_id}, page {} --", output.page);
    for message in stream.messages() {
        println!("{}", console::message_line(message, self_id));
    }
    Ok(())
}

fn chat(context: &AppContext, conversation_id: ConversationId) -> Result<()> {
    let credential = require_credential(context)?;
    let Some(self_id) = credential.user_id else {
        bail!("chat needs the local user id; set {USER_ID_ENV} or [auth] user_id");
    };

    let client = rest_client(context)?;
    let notifier: Box<dyn NotificationSink> = if context.config.chat.notifications {
        Box::new(ConsoleNotificationSink)
    } else {
        Box::new(NoopNotificationSink)
    };
    let connector = WsConnector::new(context.runtime.clone(), context.config.server.request_timeout());
    let mut realtime = RealtimeSession::new(Box::new(connector), context.config.server.cable_url()?);

    let ports = ChatPorts {
        conversations: &client,
        sender: &client,
        notifier: notifier.as_ref(),
    };
    let mut session = ChatSession::open(
        ports,
        &mut realtime,
        Some(credential),
        OpenChat {
            conversation_id,
            self_id,
            timings: context.config.chat.typing_timings(),
        },
    )?;

    let mut events = StdinEventSource::spawn();
    let mut stdout = std::io::stdout();
    chat_loop::run(&mut session, &mut events, Some(credential), &mut stdout)
}
