use std::{io::Write, time::Instant};

use anyhow::Result;

use crate::{
    domain::events::SessionEvent,
    infra::credentials::Credential,
    usecases::{chat_session::ChatSession, contracts::SessionEventSource},
};

use super::console;

const CHAT_LOOP_STARTED: &str = "UI_CHAT_LOOP_STARTED";
const CHAT_LOOP_STOPPED: &str = "UI_CHAT_LOOP_STOPPED";

/// Runs an open chat until `/quit` or end of input, then closes the session.
pub fn run(
    session: &mut ChatSession<'_>,
    events: &mut dyn SessionEventSource,
    credential: Option<&Credential>,
    out: &mut dyn Write,
) -> Result<()> {
    tracing::info!(
        code = CHAT_LOOP_STARTED,
        conversation_id = %session.conversation_id(),
        "starting chat loop"
    );

    writeln!(out, "{}", console::chat_header(session.other_user(), session.appointment()))?;
    for message in session.messages() {
        writeln!(out, "{}", console::message_line(message, Some(session.self_id())))?;
    }

    while let Some(event) = events.next_event()? {
        match event {
            SessionEvent::QuitRequested => break,
            SessionEvent::Tick => {}
            SessionEvent::Input(text) => {
                session.on_keystroke(text, Instant::now());
                send_draft(session, out)?;
            }
            SessionEvent::RetryRequested => send_draft(session, out)?,
            SessionEvent::OlderRequested => match session.load_older() {
                Ok(0) => writeln!(out, "(no older messages)")?,
                Ok(added) => {
                    writeln!(out, "-- {added} older messages --")?;
                    for message in session.messages().iter().take(added) {
                        writeln!(out, "{}", console::message_line(message, Some(session.self_id())))?;
                    }
                }
                Err(error) => writeln!(out, "! {error}")?,
            },
            SessionEvent::ReconnectRequested => match session.reconnect(credential) {
                Ok(()) => writeln!(
                    out,
                    "-- {} ({} messages) --",
                    console::connection_line(session.connection_state()),
                    session.messages().len()
                )?,
                Err(error) => writeln!(out, "! {error}")?,
            },
        }

        render_updates(session, out)?;
    }

    session.close();
    tracing::info!(code = CHAT_LOOP_STOPPED, "chat loop stopped");
    Ok(())
}

fn send_draft(session: &mut ChatSession<'_>, out: &mut dyn Write) -> Result<()> {
    if let Err(error) = session.send_draft() {
        writeln!(out, "{}", console::send_error_line(&error))?;
    }
    Ok(())
}

fn render_updates(session: &mut ChatSession<'_>, out: &mut dyn Write) -> Result<()> {
    let updates = session.pump(Instant::now());
    let other_name = session.other_user().name.clone();

    for update in &updates {
        if let Some(line) = console::update_line(update, &other_name, session.self_id()) {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()?;
    Ok(())
}
