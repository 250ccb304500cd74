/// Input to the interactive chat loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// No input arrived within the poll interval; timers and frames still run.
    Tick,
    QuitRequested,
    ReconnectRequested,
    /// Fetch the next older page of history.
    OlderRequested,
    /// Send the kept draft again after a failed send.
    RetryRequested,
    /// A line of composed text, sent as one message.
    Input(String),
}

impl SessionEvent {
    /// Maps a raw input line to an event; slash commands are reserved.
    pub fn from_line(line: &str) -> Self {
        match line.trim_end_matches(['\r', '\n']) {
            "/quit" | "/q" => Self::QuitRequested,
            "/reconnect" => Self::ReconnectRequested,
            "/older" => Self::OlderRequested,
            "/retry" => Self::RetryRequested,
            text => Self::Input(text.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands_map_to_control_events() {
        assert_eq!(SessionEvent::from_line("/quit\n"), SessionEvent::QuitRequested);
        assert_eq!(SessionEvent::from_line("/q"), SessionEvent::QuitRequested);
        assert_eq!(
            SessionEvent::from_line("/reconnect"),
            SessionEvent::ReconnectRequested
        );
        assert_eq!(SessionEvent::from_line("/older"), SessionEvent::OlderRequested);
        assert_eq!(SessionEvent::from_line("/retry"), SessionEvent::RetryRequested);
    }

    #[test]
    fn other_lines_are_input_without_line_terminator() {
        assert_eq!(
            SessionEvent::from_line("see you at 10\r\n"),
            SessionEvent::Input("see you at 10".to_owned())
        );
    }
}
