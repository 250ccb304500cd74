/// Lifecycle of the realtime transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    /// The socket went away without a local `disconnect`; recovery is up to
    /// the caller (reconnect, then re-subscribe).
    Dropped,
}

impl ConnectionState {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Disconnected => "CONNECTION_DISCONNECTED",
            Self::Connected => "CONNECTION_CONNECTED",
            Self::Dropped => "CONNECTION_DROPPED",
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}
