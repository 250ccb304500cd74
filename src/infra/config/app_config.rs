use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use url::Url;

use crate::{domain::typing::TypingTimings, infra::error::AppError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// When set, logs go to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub api_url: String,
    pub cable_url: String,
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn api_url(&self) -> Result<Url, AppError> {
        parse_url(&self.api_url)
    }

    pub fn cable_url(&self) -> Result<Url, AppError> {
        parse_url(&self.cable_url)
    }
}

fn parse_url(raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|source| AppError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000/api/v1".to_owned(),
            cable_url: "ws://127.0.0.1:3000/cable".to_owned(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Credential material. Read-only: nothing in the client writes it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    pub typing_quiet_ms: u64,
    pub typing_decay_ms: u64,
    pub notifications: bool,
}

impl ChatConfig {
    pub fn typing_timings(&self) -> TypingTimings {
        TypingTimings {
            quiet_period: Duration::from_millis(self.typing_quiet_ms),
            decay: Duration::from_millis(self.typing_decay_ms),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_quiet_ms: 2_000,
            typing_decay_ms: 3_000,
            notifications: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chat_timings_match_reference_windows() {
        let timings = ChatConfig::default().typing_timings();

        assert_eq!(timings, TypingTimings::default());
    }

    #[test]
    fn default_server_urls_parse() {
        let server = ServerConfig::default();

        assert_eq!(server.api_url().expect("api url").path(), "/api/v1");
        assert_eq!(server.cable_url().expect("cable url").scheme(), "ws");
    }

    #[test]
    fn malformed_url_is_reported_with_its_value() {
        let server = ServerConfig {
            cable_url: "not a url".to_owned(),
            ..ServerConfig::default()
        };

        assert!(matches!(
            server.cable_url(),
            Err(AppError::InvalidUrl { url, .. }) if url == "not a url"
        ));
    }
}
