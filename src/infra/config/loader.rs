use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const APP_CONFIG_DIR: &str = "medchat";

/// Loads the config file over built-in defaults. A missing file yields the
/// defaults; an unreadable or malformed one is an error.
pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_config_path(dirs::config_dir()));

    let mut config = AppConfig::default();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "config file absent, using defaults");
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    Ok(config)
}

/// `./config.toml` when present, otherwise `<user config dir>/medchat/config.toml`.
fn default_config_path(user_config_dir: Option<PathBuf>) -> PathBuf {
    let local = PathBuf::from(DEFAULT_CONFIG_PATH);
    if local.exists() {
        return local;
    }

    user_config_dir
        .map(|dir| dir.join(APP_CONFIG_DIR).join(DEFAULT_CONFIG_PATH))
        .unwrap_or(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("config fixture should be writable");
        (dir, path)
    }

    #[test]
    fn returns_defaults_when_file_is_missing() {
        let config = load(Some(Path::new("./missing-config.toml"))).expect("config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn merges_file_values_over_defaults() {
        let (_dir, path) = write_config(
            r#"[logging]
level = "debug"

[server]
api_url = "https://clinic.example/api/v1"
cable_url = "wss://clinic.example/cable"

[auth]
user_id = 12

[chat]
typing_decay_ms = 4500
notifications = false
"#,
        );

        let config = load(Some(&path)).expect("config must load");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.server.api_url, "https://clinic.example/api/v1");
        assert_eq!(config.server.cable_url, "wss://clinic.example/cable");
        assert_eq!(config.server.request_timeout_ms, 10_000);
        assert_eq!(config.auth.user_id, Some(12));
        assert_eq!(config.auth.token, None);
        assert_eq!(config.chat.typing_quiet_ms, 2_000);
        assert_eq!(config.chat.typing_decay_ms, 4_500);
        assert!(!config.chat.notifications);
    }

    #[test]
    fn falls_back_to_user_config_dir() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");

        let path = default_config_path(Some(dir.path().to_path_buf()));

        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            assert_eq!(path, dir.path().join("medchat").join("config.toml"));
        }
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let (_dir, path) = write_config("[server]\napi_url = 42\n");

        let err = load(Some(&path)).expect_err("invalid types must fail");

        assert!(matches!(err, AppError::ConfigParse { .. }));
    }
}
