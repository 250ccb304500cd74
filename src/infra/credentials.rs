use std::env;

use crate::{domain::message::UserId, infra::config::AuthConfig};

pub const TOKEN_ENV: &str = "MEDCHAT_TOKEN";
pub const USER_ID_ENV: &str = "MEDCHAT_USER_ID";

/// Bearer credential for REST calls and the realtime broker.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub user_id: Option<UserId>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Resolves the credential from the environment first, then config.
/// Returns `None` when no non-empty token is available.
pub fn resolve(config: &AuthConfig) -> Option<Credential> {
    let token = non_blank(env::var(TOKEN_ENV).ok())
        .or_else(|| non_blank(config.token.clone()))?;

    let user_id = match env::var(USER_ID_ENV) {
        Ok(raw) => match raw.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(error) => {
                tracing::warn!(env = USER_ID_ENV, error = %error, "ignoring unparsable user id");
                config.user_id
            }
        },
        Err(_) => config.user_id,
    };

    Some(Credential {
        token,
        user_id: user_id.map(UserId),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env_lock;

    fn clear_env() {
        // SAFETY: env is guarded by process-wide test mutex.
        unsafe {
            env::remove_var(TOKEN_ENV);
            env::remove_var(USER_ID_ENV);
        }
    }

    #[test]
    fn returns_none_without_any_token() {
        let _guard = env_lock();
        clear_env();

        assert_eq!(resolve(&AuthConfig::default()), None);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let _guard = env_lock();
        clear_env();

        let config = AuthConfig {
            token: Some("   ".to_owned()),
            user_id: Some(3),
        };

        assert_eq!(resolve(&config), None);
    }

    #[test]
    fn environment_overrides_config() {
        let _guard = env_lock();
        clear_env();
        // SAFETY: env is guarded by process-wide test mutex.
        unsafe {
            env::set_var(TOKEN_ENV, "env-token");
            env::set_var(USER_ID_ENV, "99");
        }

        let config = AuthConfig {
            token: Some("file-token".to_owned()),
            user_id: Some(3),
        };
        let credential = resolve(&config).expect("credential should resolve");
        clear_env();

        assert_eq!(credential.token, "env-token");
        assert_eq!(credential.user_id, Some(UserId(99)));
    }

    #[test]
    fn empty_env_token_falls_back_to_config() {
        let _guard = env_lock();
        clear_env();
        // SAFETY: env is guarded by process-wide test mutex.
        unsafe {
            env::set_var(TOKEN_ENV, "");
        }

        let config = AuthConfig {
            token: Some("file-token".to_owned()),
            user_id: Some(3),
        };
        let credential = resolve(&config);
        clear_env();

        assert_eq!(
            credential.map(|credential| credential.token),
            Some("file-token".to_owned())
        );
    }

    #[test]
    fn debug_output_never_shows_the_token() {
        let credential = Credential {
            token: "very-secret".to_owned(),
            user_id: None,
        };

        assert!(!format!("{credential:?}").contains("very-secret"));
    }
}
