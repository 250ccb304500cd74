use std::{path::Path, sync::Arc};

use crate::{
    infra::{self, config::AppConfig, credentials, error::AppError},
    usecases::context::AppContext,
};

const APP_BOOTSTRAPPED: &str = "APP_BOOTSTRAPPED";

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config = infra::config::load(config_path)?;
    let log_guard = infra::logging::init(&config.logging)?;
    let context = build_context(config)?;

    tracing::info!(
        code = APP_BOOTSTRAPPED,
        api_url = %context.config.server.api_url,
        has_credential = context.credential.is_some(),
        "medchat bootstrapped"
    );

    Ok(AppContext::new(
        context.config,
        context.credential,
        context.runtime,
        log_guard,
    ))
}

struct BuiltContext {
    config: AppConfig,
    credential: Option<credentials::Credential>,
    runtime: Arc<tokio::runtime::Runtime>,
}

fn build_context(config: AppConfig) -> Result<BuiltContext, AppError> {
    let credential = credentials::resolve(&config.auth);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    Ok(BuiltContext {
        config,
        credential,
        runtime: Arc::new(runtime),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infra::credentials::{TOKEN_ENV, USER_ID_ENV},
        test_support::env_lock,
    };

    #[test]
    fn builds_context_from_default_config_without_credential() {
        let _guard = env_lock();
        // SAFETY: env mutation is serialized by env_lock.
        unsafe {
            std::env::remove_var(TOKEN_ENV);
            std::env::remove_var(USER_ID_ENV);
        }

        let config = infra::config::load(Some(Path::new("./missing-config.toml")))
            .expect("defaults should load");
        let context = build_context(config).expect("context should build");

        assert_eq!(context.config, AppConfig::default());
        assert!(context.credential.is_none());
    }

    #[test]
    fn picks_up_credential_from_config() {
        let _guard = env_lock();
        // SAFETY: env mutation is serialized by env_lock.
        unsafe {
            std::env::remove_var(TOKEN_ENV);
            std::env::remove_var(USER_ID_ENV);
        }
        let mut config = AppConfig::default();
        config.auth.token = Some("jwt".to_owned());
        config.auth.user_id = Some(9);

        let context = build_context(config).expect("context should build");

        let credential = context.credential.expect("credential");
        assert_eq!(credential.token, "jwt");
        assert_eq!(credential.user_id, Some(crate::domain::message::UserId(9)));
    }
}
