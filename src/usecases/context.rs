use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing_appender::non_blocking::WorkerGuard;

use crate::infra::{config::AppConfig, credentials::Credential};

/// Everything the commands need after startup.
pub struct AppContext {
    pub config: AppConfig,
    pub credential: Option<Credential>,
    pub runtime: Arc<Runtime>,
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        credential: Option<Credential>,
        runtime: Arc<Runtime>,
        log_guard: Option<WorkerGuard>,
    ) -> Self {
        Self {
            config,
            credential,
            runtime,
            _log_guard: log_guard,
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}
