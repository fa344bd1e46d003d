//! Per-invocation context shared by all handlers

use crate::config::Config;
use crate::logging::{Logger, TracingLogger};
use crate::platform::PlatformService;
use std::sync::Arc;

/// Everything a handler needs for one invocation
///
/// Built once and only read afterwards; nothing in here changes while a
/// batch is being processed.
#[derive(Clone)]
pub struct Context {
    /// Host API client
    pub platform: Arc<dyn PlatformService>,
    /// Access token, used to build clone URLs
    pub token: String,
    /// Runtime configuration
    pub config: Config,
    /// Log sink
    pub logger: Arc<dyn Logger>,
}

impl Context {
    /// Create a context that logs through `tracing`
    pub fn new(platform: Arc<dyn PlatformService>, token: impl Into<String>, config: Config) -> Self {
        Self {
            platform,
            token: token.into(),
            config,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the log sink
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Authenticated clone URL for `owner/name`
    pub fn clone_url(&self, full_name: &str) -> String {
        format!(
            "https://x-access-token:{}@{}/{full_name}.git",
            self.token,
            self.config.web_host()
        )
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("token", &"<redacted>")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
