//! Shared setup for CLI commands

use pr_autoupdate::auth::get_github_auth;
use pr_autoupdate::config::Config;
use pr_autoupdate::context::Context;
use pr_autoupdate::error::Result;
use pr_autoupdate::platform::GitHubService;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Build the invocation context
///
/// - Load config (file, then environment)
/// - Resolve the GitHub token
/// - Create the GitHub service
pub async fn build_context(config_path: Option<&Path>) -> Result<Context> {
    let config = Config::load(config_path)?;
    debug!(automerge = %config.automerge, "loaded config");

    let auth = get_github_auth().await?;
    debug!(source = ?auth.source, "resolved GitHub token");

    let platform = GitHubService::new(&auth.token, config.github_host.as_deref())?;
    Ok(Context::new(Arc::new(platform), auth.token, config))
}
