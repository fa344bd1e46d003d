//! Action command - handle a webhook event from a GitHub Actions run

use super::context::build_context;
use pr_autoupdate::error::{Error, Result};
use pr_autoupdate::event::EventName;
use pr_autoupdate::outcome::Outcome;
use pr_autoupdate::router::{EventReport, execute_github_action};
use std::path::Path;

/// Run the action command
pub async fn run_action(
    config_path: Option<&Path>,
    event_name: &str,
    event_path: &Path,
) -> Result<Outcome<EventReport>> {
    // Reject unsupported events before touching credentials
    event_name.parse::<EventName>()?;

    let content = tokio::fs::read_to_string(event_path).await.map_err(|e| {
        Error::InvalidArguments(format!("failed to read {}: {e}", event_path.display()))
    })?;
    let payload: serde_json::Value = serde_json::from_str(&content)?;

    let ctx = build_context(config_path).await?;
    execute_github_action(&ctx, event_name, payload).await
}
