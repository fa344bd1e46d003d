//! Local command - run against a PR or branch URL

use super::context::build_context;
use pr_autoupdate::error::Result;
use pr_autoupdate::outcome::Outcome;
use pr_autoupdate::router::{EventReport, execute_locally};
use std::path::Path;

/// Run the local command
pub async fn run_local(config_path: Option<&Path>, url: &str) -> Result<Outcome<EventReport>> {
    let ctx = build_context(config_path).await?;
    execute_locally(&ctx, url).await
}
