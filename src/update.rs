//! Per-PR update decision
//!
//! Decides, for one PR, whether to bring its head branch up to date with
//! its base, leave it as it is, or skip it. The checks run in a fixed
//! order and the first one that applies wins:
//!
//! 1. closed PR → neutral
//! 2. merged PR → neutral
//! 3. head and base in different repositories → neutral
//! 4. `behind` → catch-up merge of base into head
//! 5. `clean` / `has_hooks` → nothing to do, head is current
//! 6. any other `mergeable_state` → neutral

use crate::context::Context;
use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::types::{BranchMergeResult, MergeableState, PrState, PullRequest};
use std::path::Path;
use std::time::Duration;

/// Timeout for each request to the host
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Bring one PR up to date with its base branch
///
/// Returns the head SHA the PR ends up at, which is what a subsequent merge
/// into base must be pinned to. `dir` is the scratch directory reserved for
/// this PR and `clone_url` the authenticated URL of its repository; both
/// have to be present, a missing one is a wiring bug and fails hard.
pub async fn update_pull_request(
    ctx: &Context,
    dir: &Path,
    clone_url: &str,
    pr: &PullRequest,
) -> Result<Outcome<String>> {
    ctx.logger.info(&format!("Updating PR {pr}"));

    if !dir.is_dir() {
        return Err(Error::InvalidArguments(format!(
            "scratch directory {} does not exist",
            dir.display()
        )));
    }
    if clone_url.is_empty() {
        return Err(Error::InvalidArguments("clone URL is empty".to_string()));
    }

    if let Some(reason) = skip_reason(pr) {
        ctx.logger.info(&reason);
        return Ok(Outcome::Neutral(reason));
    }

    let state = pull_request_state(ctx, pr).await?;
    match state {
        MergeableState::Behind => catch_up(ctx, pr).await.map(Outcome::Success),
        MergeableState::Clean | MergeableState::HasHooks => {
            ctx.logger.info("No update necessary");
            Ok(Outcome::Success(pr.head.sha.clone()))
        }
        other => {
            let reason = format!("No update done due to PR state {other}");
            ctx.logger.info(&reason);
            Ok(Outcome::Neutral(reason))
        }
    }
}

/// Why a PR must be left alone regardless of its mergeable state
pub fn skip_reason(pr: &PullRequest) -> Option<String> {
    if pr.state != PrState::Open {
        return Some(format!("PR is not open: {}", pr.state));
    }
    if pr.merged {
        return Some("PR is already merged".to_string());
    }
    if pr.is_cross_repository() {
        return Some("PR branch is from external repository, skipping".to_string());
    }
    None
}

/// The PR's `mergeable_state`, fetched only when the PR at hand lacks it
///
/// List responses never carry the field, so candidates from a batch always
/// cost one extra read; webhook payloads usually do.
async fn pull_request_state(ctx: &Context, pr: &PullRequest) -> Result<MergeableState> {
    if let Some(state) = &pr.mergeable_state {
        return Ok(state.clone());
    }

    let (owner, repo) = head_repo(pr)?;
    ctx.logger
        .debug(&format!("Getting pull request info for {} ...", pr.number));
    let full = ctx.platform.get_pull_request(owner, repo, pr.number).await?;
    ctx.logger.trace(&format!("Full PR: {full:?}"));

    Ok(full.mergeable_state.unwrap_or(MergeableState::Unknown))
}

/// Merge the base branch into the PR's head branch
async fn catch_up(ctx: &Context, pr: &PullRequest) -> Result<String> {
    let (owner, repo) = head_repo(pr)?;
    let head_ref = &pr.head.ref_name;
    let base_ref = &pr.base.ref_name;

    ctx.logger.debug(&format!(
        "Merging latest changes from {base_ref} into {head_ref}"
    ));
    let result = ctx
        .platform
        .merge_branch(owner, repo, head_ref, base_ref)
        .await?;
    ctx.logger.trace(&format!("Merge result: {result:?}"));

    Ok(match result {
        BranchMergeResult::NoOp => {
            ctx.logger.info("No merge performed, branch is up to date!");
            pr.head.sha.clone()
        }
        BranchMergeResult::Merged { sha } => {
            ctx.logger
                .info(&format!("Merge succeeded, new HEAD: {head_ref} {sha}"));
            sha
        }
    })
}

fn head_repo(pr: &PullRequest) -> Result<(&str, &str)> {
    pr.head
        .repo
        .as_ref()
        .and_then(|r| r.owner_and_name())
        .ok_or_else(|| {
            Error::InvalidArguments(format!("PR #{} has no head repository", pr.number))
        })
}
