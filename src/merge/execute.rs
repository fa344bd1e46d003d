//! Merge execution - effectful operations
//!
//! Takes a `MergeStep` (created by the pure planning function) and performs
//! the merge via the platform API.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::merge::plan::{MergeStep, create_merge_plan};
use crate::types::{MergeRequest, PullRequest};

/// Result of merge execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeExecutionResult {
    /// The PR was merged
    Merged {
        /// SHA of the merge commit, if GitHub reported one
        sha: Option<String>,
    },
    /// The plan said not to merge
    Skipped {
        /// Why
        reasons: Vec<String>,
    },
    /// GitHub kept refusing the merge until retries ran out
    NotMerged {
        /// Last message from GitHub
        message: Option<String>,
    },
}

impl MergeExecutionResult {
    /// Check if the PR was merged
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Hand an up-to-date PR over for merging into its base
///
/// Whether anything happens depends on the `automerge` setting; skipping is
/// not an error.
pub async fn merge_pull_request(
    ctx: &Context,
    pr: &PullRequest,
    head_sha: &str,
) -> Result<MergeExecutionResult> {
    let step = create_merge_plan(&ctx.config, pr, head_sha);
    ctx.logger.debug(&format!("Merge plan: {step}"));
    execute_merge(ctx, pr, &step).await
}

/// Execute a merge step (EFFECTFUL)
///
/// Retries up to `merge_retries` times while GitHub refuses the merge,
/// sleeping `merge_retry_sleep` in between. API errors are returned as is.
pub async fn execute_merge(
    ctx: &Context,
    pr: &PullRequest,
    step: &MergeStep,
) -> Result<MergeExecutionResult> {
    let (pr_number, request) = match step {
        MergeStep::Skip { reasons, .. } => {
            ctx.logger.info(&format!("Skipping merge: {step}"));
            return Ok(MergeExecutionResult::Skipped {
                reasons: reasons.clone(),
            });
        }
        MergeStep::Merge {
            pr_number,
            method,
            sha,
            commit_title,
        } => (
            *pr_number,
            MergeRequest {
                method: *method,
                sha: sha.clone(),
                commit_title: commit_title.clone(),
            },
        ),
    };

    let (owner, repo) = pr
        .base
        .repo
        .as_ref()
        .and_then(|r| r.owner_and_name())
        .ok_or_else(|| {
            Error::InvalidArguments(format!("PR #{pr_number} has no base repository"))
        })?;

    let attempts = ctx.config.merge_retries.saturating_add(1);
    let mut last_message = None;
    for attempt in 1..=attempts {
        ctx.logger
            .info(&format!("Merging PR #{pr_number} (attempt {attempt}/{attempts})"));
        let result = ctx
            .platform
            .merge_pull_request(owner, repo, pr_number, &request)
            .await?;

        if result.merged {
            ctx.logger.info(&format!(
                "PR #{pr_number} merged: {}",
                result.sha.as_deref().unwrap_or("(no sha)")
            ));
            return Ok(MergeExecutionResult::Merged { sha: result.sha });
        }

        ctx.logger.debug(&format!(
            "PR #{pr_number} not merged: {}",
            result.message.as_deref().unwrap_or("no message")
        ));
        last_message = result.message;

        if attempt < attempts {
            tokio::time::sleep(ctx.config.retry_sleep()).await;
        }
    }

    ctx.logger.info(&format!(
        "PR #{pr_number} could not be merged after {attempts} attempt(s)"
    ));
    Ok(MergeExecutionResult::NotMerged {
        message: last_message,
    })
}
