//! Batch processing of candidate PRs
//!
//! Push and status events both fan out to up to [`MAX_PR_COUNT`] PRs. The
//! candidates are processed one after another; each one gets its own
//! scratch directory and its own result, so a failing or skipped PR never
//! stops the rest. Whether the batch as a whole made progress is decided
//! afterwards from the collected results by [`summarize`].

use crate::context::Context;
use crate::error::{Error, Result};
use crate::event::{PushEvent, StatusEvent};
use crate::merge::merge_pull_request;
use crate::outcome::Outcome;
use crate::try_outcome;
use crate::types::{PullRequest, PullRequestFilter, PullRequestQuery};
use crate::update::update_pull_request;
use std::fmt;
use std::path::Path;

/// Upper bound on PRs handled per event
pub const MAX_PR_COUNT: u8 = 10;

/// Prefix of branch refs in push events
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Name prefix of per-PR scratch directories
const SCRATCH_PREFIX: &str = "pr-autoupdate-";

/// Result for one candidate PR
#[derive(Debug)]
pub struct CandidateReport {
    /// PR number
    pub pr_number: u64,
    /// Head SHA on success, the skip reason, or the failure
    pub result: Result<Outcome<String>>,
}

/// Aggregate of a processed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Candidates brought up to date (or already current)
    pub updated: usize,
    /// Candidates skipped with a neutral outcome
    pub skipped: usize,
    /// Candidates that failed
    pub failed: usize,
}

impl BatchSummary {
    /// Total number of candidates
    pub const fn total(&self) -> usize {
        self.updated + self.skipped + self.failed
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updated, {} skipped, {} failed",
            self.updated, self.skipped, self.failed
        )
    }
}

/// Fold candidate results into the batch outcome
///
/// A batch that advanced no candidate at all is neutral, whatever the
/// individual reasons were.
pub fn summarize(reports: &[CandidateReport]) -> Outcome<BatchSummary> {
    let summary = reports
        .iter()
        .fold(BatchSummary::default(), |mut acc, report| {
            match &report.result {
                Ok(Outcome::Success(_)) => acc.updated += 1,
                Ok(Outcome::Neutral(_)) => acc.skipped += 1,
                Err(_) => acc.failed += 1,
            }
            acc
        });

    if summary.updated == 0 {
        Outcome::neutral("No PRs have been updated")
    } else {
        Outcome::Success(summary)
    }
}

/// Handle a push: update open PRs based on the pushed branch
pub async fn handle_branch_update(
    ctx: &Context,
    event: &PushEvent,
) -> Result<Outcome<BatchSummary>> {
    let Some(branch) = event.ref_name.strip_prefix(BRANCH_REF_PREFIX) else {
        let reason = format!("Push does not reference a branch: {}", event.ref_name);
        ctx.logger.info(&reason);
        return Ok(Outcome::Neutral(reason));
    };
    ctx.logger.debug(&format!("Updated branch: {branch}"));

    let repository = &event.repository;
    let owner = repository
        .owner
        .name_or_login()
        .ok_or_else(|| payload_error("push", "repository owner is missing"))?;

    ctx.logger.debug("Listing pull requests...");
    let query = PullRequestQuery {
        filter: PullRequestFilter::Base(branch.to_string()),
        per_page: MAX_PR_COUNT,
    };
    let prs = ctx
        .platform
        .list_pull_requests(owner, &repository.name, &query)
        .await?;
    ctx.logger.trace(&format!("PR list: {prs:?}"));

    if prs.is_empty() {
        let reason = format!("No open PRs for {branch}");
        ctx.logger.info(&reason);
        return Ok(Outcome::Neutral(reason));
    }
    ctx.logger.info(&format!("Open PRs: {}", prs.len()));

    let clone_url = ctx.clone_url(&format!("{owner}/{}", repository.name));
    let reports = run_batch(ctx, &prs, |_| clone_url.clone(), false).await;

    let outcome = summarize(&reports);
    match &outcome {
        Outcome::Success(summary) => ctx.logger.info(&format!(
            "{} of {} PRs based on {branch} have been updated",
            summary.updated,
            summary.total()
        )),
        Outcome::Neutral(_) => ctx
            .logger
            .info(&format!("No PRs based on {branch} have been updated")),
    }
    Ok(outcome)
}

/// Handle a successful commit status: update and merge the PRs whose head
/// is one of the event's branches
pub async fn handle_status_update(
    ctx: &Context,
    event: &StatusEvent,
) -> Result<Outcome<BatchSummary>> {
    if event.state != "success" {
        let reason = format!("Event state ignored: status {}", event.state);
        ctx.logger.info(&reason);
        return Ok(Outcome::Neutral(reason));
    }

    let repository = &event.repository;
    let owner = repository
        .owner
        .login_or_name()
        .ok_or_else(|| payload_error("status", "repository owner is missing"))?;

    let mut candidates = Vec::new();
    for branch in &event.branches {
        ctx.logger
            .debug(&format!("Listing pull requests for {} ...", branch.name));
        let query = PullRequestQuery {
            filter: PullRequestFilter::Head(format!("{owner}:{}", branch.name)),
            per_page: MAX_PR_COUNT,
        };
        let prs = ctx
            .platform
            .list_pull_requests(owner, &repository.name, &query)
            .await?;
        ctx.logger.trace(&format!("PR list: {prs:?}"));
        candidates.extend(prs);
    }

    let reports = run_batch(ctx, &candidates, |pr| head_clone_url(ctx, pr), true).await;

    let outcome = summarize(&reports);
    match &outcome {
        Outcome::Success(summary) => ctx.logger.info(&format!(
            "{} of {} PRs have been updated",
            summary.updated,
            summary.total()
        )),
        Outcome::Neutral(_) => ctx.logger.info("No PRs have been updated"),
    }
    Ok(outcome)
}

/// Update one PR and, if `merge` is set, hand it to the merge step
///
/// The scratch directory only lives for the update itself and is removed on
/// every exit path.
pub async fn process_candidate(
    ctx: &Context,
    clone_url: &str,
    pr: &PullRequest,
    merge: bool,
) -> Result<Outcome<String>> {
    process_candidate_in(ctx, &std::env::temp_dir(), clone_url, pr, merge).await
}

/// [`process_candidate`] with the scratch directory created under `root`
pub async fn process_candidate_in(
    ctx: &Context,
    root: &Path,
    clone_url: &str,
    pr: &PullRequest,
    merge: bool,
) -> Result<Outcome<String>> {
    let head = {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(root)?;
        try_outcome!(update_pull_request(ctx, dir.path(), clone_url, pr).await?)
    };

    if merge {
        merge_pull_request(ctx, pr, &head).await?;
    }
    Ok(Outcome::Success(head))
}

/// Clone URL of the repository a PR's head branch lives in
pub fn head_clone_url(ctx: &Context, pr: &PullRequest) -> String {
    let full_name = pr.head.full_name().unwrap_or_default();
    if full_name.is_empty() {
        return String::new();
    }
    ctx.clone_url(full_name)
}

async fn run_batch<F>(
    ctx: &Context,
    prs: &[PullRequest],
    clone_url: F,
    merge: bool,
) -> Vec<CandidateReport>
where
    F: Fn(&PullRequest) -> String,
{
    let mut reports = Vec::with_capacity(prs.len());
    for pr in prs {
        let url = clone_url(pr);
        let report = CandidateReport {
            pr_number: pr.number,
            result: process_candidate(ctx, &url, pr, merge).await,
        };
        match &report.result {
            Ok(Outcome::Neutral(_)) => ctx.logger.trace("PR update has been skipped."),
            Err(e) => ctx
                .logger
                .error(&format!("PR #{}: {e}", report.pr_number)),
            Ok(Outcome::Success(_)) => {}
        }
        reports.push(report);
    }
    reports
}

fn payload_error(event: &str, message: &str) -> Error {
    Error::InvalidPayload {
        event: event.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(pr_number: u64, result: Result<Outcome<String>>) -> CandidateReport {
        CandidateReport { pr_number, result }
    }

    #[test]
    fn test_summarize_one_success_among_neutrals() {
        let mut reports: Vec<_> = (1..=9)
            .map(|n| report(n, Ok(Outcome::neutral("skip"))))
            .collect();
        reports.push(report(10, Ok(Outcome::Success("sha".to_string()))));

        let outcome = summarize(&reports);
        assert_eq!(
            outcome,
            Outcome::Success(BatchSummary {
                updated: 1,
                skipped: 9,
                failed: 0,
            })
        );
    }

    #[test]
    fn test_summarize_all_neutral_is_neutral() {
        let reports: Vec<_> = (1..=10)
            .map(|n| report(n, Ok(Outcome::neutral("skip"))))
            .collect();
        assert!(summarize(&reports).is_neutral());
    }

    #[test]
    fn test_summarize_errors_do_not_count_as_progress() {
        let reports = vec![
            report(1, Err(Error::GitHubApi("boom".to_string()))),
            report(2, Ok(Outcome::neutral("skip"))),
        ];
        assert!(summarize(&reports).is_neutral());
        assert!(summarize(&[]).is_neutral());
    }

    #[test]
    fn test_summary_display() {
        let summary = BatchSummary {
            updated: 2,
            skipped: 1,
            failed: 0,
        };
        assert_eq!(summary.to_string(), "2 updated, 1 skipped, 0 failed");
        assert_eq!(summary.total(), 3);
    }
}
