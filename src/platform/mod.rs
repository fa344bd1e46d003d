//! Repository host services
//!
//! Handlers only see the [`PlatformService`] trait, so tests can swap in a
//! mock and the GitHub implementation stays a thin HTTP layer.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{BranchMergeResult, MergeRequest, MergeResult, PullRequest, PullRequestQuery};
use async_trait::async_trait;

/// Host API operations needed to keep PRs up to date
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Fetch the full PR record, including `mergeable_state`
    async fn get_pull_request(&self, owner: &str, repo: &str, number: u64)
    -> Result<PullRequest>;

    /// List open PRs matching the query, most recently updated first
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>>;

    /// Merge branch `head` into branch `base`
    ///
    /// This is the catch-up merge: to update a PR the PR's base branch is
    /// passed as `head` and the PR's head branch as `base`.
    async fn merge_branch(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<BranchMergeResult>;

    /// Merge a PR into its base branch
    ///
    /// A refusal by the host (not mergeable yet, head moved) is reported as
    /// `merged: false`, not as an error.
    async fn merge_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &MergeRequest,
    ) -> Result<MergeResult>;
}
