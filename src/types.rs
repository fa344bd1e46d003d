//! Core types for pr-autoupdate
//!
//! These mirror the JSON GitHub sends both in webhook payloads and in REST
//! responses, so the same structs serve both paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Owner of a repository
///
/// Push payloads identify the owner by `name`, everything else by `login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Owner {
    /// Account login
    #[serde(default)]
    pub login: Option<String>,
    /// Account name (push payloads)
    #[serde(default)]
    pub name: Option<String>,
}

impl Owner {
    /// Owner identified by login
    pub fn login(login: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
            name: None,
        }
    }

    /// The login, falling back to the name
    pub fn login_or_name(&self) -> Option<&str> {
        self.login.as_deref().or(self.name.as_deref())
    }

    /// The name, falling back to the login
    pub fn name_or_login(&self) -> Option<&str> {
        self.name.as_deref().or(self.login.as_deref())
    }
}

/// A repository as embedded in events and PRs
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    /// `owner/name`
    #[serde(default)]
    pub full_name: String,
    /// Repository name
    pub name: String,
    /// Repository owner
    #[serde(default)]
    pub owner: Owner,
}

impl Repository {
    /// `(owner, name)` for API routes
    ///
    /// Uses the owner's login (or name), falling back to `full_name`.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        if let Some(owner) = self.owner.login_or_name() {
            return Some((owner, self.name.as_str()));
        }
        self.full_name.split_once('/')
    }
}

/// One side (head or base) of a pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit the branch points at
    pub sha: String,
    /// Repository the branch lives in (`None` when a fork was deleted)
    #[serde(default)]
    pub repo: Option<Repository>,
}

impl BranchRef {
    /// `owner/name` of the branch's repository, if known
    pub fn full_name(&self) -> Option<&str> {
        self.repo.as_ref().map(|r| r.full_name.as_str())
    }
}

/// PR state as reported by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed (merged or not)
    Closed,
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// GitHub's `mergeable_state`
///
/// GitHub does not document the full set of values, so anything unknown is
/// kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MergeableState {
    /// Mergeable and passing
    Clean,
    /// Head is out of date with base
    Behind,
    /// Mergeable with passing commit status and pre-receive hooks
    HasHooks,
    /// Merge conflicts
    Dirty,
    /// Blocked by branch protection
    Blocked,
    /// Not yet computed
    Unknown,
    /// Draft PR
    Draft,
    /// Mergeable with non-passing commit status
    Unstable,
    /// Any other value
    Other(String),
}

impl MergeableState {
    /// String form as GitHub sends it
    pub fn as_str(&self) -> &str {
        match self {
            Self::Clean => "clean",
            Self::Behind => "behind",
            Self::HasHooks => "has_hooks",
            Self::Dirty => "dirty",
            Self::Blocked => "blocked",
            Self::Unknown => "unknown",
            Self::Draft => "draft",
            Self::Unstable => "unstable",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for MergeableState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "clean" => Self::Clean,
            "behind" => Self::Behind,
            "has_hooks" => Self::HasHooks,
            "dirty" => Self::Dirty,
            "blocked" => Self::Blocked,
            "unknown" => Self::Unknown,
            "draft" => Self::Draft,
            "unstable" => Self::Unstable,
            _ => Self::Other(s),
        }
    }
}

impl From<MergeableState> for String {
    fn from(state: MergeableState) -> Self {
        match state {
            MergeableState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MergeableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An empty `mergeable_state` means GitHub has not computed it yet
fn empty_state_as_none<'de, D>(deserializer: D) -> Result<Option<MergeableState>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(MergeableState::from))
}

/// A label attached to a PR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// Label name
    pub name: String,
}

/// A pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    #[serde(default)]
    pub title: String,
    /// Open/closed
    pub state: PrState,
    /// Whether the PR was merged (absent from list responses)
    #[serde(default)]
    pub merged: bool,
    /// Head branch
    pub head: BranchRef,
    /// Base branch
    pub base: BranchRef,
    /// Mergeability as computed by GitHub (absent from list responses)
    #[serde(default, deserialize_with = "empty_state_as_none")]
    pub mergeable_state: Option<MergeableState>,
    /// Labels on the PR
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Last update time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Whether head and base live in different repositories
    pub fn is_cross_repository(&self) -> bool {
        match (self.head.full_name(), self.base.full_name()) {
            (Some(head), Some(base)) => head != base,
            _ => true,
        }
    }

    /// Check for a label by name
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }
}

impl fmt::Display for PullRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.number, self.title)
    }
}

// =============================================================================
// Host API request/response types
// =============================================================================

/// Filter for listing open pull requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestFilter {
    /// PRs targeting this base branch
    Base(String),
    /// PRs from this head, formatted `owner:branch`
    Head(String),
}

/// Query for `list_pull_requests`
///
/// Always lists open PRs, most recently updated first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestQuery {
    /// Base or head filter
    pub filter: PullRequestFilter,
    /// Maximum number of results
    pub per_page: u8,
}

/// Result of merging one branch into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchMergeResult {
    /// Target already contained the source (HTTP 204)
    NoOp,
    /// A merge commit was created
    Merged {
        /// SHA of the new commit
        sha: String,
    },
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

/// Request to merge a PR into its base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Merge method
    pub method: MergeMethod,
    /// Head SHA that must still match for the merge to go through
    pub sha: String,
    /// Commit title override
    pub commit_title: Option<String>,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mergeable_state_keeps_unknown_values() {
        let state: MergeableState = serde_json::from_str("\"something_new\"").unwrap();
        assert_eq!(state, MergeableState::Other("something_new".to_string()));
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"something_new\"");
    }

    #[test]
    fn test_mergeable_state_known_values() {
        let state: MergeableState = serde_json::from_str("\"has_hooks\"").unwrap();
        assert_eq!(state, MergeableState::HasHooks);
        assert_eq!(state.to_string(), "has_hooks");
    }

    #[test]
    fn test_pull_request_from_list_payload() {
        let pr: PullRequest = serde_json::from_value(serde_json::json!({
            "number": 7,
            "title": "Add thing",
            "state": "open",
            "head": {
                "ref": "feature",
                "sha": "aaa",
                "repo": { "full_name": "acme/widgets", "name": "widgets", "owner": { "login": "acme" } }
            },
            "base": {
                "ref": "main",
                "sha": "bbb",
                "repo": { "full_name": "acme/widgets", "name": "widgets", "owner": { "login": "acme" } }
            },
            "labels": [{ "name": "automerge" }],
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert!(!pr.merged);
        assert!(pr.mergeable_state.is_none());
        assert!(!pr.is_cross_repository());
        assert!(pr.has_label("automerge"));
        assert_eq!(pr.to_string(), "#7 Add thing");
    }

    #[test]
    fn test_empty_mergeable_state_is_absent() {
        let pr: PullRequest = serde_json::from_value(serde_json::json!({
            "number": 2,
            "state": "open",
            "head": { "ref": "x", "sha": "a" },
            "base": { "ref": "main", "sha": "b" },
            "mergeable_state": ""
        }))
        .unwrap();
        assert!(pr.mergeable_state.is_none());

        let pr: PullRequest = serde_json::from_value(serde_json::json!({
            "number": 3,
            "state": "open",
            "head": { "ref": "x", "sha": "a" },
            "base": { "ref": "main", "sha": "b" },
            "mergeable_state": null
        }))
        .unwrap();
        assert!(pr.mergeable_state.is_none());
    }

    #[test]
    fn test_deleted_fork_counts_as_cross_repository() {
        let pr: PullRequest = serde_json::from_value(serde_json::json!({
            "number": 1,
            "state": "open",
            "head": { "ref": "x", "sha": "a", "repo": null },
            "base": { "ref": "main", "sha": "b", "repo": { "full_name": "o/r", "name": "r" } }
        }))
        .unwrap();
        assert!(pr.is_cross_repository());
    }
}
