//! Merge planning - pure functions for deciding whether to merge
//!
//! No I/O happens here; the decision only depends on the configuration and
//! the PR as it was handed over by the update step.

use crate::config::{Automerge, CommitMessage, Config};
use crate::types::{MergeMethod, PullRequest};
use std::fmt;

/// What to do with an up-to-date PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStep {
    /// Merge this PR
    Merge {
        /// PR number
        pr_number: u64,
        /// Merge method to use
        method: MergeMethod,
        /// Head SHA the merge is pinned to
        sha: String,
        /// Commit title override
        commit_title: Option<String>,
    },
    /// Leave this PR open
    Skip {
        /// PR number
        pr_number: u64,
        /// Reasons why this PR is not merged
        reasons: Vec<String>,
    },
}

impl MergeStep {
    /// Whether this step merges
    pub const fn is_merge(&self) -> bool {
        matches!(self, Self::Merge { .. })
    }
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge {
                pr_number,
                method,
                sha,
                ..
            } => write!(f, "{method} PR #{pr_number} at {sha}"),
            Self::Skip { pr_number, reasons } => {
                write!(f, "skip PR #{pr_number}")?;
                if !reasons.is_empty() {
                    write!(f, ": {}", reasons.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// `head_sha` must be the SHA returned by the update step, so GitHub refuses
/// the merge if the branch moved in between.
#[must_use]
pub fn create_merge_plan(config: &Config, pr: &PullRequest, head_sha: &str) -> MergeStep {
    let reasons = blocking_reasons(config, pr);
    if !reasons.is_empty() {
        return MergeStep::Skip {
            pr_number: pr.number,
            reasons,
        };
    }

    let commit_title = match config.merge_commit_message {
        CommitMessage::Automatic => None,
        CommitMessage::PullRequestTitle => Some(format!("{} (#{})", pr.title, pr.number)),
    };

    MergeStep::Merge {
        pr_number: pr.number,
        method: config.merge_method,
        sha: head_sha.to_string(),
        commit_title,
    }
}

fn blocking_reasons(config: &Config, pr: &PullRequest) -> Vec<String> {
    match config.automerge {
        Automerge::Never => vec!["automerge is disabled".to_string()],
        Automerge::Always => Vec::new(),
        Automerge::Labeled => {
            let missing = config
                .required_labels()
                .filter(|l| !pr.has_label(l))
                .map(|l| format!("missing label {l}"));
            let blocked = config
                .blocking_labels()
                .filter(|l| pr.has_label(l))
                .map(|l| format!("has label {l}"));
            missing.chain(blocked).collect()
        }
    }
}
