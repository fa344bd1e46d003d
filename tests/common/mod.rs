//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{ListCall, MergeBranchCall, MergePrCall, MockPlatformService};

use pr_autoupdate::config::{Automerge, Config};
use pr_autoupdate::context::Context;
use pr_autoupdate::logging::Logger;
use pr_autoupdate::types::{
    BranchRef, Label, MergeableState, Owner, PrState, PullRequest, Repository,
};
use std::sync::{Arc, Mutex};
use tracing::Level;

pub const OWNER: &str = "acme";
pub const REPO: &str = "widgets";

/// Logger that keeps every line for later inspection
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

pub fn repository(full_name: &str) -> Repository {
    let (owner, name) = full_name.split_once('/').expect("owner/name");
    Repository {
        full_name: full_name.to_string(),
        name: name.to_string(),
        owner: Owner::login(owner),
    }
}

pub fn main_repository() -> Repository {
    repository(&format!("{OWNER}/{REPO}"))
}

/// An open, unmerged PR from `head` into `base` in acme/widgets, without a
/// `mergeable_state` (as list responses return it)
pub fn make_pr(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        state: PrState::Open,
        merged: false,
        head: BranchRef {
            ref_name: head.to_string(),
            sha: format!("{head}-sha"),
            repo: Some(main_repository()),
        },
        base: BranchRef {
            ref_name: base.to_string(),
            sha: format!("{base}-sha"),
            repo: Some(main_repository()),
        },
        mergeable_state: None,
        labels: Vec::new(),
        updated_at: None,
    }
}

pub fn with_state(mut pr: PullRequest, state: MergeableState) -> PullRequest {
    pr.mergeable_state = Some(state);
    pr
}

pub fn with_labels(mut pr: PullRequest, labels: &[&str]) -> PullRequest {
    pr.labels = labels
        .iter()
        .map(|l| Label {
            name: (*l).to_string(),
        })
        .collect();
    pr
}

/// Config that merges everything and never sleeps between retries
pub fn test_config() -> Config {
    Config {
        automerge: Automerge::Always,
        merge_retries: 2,
        merge_retry_sleep: 0,
        ..Config::default()
    }
}

pub fn test_context(mock: &Arc<MockPlatformService>) -> (Context, Arc<RecordingLogger>) {
    test_context_with(mock, test_config())
}

pub fn test_context_with(
    mock: &Arc<MockPlatformService>,
    config: Config,
) -> (Context, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::default());
    let ctx = Context::new(mock.clone(), "test-token", config).with_logger(logger.clone());
    (ctx, logger)
}
