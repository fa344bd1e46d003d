//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_autoupdate::error::{Error, Result};
use pr_autoupdate::platform::PlatformService;
use pr_autoupdate::types::{
    BranchMergeResult, MergeRequest, MergeResult, PullRequest, PullRequestFilter,
    PullRequestQuery,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Call record for `list_pull_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub owner: String,
    pub repo: String,
    pub query: PullRequestQuery,
}

/// Call record for `merge_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeBranchCall {
    pub owner: String,
    pub repo: String,
    pub base: String,
    pub head: String,
}

/// Call record for `merge_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub request: MergeRequest,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Call tracking for verification
/// - Configurable responses per PR / branch / list filter
/// - Error injection for failure path testing
#[derive(Default)]
pub struct MockPlatformService {
    pr_responses: Mutex<HashMap<u64, PullRequest>>,
    list_responses: Mutex<HashMap<String, Vec<PullRequest>>>,
    merge_branch_responses: Mutex<HashMap<String, BranchMergeResult>>,
    merge_pr_responses: Mutex<HashMap<u64, VecDeque<MergeResult>>>,
    // Call tracking
    get_pr_calls: Mutex<Vec<u64>>,
    list_calls: Mutex<Vec<ListCall>>,
    merge_branch_calls: Mutex<Vec<MergeBranchCall>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    error_on_merge_branch: Mutex<HashSet<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
}

fn filter_key(filter: &PullRequestFilter) -> String {
    match filter {
        PullRequestFilter::Base(b) => format!("base={b}"),
        PullRequestFilter::Head(h) => format!("head={h}"),
    }
}

impl MockPlatformService {
    pub fn new() -> Self {
        Self::default()
    }

    // === Response setup ===

    /// Set the response for `get_pull_request`
    pub fn set_pr_response(&self, pr: PullRequest) {
        self.pr_responses.lock().unwrap().insert(pr.number, pr);
    }

    /// Set the PRs listed for a base branch
    pub fn set_list_for_base(&self, base: &str, prs: Vec<PullRequest>) {
        self.list_responses
            .lock()
            .unwrap()
            .insert(filter_key(&PullRequestFilter::Base(base.to_string())), prs);
    }

    /// Set the PRs listed for an `owner:branch` head
    pub fn set_list_for_head(&self, head: &str, prs: Vec<PullRequest>) {
        self.list_responses
            .lock()
            .unwrap()
            .insert(filter_key(&PullRequestFilter::Head(head.to_string())), prs);
    }

    /// Set the response for a catch-up merge into `branch`
    pub fn set_merge_branch_response(&self, branch: &str, result: BranchMergeResult) {
        self.merge_branch_responses
            .lock()
            .unwrap()
            .insert(branch.to_string(), result);
    }

    /// Queue responses for `merge_pull_request`; the last one repeats
    pub fn set_merge_pr_responses(&self, pr_number: u64, results: Vec<MergeResult>) {
        self.merge_pr_responses
            .lock()
            .unwrap()
            .insert(pr_number, results.into());
    }

    // === Error injection methods ===

    /// Make `list_pull_requests` return an error
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    /// Make the catch-up merge into `branch` return an error
    pub fn fail_merge_branch(&self, branch: &str) {
        self.error_on_merge_branch
            .lock()
            .unwrap()
            .insert(branch.to_string());
    }

    /// Make `merge_pull_request` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn merge_branch_calls(&self) -> Vec<MergeBranchCall> {
        self.merge_branch_calls.lock().unwrap().clone()
    }

    pub fn merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Total number of host calls of any kind
    pub fn total_calls(&self) -> usize {
        self.get_pr_calls.lock().unwrap().len()
            + self.list_calls.lock().unwrap().len()
            + self.merge_branch_calls.lock().unwrap().len()
            + self.merge_pr_calls.lock().unwrap().len()
    }

    /// Assert that a catch-up merge of `head` into `base` happened
    pub fn assert_merge_branch_called(&self, base: &str, head: &str) {
        let calls = self.merge_branch_calls();
        assert!(
            calls.iter().any(|c| c.base == base && c.head == head),
            "Expected merge_branch(base={base}, head={head}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pull_request` was NOT called for a specific PR
    pub fn assert_merge_pr_not_called(&self, pr_number: u64) {
        let calls = self.merge_pr_calls();
        assert!(
            !calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pull_request({pr_number}) NOT to be called but it was: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
    ) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(number);

        let responses = self.pr_responses.lock().unwrap();
        responses.get(&number).cloned().ok_or_else(|| {
            Error::Platform(format!(
                "get_pull_request: no response configured for PR #{number}"
            ))
        })
    }

    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>> {
        self.list_calls.lock().unwrap().push(ListCall {
            owner: owner.to_string(),
            repo: repo.to_string(),
            query: query.clone(),
        });

        if let Some(msg) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let responses = self.list_responses.lock().unwrap();
        let mut prs = responses
            .get(&filter_key(&query.filter))
            .cloned()
            .unwrap_or_default();
        prs.truncate(usize::from(query.per_page));
        Ok(prs)
    }

    async fn merge_branch(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<BranchMergeResult> {
        self.merge_branch_calls
            .lock()
            .unwrap()
            .push(MergeBranchCall {
                owner: owner.to_string(),
                repo: repo.to_string(),
                base: base.to_string(),
                head: head.to_string(),
            });

        if self.error_on_merge_branch.lock().unwrap().contains(base) {
            return Err(Error::Platform(format!("merge into {base} failed")));
        }

        let responses = self.merge_branch_responses.lock().unwrap();
        responses.get(base).cloned().ok_or_else(|| {
            Error::Platform(format!("merge_branch: no response configured for {base}"))
        })
    }

    async fn merge_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        request: &MergeRequest,
    ) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr_number: number,
            request: request.clone(),
        });

        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let mut responses = self.merge_pr_responses.lock().unwrap();
        let queue = responses.get_mut(&number).ok_or_else(|| {
            Error::Platform(format!(
                "merge_pull_request: no response configured for PR #{number}"
            ))
        })?;
        let result = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        result.ok_or_else(|| Error::Platform(format!("no merge result left for PR #{number}")))
    }
}
