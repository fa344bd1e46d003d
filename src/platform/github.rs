//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    BranchMergeResult, MergeRequest, MergeResult, PullRequest, PullRequestFilter,
    PullRequestQuery,
};
use crate::update::FETCH_TIMEOUT;
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Query string for `GET /repos/{owner}/{repo}/pulls`
#[derive(Serialize)]
struct ListPullsParams<'a> {
    state: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    head: Option<&'a str>,
    sort: &'a str,
    direction: &'a str,
    per_page: u8,
}

#[derive(Serialize)]
struct MergeBranchBody<'a> {
    base: &'a str,
    head: &'a str,
}

#[derive(Deserialize)]
struct MergeCommit {
    sha: String,
}

#[derive(Serialize)]
struct MergePullBody<'a> {
    merge_method: String,
    sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_title: Option<&'a str>,
}

#[derive(Deserialize)]
struct MergePullResponse {
    #[serde(default)]
    merged: bool,
    sha: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: Option<String>,
}

/// GitHub service using octocrab for reads and raw requests for merges
///
/// The merge endpoints signal their outcome through the status code (204
/// for "nothing to merge", 405 for "not mergeable"), so they go through
/// reqwest where the status is visible.
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service for github.com or an Enterprise host
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let api_base = host.map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, &api_base)
    }

    /// Create a service talking to an explicit API base URL
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        Self::with_timeout(token, api_base, FETCH_TIMEOUT)
    }

    /// Create a service whose every request, read or merge, gives up after
    /// `timeout`
    pub fn with_timeout(token: &str, api_base: &str, timeout: Duration) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout))
            .set_write_timeout(Some(timeout))
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("pr-autoupdate")
            .timeout(timeout)
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Pull the `message` field out of an error response, if there is one
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ApiMessage>().await {
            Ok(ApiMessage { message: Some(m) }) => format!("{status}: {m}"),
            _ => status.to_string(),
        }
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest> {
        debug!(owner, repo, number, "getting PR");
        let pr: PullRequest = self
            .client
            .get(format!("/repos/{owner}/{repo}/pulls/{number}"), None::<&()>)
            .await?;
        debug!(number, mergeable_state = ?pr.mergeable_state, "got PR");
        Ok(pr)
    }

    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>> {
        let (base, head) = match &query.filter {
            PullRequestFilter::Base(b) => (Some(b.as_str()), None),
            PullRequestFilter::Head(h) => (None, Some(h.as_str())),
        };
        debug!(owner, repo, ?base, ?head, "listing open PRs");

        let params = ListPullsParams {
            state: "open",
            base,
            head,
            sort: "updated",
            direction: "desc",
            per_page: query.per_page,
        };
        let prs: Vec<PullRequest> = self
            .client
            .get(format!("/repos/{owner}/{repo}/pulls"), Some(&params))
            .await?;

        debug!(count = prs.len(), "listed open PRs");
        Ok(prs)
    }

    async fn merge_branch(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<BranchMergeResult> {
        debug!(owner, repo, base, head, "merging branch");
        let url = format!("{}/repos/{owner}/{repo}/merges", self.api_base);

        let response = self
            .authorized(self.http_client.post(&url))
            .json(&MergeBranchBody { base, head })
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to merge {head} into {base}: {e}")))?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                debug!(base, head, "nothing to merge");
                Ok(BranchMergeResult::NoOp)
            }
            status if status.is_success() => {
                let commit: MergeCommit = response.json().await.map_err(|e| {
                    Error::GitHubApi(format!("Failed to parse merge response: {e}"))
                })?;
                debug!(sha = %commit.sha, "merged branch");
                Ok(BranchMergeResult::Merged { sha: commit.sha })
            }
            _ => Err(Error::GitHubApi(format!(
                "Merge of {head} into {base} failed: {}",
                Self::error_message(response).await
            ))),
        }
    }

    async fn merge_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &MergeRequest,
    ) -> Result<MergeResult> {
        debug!(owner, repo, number, method = %request.method, "merging PR");
        let url = format!("{}/repos/{owner}/{repo}/pulls/{number}/merge", self.api_base);

        let body = MergePullBody {
            merge_method: request.method.to_string(),
            sha: &request.sha,
            commit_title: request.commit_title.as_deref(),
        };
        let response = self
            .authorized(self.http_client.put(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            let result: MergePullResponse = response
                .json()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to parse merge response: {e}")))?;
            debug!(number, merged = result.merged, sha = ?result.sha, "merge complete");
            return Ok(MergeResult {
                merged: result.merged,
                sha: result.sha,
                message: result.message,
            });
        }

        // 405: not mergeable (yet), 409: head moved since the sha was read
        if status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::CONFLICT {
            let message = Self::error_message(response).await;
            debug!(number, %message, "merge refused");
            return Ok(MergeResult {
                merged: false,
                sha: None,
                message: Some(message),
            });
        }

        Err(Error::GitHubApi(format!(
            "Merge of PR #{number} failed: {}",
            Self::error_message(response).await
        )))
    }
}
