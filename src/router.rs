//! Event routing
//!
//! Maps an event name and payload to the handler that deals with it. The
//! interactive entry point turns a GitHub URL into the equivalent event
//! first and then goes through the same dispatch.

use crate::batch::{
    BatchSummary, handle_branch_update, handle_status_update, head_clone_url, process_candidate,
};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::event::{Event, PullRequestEvent, PushEvent};
use crate::outcome::Outcome;
use crate::types::{Owner, PullRequest, Repository};
use regex::Regex;
use std::fmt;

/// `pull_request` actions that can change whether a PR needs updating
pub const RELEVANT_ACTIONS: [&str; 4] = ["opened", "edited", "synchronize", "labeled"];

/// The only `pull_request_review` action that is acted upon
pub const REVIEW_ACTION: &str = "submitted";

/// What a handled event produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventReport {
    /// A push or status event processed a batch of PRs
    Batch(BatchSummary),
    /// A single PR was updated and handed to the merge step
    PullRequest {
        /// PR number
        number: u64,
        /// Head SHA after the update
        head_sha: String,
    },
}

impl fmt::Display for EventReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch(summary) => write!(f, "{summary}"),
            Self::PullRequest { number, head_sha } => write!(f, "PR #{number} at {head_sha}"),
        }
    }
}

/// Target named by a GitHub URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    /// `https://<host>/<owner>/<repo>/pull/<number>`
    PullRequest {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// PR number
        number: u64,
    },
    /// `https://<host>/<owner>/<repo>/tree/<branch>`
    Branch {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Branch name
        branch: String,
    },
}

/// Parse a PR or branch URL on `host`
pub fn parse_url(host: &str, url: &str) -> Result<UrlTarget> {
    let pattern = format!(
        r"^https://{}/([^/]+)/([^/]+)/(pull|tree)/([^ ]+)$",
        regex::escape(host)
    );
    let re = Regex::new(&pattern).map_err(|e| Error::Internal(e.to_string()))?;
    let invalid = || Error::InvalidUrl(url.to_string());

    let caps = re.captures(url).ok_or_else(invalid)?;
    let owner = caps[1].to_string();
    let repo = caps[2].to_string();
    let rest = &caps[4];

    if &caps[3] == "pull" {
        let number = rest.parse().map_err(|_| invalid())?;
        Ok(UrlTarget::PullRequest {
            owner,
            repo,
            number,
        })
    } else {
        Ok(UrlTarget::Branch {
            owner,
            repo,
            branch: rest.to_string(),
        })
    }
}

/// Run against a PR or branch URL instead of a webhook event
pub async fn execute_locally(ctx: &Context, url: &str) -> Result<Outcome<EventReport>> {
    let event = match parse_url(ctx.config.web_host(), url)? {
        UrlTarget::PullRequest {
            owner,
            repo,
            number,
        } => {
            ctx.logger.debug("Getting PR data...");
            let pull_request = ctx.platform.get_pull_request(&owner, &repo, number).await?;
            Event::PullRequest(PullRequestEvent {
                action: "opened".to_string(),
                pull_request,
            })
        }
        UrlTarget::Branch {
            owner,
            repo,
            branch,
        } => Event::Push(PushEvent {
            ref_name: format!("refs/heads/{branch}"),
            repository: Repository {
                full_name: format!("{owner}/{repo}"),
                name: repo,
                owner: Owner {
                    login: None,
                    name: Some(owner),
                },
            },
        }),
    };

    execute_event(ctx, &event).await
}

/// Decode and handle a webhook payload
///
/// Unsupported event names are an error, not a neutral outcome.
pub async fn execute_github_action(
    ctx: &Context,
    event_name: &str,
    payload: serde_json::Value,
) -> Result<Outcome<EventReport>> {
    ctx.logger.info(&format!("Event name: {event_name}"));
    ctx.logger.trace(&format!("Event data: {payload}"));

    let event = Event::from_payload(event_name, payload)?;
    execute_event(ctx, &event).await
}

/// Dispatch a decoded event to its handler
pub async fn execute_event(ctx: &Context, event: &Event) -> Result<Outcome<EventReport>> {
    match event {
        Event::Push(push) => Ok(handle_branch_update(ctx, push)
            .await?
            .map(EventReport::Batch)),
        Event::Status(status) => Ok(handle_status_update(ctx, status)
            .await?
            .map(EventReport::Batch)),
        Event::PullRequest(e) => {
            if !RELEVANT_ACTIONS.contains(&e.action.as_str()) {
                return Ok(ignore_action(ctx, event, &e.action));
            }
            update_and_merge(ctx, &e.pull_request).await
        }
        Event::PullRequestReview(e) => {
            if e.action != REVIEW_ACTION {
                return Ok(ignore_action(ctx, event, &e.action));
            }
            update_and_merge(ctx, &e.pull_request).await
        }
    }
}

/// Update a single PR and hand it to the merge step
///
/// Unlike the batch handlers nothing is isolated here: any error goes
/// straight back to the caller.
pub async fn update_and_merge(ctx: &Context, pr: &PullRequest) -> Result<Outcome<EventReport>> {
    let clone_url = head_clone_url(ctx, pr);
    let outcome = process_candidate(ctx, &clone_url, pr, true).await?;
    Ok(outcome.map(|head_sha| EventReport::PullRequest {
        number: pr.number,
        head_sha,
    }))
}

fn ignore_action(ctx: &Context, event: &Event, action: &str) -> Outcome<EventReport> {
    let reason = format!("Action ignored: {} {action}", event.name());
    ctx.logger.info(&reason);
    Outcome::Neutral(reason)
}
