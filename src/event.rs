//! Webhook events
//!
//! The variant is chosen by the event name GitHub sends alongside the
//! payload (`X-GitHub-Event` / `GITHUB_EVENT_NAME`), never by looking at the
//! payload's shape.

use crate::error::{Error, Result};
use crate::types::{PullRequest, Repository};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported event names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventName {
    /// `push`
    Push,
    /// `status`
    Status,
    /// `pull_request`
    PullRequest,
    /// `pull_request_review`
    PullRequestReview,
}

impl EventName {
    /// Name as GitHub sends it
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Status => "status",
            Self::PullRequest => "pull_request",
            Self::PullRequestReview => "pull_request_review",
        }
    }
}

impl FromStr for EventName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "push" => Ok(Self::Push),
            "status" => Ok(Self::Status),
            "pull_request" => Ok(Self::PullRequest),
            "pull_request_review" => Ok(Self::PullRequestReview),
            other => Err(Error::InvalidEventType(other.to_string())),
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `push` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    /// Full ref that was pushed, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Repository pushed to
    pub repository: Repository,
}

/// Branch entry of a `status` payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBranch {
    /// Branch name
    pub name: String,
}

/// `status` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    /// `success`, `failure`, `pending` or `error`
    pub state: String,
    /// Branches containing the commit
    #[serde(default)]
    pub branches: Vec<StatusBranch>,
    /// Repository of the commit
    pub repository: Repository,
}

/// `pull_request` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// What happened to the PR
    pub action: String,
    /// The PR
    pub pull_request: PullRequest,
}

/// `pull_request_review` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestReviewEvent {
    /// What happened to the review
    pub action: String,
    /// The reviewed PR
    pub pull_request: PullRequest,
}

/// A decoded webhook event
#[derive(Debug, Clone)]
pub enum Event {
    /// Branch or tag push
    Push(PushEvent),
    /// Commit status change
    Status(StatusEvent),
    /// PR activity
    PullRequest(PullRequestEvent),
    /// PR review activity
    PullRequestReview(PullRequestReviewEvent),
}

impl Event {
    /// Decode a payload for the given event name
    ///
    /// Unsupported names fail with [`Error::InvalidEventType`] before the
    /// payload is looked at.
    pub fn from_payload(name: &str, payload: serde_json::Value) -> Result<Self> {
        let name: EventName = name.parse()?;
        Ok(match name {
            EventName::Push => Self::Push(decode(name, payload)?),
            EventName::Status => Self::Status(decode(name, payload)?),
            EventName::PullRequest => Self::PullRequest(decode(name, payload)?),
            EventName::PullRequestReview => Self::PullRequestReview(decode(name, payload)?),
        })
    }

    /// Name of the event this payload belongs to
    pub const fn name(&self) -> EventName {
        match self {
            Self::Push(_) => EventName::Push,
            Self::Status(_) => EventName::Status,
            Self::PullRequest(_) => EventName::PullRequest,
            Self::PullRequestReview(_) => EventName::PullRequestReview,
        }
    }
}

fn decode<T: DeserializeOwned>(name: EventName, payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| Error::InvalidPayload {
        event: name.to_string(),
        message: e.to_string(),
    })
}
