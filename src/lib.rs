//! pr-autoupdate: keep pull requests up to date with their base branch
//!
//! Reacts to GitHub webhook events (push, status, pull request, review) by
//! finding the PRs the event concerns, merging their base branch into them
//! when they are behind, and handing up-to-date PRs to the merge step.
//!
//! Every entry point returns `Result<Outcome<_>>`. `Outcome::Neutral` means
//! there was deliberately nothing to do and must not be reported as a
//! failure.

pub mod auth;
pub mod batch;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod logging;
pub mod merge;
pub mod outcome;
pub mod platform;
pub mod router;
pub mod types;
pub mod update;

pub use context::Context;
pub use error::{Error, Result};
pub use outcome::Outcome;
