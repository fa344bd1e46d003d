//! Merging a PR into its base once it is up to date
//!
//! Two phases, same as the update flow keeps them apart:
//! 1. Plan - decide from config and PR labels whether to merge (pure)
//! 2. Execute - call the host, retrying while it reports "not mergeable"

mod execute;
mod plan;

pub use execute::{MergeExecutionResult, execute_merge, merge_pull_request};
pub use plan::{MergeStep, create_merge_plan};
