//! Authentication for GitHub
//!
//! Supports environment variables (the Actions case) and the `gh` CLI.

mod github;

pub use github::{GitHubAuthConfig, get_github_auth, token_from_lookup};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from CLI tool (gh)
    Cli,
    /// Token from environment variable
    EnvVar,
}
