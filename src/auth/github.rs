//! GitHub token discovery

use super::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// A resolved GitHub token
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// The token
    pub token: String,
    /// Where it came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Find a token in environment-style lookups
pub fn token_from_lookup<F>(lookup: F) -> Option<GitHubAuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_VARS.iter().find_map(|var| {
        lookup(var)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|token| {
                debug!(var, "using GitHub token from environment");
                GitHubAuthConfig {
                    token,
                    source: AuthSource::EnvVar,
                }
            })
    })
}

/// Resolve a GitHub token from the environment, then `gh auth token`
pub async fn get_github_auth() -> Result<GitHubAuthConfig> {
    if let Some(auth) = token_from_lookup(|var| std::env::var(var).ok()) {
        return Ok(auth);
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .map_err(|e| Error::Auth(format!("no token in environment and gh unavailable: {e}")))?;

    if !output.status.success() {
        return Err(Error::Auth(
            "no token in GITHUB_TOKEN/GH_TOKEN and `gh auth token` failed".to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("`gh auth token` returned nothing".to_string()));
    }

    debug!("using GitHub token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}
