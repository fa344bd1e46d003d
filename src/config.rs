//! Configuration
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables, which is how GitHub Actions workflows pass them.

use crate::error::{Error, Result};
use crate::types::MergeMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Directory name under the user config dir
const CONFIG_DIR: &str = "pr-autoupdate";

/// Default config filename
const CONFIG_FILE: &str = "config.toml";

/// When to merge a PR into its base after it has been brought up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Automerge {
    /// Never merge, only keep PRs up to date
    Never,
    /// Merge PRs whose labels satisfy `merge_labels`
    #[default]
    Labeled,
    /// Merge every PR that is up to date
    Always,
}

impl FromStr for Automerge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "false" | "off" => Ok(Self::Never),
            "labeled" => Ok(Self::Labeled),
            "always" | "true" | "on" => Ok(Self::Always),
            other => Err(Error::Config(format!("invalid automerge value: {other}"))),
        }
    }
}

impl fmt::Display for Automerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::Labeled => write!(f, "labeled"),
            Self::Always => write!(f, "always"),
        }
    }
}

/// Commit title used when merging a PR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitMessage {
    /// Let GitHub pick the title
    #[default]
    Automatic,
    /// `<PR title> (#<number>)`
    PullRequestTitle,
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Merge policy
    pub automerge: Automerge,
    /// Labels a PR must carry to be merged; `!name` means must not carry
    pub merge_labels: Vec<String>,
    /// Merge method
    pub merge_method: MergeMethod,
    /// Merge commit title
    pub merge_commit_message: CommitMessage,
    /// How often to retry a merge GitHub refuses as not yet mergeable
    pub merge_retries: u32,
    /// Pause between merge attempts, in milliseconds
    pub merge_retry_sleep: u64,
    /// GitHub Enterprise host (None for github.com)
    pub github_host: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            automerge: Automerge::default(),
            merge_labels: vec!["automerge".to_string()],
            merge_method: MergeMethod::default(),
            merge_commit_message: CommitMessage::default(),
            merge_retries: 6,
            merge_retry_sleep: 10_000,
            github_host: None,
        }
    }
}

impl Config {
    /// Load from `path` (or the default location if it exists), then apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_path().filter(|p| p.exists()),
        };

        let mut config = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Override fields from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AUTOMERGE") {
            self.automerge = v.parse()?;
        }
        if let Some(v) = lookup("MERGE_LABELS") {
            self.merge_labels = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("MERGE_METHOD") {
            self.merge_method = parse_enum("MERGE_METHOD", &v)?;
        }
        if let Some(v) = lookup("MERGE_COMMIT_MESSAGE") {
            self.merge_commit_message = parse_enum("MERGE_COMMIT_MESSAGE", &v)?;
        }
        if let Some(v) = lookup("MERGE_RETRIES") {
            self.merge_retries = v
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid MERGE_RETRIES {v:?}: {e}")))?;
        }
        if let Some(v) = lookup("MERGE_RETRY_SLEEP") {
            self.merge_retry_sleep = v
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid MERGE_RETRY_SLEEP {v:?}: {e}")))?;
        }
        if let Some(v) = lookup("GITHUB_HOST") {
            let host = v.trim();
            self.github_host = (!host.is_empty() && host != "github.com").then(|| host.to_string());
        }
        Ok(())
    }

    /// Labels that must be present for a merge
    pub fn required_labels(&self) -> impl Iterator<Item = &str> {
        self.merge_labels
            .iter()
            .map(String::as_str)
            .filter(|l| !l.starts_with('!'))
    }

    /// Labels that prevent a merge
    pub fn blocking_labels(&self) -> impl Iterator<Item = &str> {
        self.merge_labels
            .iter()
            .filter_map(|l| l.strip_prefix('!'))
    }

    /// Pause between merge attempts
    pub const fn retry_sleep(&self) -> Duration {
        Duration::from_millis(self.merge_retry_sleep)
    }

    /// Web host used for clone URLs
    pub fn web_host(&self) -> &str {
        self.github_host.as_deref().unwrap_or("github.com")
    }
}

/// Default config file location (`~/.config/pr-autoupdate/config.toml`)
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn parse_enum<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    let normalized = value.trim().to_ascii_lowercase();
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| Error::Config(format!("invalid {key} value: {value}")))
}
