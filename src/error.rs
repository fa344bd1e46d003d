//! Error types for pr-autoupdate
//!
//! "Nothing to do" conditions are not errors and never show up here; they
//! travel as [`Outcome::Neutral`](crate::outcome::Outcome::Neutral).

use thiserror::Error;

/// Errors that can occur while handling an event
#[derive(Debug, Error)]
pub enum Error {
    /// The interactive entry point was given a URL it cannot interpret
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The event name is not one of the supported webhook events
    #[error("invalid event type: {0}")]
    InvalidEventType(String),

    /// The event payload could not be decoded for its event name
    #[error("invalid {event} payload: {message}")]
    InvalidPayload {
        /// Event name the payload was decoded for
        event: String,
        /// Decoder message
        message: String,
    },

    /// A required argument was missing (caller wiring defect)
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// No GitHub token could be found
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform error (used by test doubles and non-API failures)
    #[error("platform error: {0}")]
    Platform(String),

    /// Scratch directory or other filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error was caused by bad caller input rather than an
    /// upstream failure
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_)
                | Self::InvalidEventType(_)
                | Self::InvalidPayload { .. }
                | Self::InvalidArguments(_)
                | Self::Auth(_)
                | Self::Config(_)
        )
    }
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_classified() {
        assert!(Error::InvalidEventType("issues".into()).is_client_error());
        assert!(Error::InvalidUrl("nope".into()).is_client_error());
        assert!(!Error::GitHubApi("boom".into()).is_client_error());
        assert!(!Error::Platform("boom".into()).is_client_error());
    }

    #[test]
    fn test_invalid_event_type_message() {
        let err = Error::InvalidEventType("issues".into());
        assert_eq!(err.to_string(), "invalid event type: issues");
    }
}
