//! Three-way handler results
//!
//! Every handler returns `Result<Outcome<T>>`: `Ok(Success)` for real
//! progress, `Ok(Neutral)` for a deliberate no-op, and `Err` for a genuine
//! failure. Callers have to match on the neutral case explicitly.

use std::fmt;

/// Result of a unit of work that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Work was done
    Success(T),
    /// Nothing to do here; not an error
    Neutral(String),
}

impl<T> Outcome<T> {
    /// Build a neutral outcome with the given reason
    pub fn neutral(reason: impl Into<String>) -> Self {
        Self::Neutral(reason.into())
    }

    /// Check for the neutral case
    pub const fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral(_))
    }

    /// Check for the success case
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Map the success value, passing neutral through
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Neutral(reason) => Outcome::Neutral(reason),
        }
    }

    /// Neutral reason, if any
    pub fn neutral_reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Neutral(reason) => Some(reason),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(f, "success: {value}"),
            Self::Neutral(reason) => write!(f, "neutral: {reason}"),
        }
    }
}

/// Unwrap a success value or return the neutral outcome from the enclosing
/// function
#[macro_export]
macro_rules! try_outcome {
    ($expr:expr) => {
        match $expr {
            $crate::outcome::Outcome::Success(value) => value,
            $crate::outcome::Outcome::Neutral(reason) => {
                return Ok($crate::outcome::Outcome::Neutral(reason));
            }
        }
    };
}
