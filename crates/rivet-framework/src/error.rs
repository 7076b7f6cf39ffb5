//! Error types for the Rivet framework.
//!
//! Rule outcomes are plain `bool`s and never show up here. These errors cover
//! pattern construction and the follow-up wait.

use thiserror::Error;

/// Errors raised while building a [`Pattern`](crate::Pattern) or a
/// regular-expression rule.
///
/// These are programmer errors. The panicking builder forms surface them at
/// registration time; the `try_*` forms hand them back instead.
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    /// The regular expression does not compile.
    #[error("invalid regular expression `{pattern}`: {source}")]
    InvalidRegex {
        /// The offending expression.
        pattern: String,
        /// The compiler error.
        #[source]
        source: regex::Error,
    },

    /// A modifier was applied to a pattern with no segments.
    #[error("pattern is empty")]
    EmptyPattern,
}

impl PatternError {
    pub(crate) fn invalid_regex(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        }
    }
}

/// Why a follow-up wait ended without a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    /// No matching event arrived in time.
    #[error("timed out waiting for a follow-up event")]
    Timeout,

    /// The waiter was discarded by the registry.
    #[error("future event registry closed")]
    Closed,
}

/// Result type for pattern construction.
pub type PatternResult<T> = Result<T, PatternError>;
