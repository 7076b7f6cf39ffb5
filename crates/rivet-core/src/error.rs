//! Unified error types for the Rivet core.
//!
//! Rule outcomes are never errors; these types cover collaborator calls and
//! binding per-event state into handler-facing values.

use thiserror::Error;

// =============================================================================
// API Errors
// =============================================================================

/// Error type for collaborator (bot API) calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The bot is not connected.
    #[error("bot is not connected")]
    NotConnected,
    /// The API call timed out.
    #[error("API call timed out")]
    Timeout,
    /// The API returned an error.
    #[error("API error ({retcode}): {message}")]
    ApiError { retcode: i64, message: String },
    /// The requested object does not exist (e.g. an expired history message).
    #[error("{0} not found")]
    NotFound(String),
    /// Failed to serialize/deserialize.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// The event does not have the required session information.
    #[error("missing session info")]
    MissingSession,
    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

// =============================================================================
// Extraction Errors
// =============================================================================

/// Errors that can occur when binding context state into handler values.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// Nothing has been stored under the state key.
    #[error("state key '{0}' is not set")]
    MissingState(String),

    /// The state key holds a value of another type.
    #[error("state key '{key}' does not hold a '{expected}'")]
    StateTypeMismatch {
        /// The state key.
        key: String,
        /// Expected type name.
        expected: &'static str,
    },

    /// No pattern slot has this index or name, or a required slot was skipped.
    #[error("pattern slot '{0}' is not available")]
    MissingSlot(String),

    /// The pattern slot matched a different kind of segment.
    #[error("pattern slot '{slot}' does not hold a {expected} value")]
    SlotKindMismatch {
        /// Slot index or name.
        slot: String,
        /// Segment kind the accessor reads.
        expected: &'static str,
    },

    /// Custom extraction error.
    #[error("{0}")]
    Custom(String),
}

impl ExtractError {
    /// Creates a custom extraction error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
