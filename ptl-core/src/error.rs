/// Error types for the plant telemetry library
use thiserror::Error;

/// Why a single CSV row was rejected during normalization.
///
/// Row-level failures never propagate past the stream parser; they are
/// recovered locally and counted as skipped lines.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// Fewer columns than the positional format requires
    #[error("Expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    /// Timestamp column did not parse as a non-negative integer
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// File-level load failure, surfaced to the caller of a session load.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum LoadError {
    /// Raw payload could not be read or contained nothing but whitespace
    #[error("Payload is empty or unreadable")]
    EmptyOrUnreadable,

    /// Payload was readable but no line normalized successfully
    #[error("No valid telemetry records found in payload")]
    NoValidRecords,
}
