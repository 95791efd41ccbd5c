//! Error types for the analytics engine

use thiserror::Error;

/// Engine-wide error types
///
/// The engine degrades gracefully on malformed-but-well-typed input (empty
/// collections, duplicate dates, out-of-range scores). Contract violations —
/// records that fail to parse, impossible calendar coordinates — are fatal
/// and surface here instead of being silently coerced.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
