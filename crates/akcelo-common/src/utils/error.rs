//! Error types for the acceleration layer.
//!
//! The error surface here is deliberately small. Missing buckets, cache
//! misses and empty pages are not errors anywhere in the API - they return
//! empty collections or miss indicators. What remains are caller contract
//! violations and internal encoding failures.

use thiserror::Error;

/// Errors produced by the acceleration layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A key name was empty or malformed where one is required.
    ///
    /// This indicates a caller contract violation, not a data condition,
    /// and therefore propagates instead of degrading to an empty result.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// An internal serialization or deserialization failure.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// An internal invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidKey("empty condition key".to_string()).to_string(),
            "invalid key: empty condition key"
        );
        assert_eq!(
            Error::Internal("oops".to_string()).to_string(),
            "internal error: oops"
        );
    }
}
