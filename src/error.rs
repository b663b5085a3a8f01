//! Error types for the timed cache library.
//!
//! The error enum keeps the two misuse categories distinct: operating on a
//! terminated cache is an illegal-state error, while constructing a cache
//! from an incomplete configuration is an invalid-argument error.

use std::io;
use thiserror::Error;

/// The main error type for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A cache operation was invoked after `shutdown` completed.
    ///
    /// The payload names the operation that was attempted, so misuse after
    /// teardown is loud and debuggable rather than a silent no-op.
    #[error("cache already terminated: {0}")]
    Terminated(&'static str),

    /// A required constructor argument was not supplied.
    #[error("missing required configuration: {0}")]
    MissingConfiguration(&'static str),

    /// The eviction scheduler's runtime could not be started.
    #[error("failed to start eviction scheduler: {0}")]
    Scheduler(#[from] io::Error),
}

/// A specialized Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminated_display() {
        let err = CacheError::Terminated("trying to add entry after termination");
        assert_eq!(
            format!("{}", err),
            "cache already terminated: trying to add entry after termination"
        );
    }

    #[test]
    fn test_missing_configuration_display() {
        let err = CacheError::MissingConfiguration("time unit");
        assert_eq!(
            format!("{}", err),
            "missing required configuration: time unit"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::Other, "no threads");
        let cache_err: CacheError = io_err.into();
        assert!(matches!(cache_err, CacheError::Scheduler(_)));
    }
}
