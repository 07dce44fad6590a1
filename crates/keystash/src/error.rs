//! Error classification shared by the fallible parts of the crate.
//!
//! The cache engine itself never fails: lookups of absent keys return `None`
//! and removing an absent key is a no-op. Only the layers that touch the
//! outside world have error types:
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`FileCacheError`](crate::file::FileCacheError) | [`FileContentCache::get_content`](crate::file::FileContentCache::get_content) |
//! | `ScheduleError` | `schedule::schedule_prune` (feature `scheduler`) |
//!
//! Both implement [`ErrorClassification`] so callers can route them to retry
//! logic or alerting without matching on every variant.

use std::fmt;
use std::time::Duration;

/// Error classification trait for consistent handling across modules
///
/// # Example
///
/// ```rust
/// use keystash::error::{ErrorClassification, ErrorSeverity};
///
/// #[derive(Debug)]
/// enum LoadError {
///     Busy,
///     Corrupt,
/// }
///
/// impl ErrorClassification for LoadError {
///     fn is_retryable(&self) -> bool {
///         matches!(self, Self::Busy)
///     }
///
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             Self::Busy => ErrorSeverity::Warning,
///             Self::Corrupt => ErrorSeverity::Critical,
///         }
///     }
/// }
///
/// assert!(LoadError::Busy.is_retryable());
/// assert!(LoadError::Corrupt.is_critical());
/// ```
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: the same call may succeed if attempted
    /// again (interrupted reads, lock contention on the file system).
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for error classification.
    use super::*;

    struct Flaky;

    impl ErrorClassification for Flaky {
        fn is_retryable(&self) -> bool {
            true
        }

        fn severity(&self) -> ErrorSeverity {
            ErrorSeverity::Warning
        }
    }

    /// Validates the provided `ErrorClassification` methods for a warning
    /// level error.
    ///
    /// Assertions:
    /// - Ensures `is_critical()` evaluates to false.
    /// - Confirms `retry_after()` equals `None`.
    #[test]
    fn test_default_classification_methods() {
        assert!(Flaky.is_retryable());
        assert!(!Flaky.is_critical());
        assert_eq!(Flaky.retry_after(), None);
    }

    /// Validates `ErrorSeverity` ordering and display.
    ///
    /// Assertions:
    /// - Ensures levels are ordered from `Info` to `Critical`.
    /// - Confirms the display strings match the log level names.
    #[test]
    fn test_severity_ordering_and_display() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);

        assert_eq!(ErrorSeverity::Info.to_string(), "INFO");
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ErrorSeverity::Error.to_string(), "ERROR");
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }
}
