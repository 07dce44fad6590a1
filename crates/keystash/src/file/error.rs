//! File content cache error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Failure to produce a file's bytes
///
/// A failed read never changes the cache: nothing is stored and nothing is
/// evicted.
#[derive(Debug, Error)]
pub enum FileCacheError {
    /// Nothing exists at the path
    #[error("File not found: {}", path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// The path exists but is a directory or other non-regular file
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that was requested
        path: PathBuf,
    },

    /// The file is too large to be held in memory on this platform
    #[error("File {} is too large to load ({len} bytes)", path.display())]
    TooLarge {
        /// Path that was requested
        path: PathBuf,
        /// Reported length in bytes
        len: u64,
    },

    /// Any other read failure
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl FileCacheError {
    /// Path the failed read was for
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::NotAFile { path }
            | Self::TooLarge { path, .. }
            | Self::Io { path, .. } => path,
        }
    }

    /// Classify an I/O error raised while reading `path`.
    pub(crate) fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// File cache result type
pub type FileCacheResult<T> = Result<T, FileCacheError>;

impl ErrorClassification for FileCacheError {
    /// Only interrupted or contended reads are worth retrying; a missing or
    /// oversized file stays that way.
    fn is_retryable(&self) -> bool {
        match self {
            Self::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            Self::NotFound { .. } | Self::NotAFile { .. } | Self::TooLarge { .. } => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Info,
            Self::NotAFile { .. } | Self::TooLarge { .. } => ErrorSeverity::Warning,
            Self::Io { .. } => ErrorSeverity::Error,
        }
    }
}
