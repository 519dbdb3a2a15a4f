//! Backend error types

use std::io;

use thiserror::Error;

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Read for a key failed.
    #[error("backend read failed for key '{key}': {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Write for a key failed.
    #[error("backend write failed for key '{key}': {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Remove for a key failed.
    #[error("backend remove failed for key '{key}': {source}")]
    RemoveFailed {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The backend refused the operation (quota exhausted, read-only mode).
    #[error("backend rejected operation on key '{key}': {reason}")]
    Rejected { key: String, reason: String },
}

impl BackendError {
    /// Create a read failure for `key`.
    pub fn read_failed(key: impl Into<String>, source: io::Error) -> Self {
        Self::ReadFailed {
            key: key.into(),
            source,
        }
    }

    /// Create a write failure for `key`.
    pub fn write_failed(key: impl Into<String>, source: io::Error) -> Self {
        Self::WriteFailed {
            key: key.into(),
            source,
        }
    }

    /// Create a remove failure for `key`.
    pub fn remove_failed(key: impl Into<String>, source: io::Error) -> Self {
        Self::RemoveFailed {
            key: key.into(),
            source,
        }
    }

    /// Create a rejection for `key`.
    pub fn rejected(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
