//! # Design
//!
//! - Provide structured, constant-message errors for store transfers.
//! - Distinguish the retriable outcomes (`NotFound`, `Forbidden`) from
//!   the fatal ones so the polling client can branch on variants.
//! - Preserve source errors without interpolating context into error
//!   messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for object-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by object-store implementations and the transfer
/// client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object does not exist under the given bucket and key.
    #[error("store object not found")]
    NotFound {
        /// Bucket that was searched.
        bucket: String,
        /// Key that was requested.
        key: String,
    },
    /// Access to the object was denied.
    #[error("store access forbidden")]
    Forbidden {
        /// Bucket that was searched.
        bucket: String,
        /// Key that was requested.
        key: String,
    },
    /// Local IO failure while staging or landing bytes.
    #[error("store io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Local path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Transfer failed for a reason other than absence or access.
    #[error("store transfer failure")]
    Transfer {
        /// Operation that triggered the transfer failure.
        operation: &'static str,
        /// Bucket involved in the transfer.
        bucket: String,
        /// Key involved in the transfer.
        key: String,
        /// Underlying cause.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    pub(crate) fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub(crate) fn forbidden(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Forbidden {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether a polling download may retry after this error.
    #[must_use]
    pub const fn is_retriable(&self, retry_forbidden: bool) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Forbidden { .. } => retry_forbidden,
            Self::Io { .. } | Self::Transfer { .. } => false,
        }
    }
}
