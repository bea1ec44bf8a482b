//! Error type for the submission pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for submission operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the submission pipeline. Causes pass through
/// unchanged; there is no mid-pipeline recovery.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Packaging or unpacking the workspace failed.
    #[error("submission archive failure")]
    Archive(#[from] handin_archive::ArchiveError),
    /// Moving archives through the object store failed.
    #[error("submission transfer failure")]
    Store(#[from] handin_store::StoreError),
    /// Publishing the envelope failed.
    #[error("submission publish failure")]
    Publish(#[from] handin_queue::PublishError),
    /// Resolving the dependency manifest failed.
    #[error("submission manifest failure")]
    Manifest(#[from] handin_core::ManifestError),
    /// Local IO failure while staging the submission.
    #[error("submission io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl ClientError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
