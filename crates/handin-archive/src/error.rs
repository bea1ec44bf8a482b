//! # Design
//!
//! - Provide structured, constant-message errors for the archive codec.
//! - Capture operation context (paths, member names) to make failures
//!   reproducible in tests.
//! - Preserve source errors without interpolating context into error
//!   messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors produced by the tar codec.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive name does not carry the expected `.tar` extension.
    #[error("archive name is not a tar file")]
    InvalidName {
        /// Offending archive path.
        path: PathBuf,
    },
    /// The archive file does not exist on disk.
    #[error("archive file not found")]
    NotFound {
        /// Path that was expected to hold the archive.
        path: PathBuf,
    },
    /// A requested member is absent from the archive.
    #[error("archive member not found")]
    MemberNotFound {
        /// Name of the missing member.
        name: String,
        /// Archive that was searched.
        path: PathBuf,
    },
    /// An archive entry could not be read or unpacked.
    #[error("archive entry failure")]
    Entry {
        /// Operation that triggered the entry failure.
        operation: &'static str,
        /// Archive involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// IO failure while reading or writing archive files.
    #[error("archive io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl ArchiveError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn entry(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Entry {
            operation,
            path: path.into(),
            source,
        }
    }
}
