//! Error primitives for dependency-manifest resolution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for manifest resolution.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors produced while resolving a dependency manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// A manifest line failed to compile as a glob pattern.
    #[error("invalid manifest pattern")]
    Pattern {
        /// Offending pattern text.
        pattern: String,
        /// Underlying globset error.
        source: globset::Error,
    },
    /// IO failure while reading the manifest file.
    #[error("manifest io failure")]
    Io {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Directory traversal failed while expanding patterns.
    #[error("manifest walk failure")]
    Walk {
        /// Root that was being traversed.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
}
