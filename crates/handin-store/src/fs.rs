//! Directory-backed object store.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::ObjectStore;
use crate::error::{StoreError, StoreResult};

/// Object store laid out as `root/bucket/key` on the local filesystem.
///
/// This is the backend the CLI wires up by default; a managed-cloud
/// adapter would implement the same trait.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`. The directory is created on
    /// first use, not here.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// On-disk location of an object.
    #[must_use]
    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, local: &Path, bucket: &str, key: &str) -> StoreResult<u64> {
        let destination = self.object_path(bucket, key);
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::io("put.create_parent", parent, source))?;
        }
        let bytes = tokio::fs::copy(local, &destination)
            .await
            .map_err(|source| map_object_error("put.copy", local, bucket, key, source))?;
        debug!(bucket, key, bytes, "stored object");
        Ok(bytes)
    }

    async fn get(&self, bucket: &str, key: &str, local: &Path) -> StoreResult<u64> {
        let source_path = self.object_path(bucket, key);
        if let Some(parent) = local.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::io("get.create_parent", parent, source))?;
        }
        let bytes = tokio::fs::copy(&source_path, local)
            .await
            .map_err(|source| map_object_error("get.copy", &source_path, bucket, key, source))?;
        debug!(bucket, key, bytes, "fetched object");
        Ok(bytes)
    }
}

fn map_object_error(
    operation: &'static str,
    path: &Path,
    bucket: &str,
    key: &str,
    source: io::Error,
) -> StoreError {
    match source.kind() {
        io::ErrorKind::NotFound => StoreError::not_found(bucket, key),
        io::ErrorKind::PermissionDenied => StoreError::forbidden(bucket, key),
        _ => StoreError::io(operation, path, source),
    }
}
