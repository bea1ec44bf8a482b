//! Object-store capability and the transfer client built on it.

use std::path::Path;

use async_trait::async_trait;

mod client;
mod error;
mod fs;
mod memory;
mod progress;

pub use client::{RetryPolicy, TransferClient};
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::{MemoryObjectStore, ScriptedFailure};
pub use progress::TransferProgress;

/// Storage capability the submission pipeline depends on.
///
/// Implementations move whole objects between a local path and a
/// bucket/key pair and report the number of bytes moved.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store the file at `local` under `bucket`/`key`.
    async fn put(&self, local: &Path, bucket: &str, key: &str) -> StoreResult<u64>;

    /// Fetch `bucket`/`key` into the file at `local`.
    async fn get(&self, bucket: &str, key: &str, local: &Path) -> StoreResult<u64>;
}
