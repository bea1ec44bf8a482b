//! Transfer client: single-shot uploads and deadline-bounded polling
//! downloads.

use std::path::Path;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::ObjectStore;
use crate::error::StoreResult;
use crate::progress::TransferProgress;

/// How a polling download treats transient outcomes.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Fixed pause between polls.
    pub backoff: Duration,
    /// Treat a forbidden response as transient. Stores that publish
    /// results by flipping object ACLs answer forbidden until the
    /// result is ready, so this defaults on.
    pub retry_forbidden: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(1),
            retry_forbidden: true,
        }
    }
}

/// Store client that records every byte moved into a shared
/// [`TransferProgress`] aggregate under this client's worker identity.
pub struct TransferClient<S> {
    store: S,
    progress: TransferProgress,
    policy: RetryPolicy,
    worker: String,
}

impl<S: ObjectStore> TransferClient<S> {
    /// Wrap a store with a fresh progress aggregate and default policy.
    pub fn new(store: S, worker: impl Into<String>) -> Self {
        Self {
            store,
            progress: TransferProgress::new(),
            policy: RetryPolicy::default(),
            worker: worker.into(),
        }
    }

    /// Report into an existing progress aggregate.
    #[must_use]
    pub fn with_progress(mut self, progress: TransferProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Override the polling policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Progress aggregate this client reports into.
    #[must_use]
    pub const fn progress(&self) -> &TransferProgress {
        &self.progress
    }

    /// Upload `local` to `bucket`/`key` in one shot.
    ///
    /// There is no application-level retry; a failed upload surfaces
    /// the store error to the caller.
    ///
    /// # Errors
    ///
    /// Propagates the store error unchanged.
    pub async fn upload(&self, local: &Path, bucket: &str, key: &str) -> StoreResult<u64> {
        let bytes = self.store.put(local, bucket, key).await?;
        self.progress.record(&self.worker, bytes);
        info!(bucket, key, bytes, "uploaded object");
        Ok(bytes)
    }

    /// Poll for `bucket`/`key` until it lands at `local` or `timeout`
    /// elapses.
    ///
    /// Not-found answers (and forbidden ones, per the policy) pause for
    /// the configured backoff and retry. Expiry of the deadline is a
    /// soft failure reported as `Ok(None)`; the caller decides whether
    /// that is fatal.
    ///
    /// # Errors
    ///
    /// Propagates any non-retriable store error immediately.
    pub async fn download_within(
        &self,
        bucket: &str,
        key: &str,
        local: &Path,
        timeout: Duration,
    ) -> StoreResult<Option<u64>> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.store.get(bucket, key, local).await {
                Ok(bytes) => {
                    self.progress.record(&self.worker, bytes);
                    info!(bucket, key, bytes, "downloaded object");
                    return Ok(Some(bytes));
                }
                Err(err) if err.is_retriable(self.policy.retry_forbidden) => {
                    if Instant::now() + self.policy.backoff > deadline {
                        warn!(bucket, key, "download deadline expired while polling");
                        return Ok(None);
                    }
                    debug!(bucket, key, "object not ready; polling again");
                    tokio::time::sleep(self.policy.backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
