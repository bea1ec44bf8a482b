//! In-memory object store with scriptable failures.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::ObjectStore;
use crate::error::{StoreError, StoreResult};

/// Failure a [`MemoryObjectStore`] can be scripted to return on the
/// next access to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// Pretend the object does not exist.
    NotFound,
    /// Pretend access is denied.
    Forbidden,
    /// Fail the transfer outright.
    Transfer,
}

#[derive(Default)]
struct Inner {
    objects: HashMap<(String, String), Vec<u8>>,
    get_failures: HashMap<(String, String), VecDeque<ScriptedFailure>>,
    put_failures: HashMap<(String, String), VecDeque<ScriptedFailure>>,
    puts: u64,
    gets: u64,
}

/// Map-backed store for tests and experiments. Clones share state.
///
/// Failures queued with [`MemoryObjectStore::fail_next_get`] or
/// [`MemoryObjectStore::fail_next_put`] are consumed one per access,
/// which makes transient-then-success polling scenarios easy to stage.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place object bytes directly, bypassing the trait.
    pub fn insert(&self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        let mut inner = self.lock();
        inner
            .objects
            .insert((bucket.to_string(), key.to_string()), bytes.into());
    }

    /// Read object bytes directly, bypassing the trait.
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let inner = self.lock();
        inner
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Queue a failure for the next `get` of `key`.
    pub fn fail_next_get(&self, bucket: &str, key: &str, failure: ScriptedFailure) {
        let mut inner = self.lock();
        inner
            .get_failures
            .entry((bucket.to_string(), key.to_string()))
            .or_default()
            .push_back(failure);
    }

    /// Queue a failure for the next `put` of `key`.
    pub fn fail_next_put(&self, bucket: &str, key: &str, failure: ScriptedFailure) {
        let mut inner = self.lock();
        inner
            .put_failures
            .entry((bucket.to_string(), key.to_string()))
            .or_default()
            .push_back(failure);
    }

    /// Number of `put` and `get` calls observed, in that order.
    #[must_use]
    pub fn traffic(&self) -> (u64, u64) {
        let inner = self.lock();
        (inner.puts, inner.gets)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn scripted(
        queue: &mut HashMap<(String, String), VecDeque<ScriptedFailure>>,
        bucket: &str,
        key: &str,
    ) -> Option<ScriptedFailure> {
        queue
            .get_mut(&(bucket.to_string(), key.to_string()))
            .and_then(VecDeque::pop_front)
    }

    fn failure_error(
        failure: ScriptedFailure,
        operation: &'static str,
        bucket: &str,
        key: &str,
    ) -> StoreError {
        match failure {
            ScriptedFailure::NotFound => StoreError::not_found(bucket, key),
            ScriptedFailure::Forbidden => StoreError::forbidden(bucket, key),
            ScriptedFailure::Transfer => StoreError::Transfer {
                operation,
                bucket: bucket.to_string(),
                key: key.to_string(),
                source: "scripted transfer failure".into(),
            },
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, local: &Path, bucket: &str, key: &str) -> StoreResult<u64> {
        let bytes = tokio::fs::read(local)
            .await
            .map_err(|source| StoreError::io("put.read_local", local, source))?;
        let mut inner = self.lock();
        inner.puts += 1;
        if let Some(failure) = Self::scripted(&mut inner.put_failures, bucket, key) {
            return Err(Self::failure_error(failure, "put", bucket, key));
        }
        let len = bytes.len() as u64;
        inner
            .objects
            .insert((bucket.to_string(), key.to_string()), bytes);
        Ok(len)
    }

    async fn get(&self, bucket: &str, key: &str, local: &Path) -> StoreResult<u64> {
        let bytes = {
            let mut inner = self.lock();
            inner.gets += 1;
            if let Some(failure) = Self::scripted(&mut inner.get_failures, bucket, key) {
                return Err(Self::failure_error(failure, "get", bucket, key));
            }
            inner
                .objects
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
                .ok_or_else(|| StoreError::not_found(bucket, key))?
        };
        tokio::fs::write(local, &bytes)
            .await
            .map_err(|source| StoreError::io("get.write_local", local, source))?;
        Ok(bytes.len() as u64)
    }
}
