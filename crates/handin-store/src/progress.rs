//! Shared byte counters for concurrent transfers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable aggregate of bytes moved, keyed by worker identity.
///
/// Clones share the same counters, so every transfer client in a
/// process can report into one aggregate. Counters only ever grow.
#[derive(Debug, Clone, Default)]
pub struct TransferProgress {
    totals: Arc<Mutex<HashMap<String, u64>>>,
}

impl TransferProgress {
    /// Create an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `bytes` to the counter for `worker`.
    pub fn record(&self, worker: &str, bytes: u64) {
        let mut totals = self
            .totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *totals.entry(worker.to_string()).or_insert(0) += bytes;
    }

    /// Bytes recorded for one worker.
    #[must_use]
    pub fn of(&self, worker: &str) -> u64 {
        let totals = self
            .totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        totals.get(worker).copied().unwrap_or(0)
    }

    /// Bytes recorded across all workers.
    #[must_use]
    pub fn total(&self) -> u64 {
        let totals = self
            .totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        totals.values().sum()
    }
}
