//! Inspectable in-memory channel for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::MessageChannel;
use crate::error::PublishResult;

/// Channel that appends payloads to per-channel vectors. Clones share
/// state, so a test can publish through one handle and assert through
/// another.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    messages: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl MemoryChannel {
    /// Create an empty channel set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads published to `channel`, in order.
    #[must_use]
    pub fn published(&self, channel: &str) -> Vec<String> {
        let messages = self
            .messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        messages.get(channel).cloned().unwrap_or_default()
    }

    /// Total number of messages across all channels.
    #[must_use]
    pub fn len(&self) -> usize {
        let messages = self
            .messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        messages.values().map(Vec::len).sum()
    }

    /// Whether nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageChannel for MemoryChannel {
    async fn publish(&self, channel: &str, payload: &str) -> PublishResult<()> {
        let mut messages = self
            .messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        messages
            .entry(channel.to_string())
            .or_default()
            .push(payload.to_string());
        Ok(())
    }
}
