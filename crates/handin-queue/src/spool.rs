//! File-per-message spool channel.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::MessageChannel;
use crate::error::{PublishError, PublishResult};

/// Channel that lands each message as one file under
/// `root/<channel>/<uuid>.json`.
///
/// This is the local backend the CLI wires up by default; a broker
/// adapter would implement the same trait. Consumers pick files up in
/// directory order, which is all the publish-only pipeline needs.
#[derive(Debug, Clone)]
pub struct SpoolChannel {
    root: PathBuf,
}

impl SpoolChannel {
    /// Create a spool rooted at `root`. Directories are created per
    /// channel on first publish.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding one channel's messages.
    #[must_use]
    pub fn channel_dir(&self, channel: &str) -> PathBuf {
        self.root.join(channel)
    }
}

#[async_trait]
impl MessageChannel for SpoolChannel {
    async fn publish(&self, channel: &str, payload: &str) -> PublishResult<()> {
        let dir = self.channel_dir(channel);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| PublishError::Transport {
                channel: channel.to_string(),
                source: Box::new(source),
            })?;
        let message_path = dir.join(format!("{}.json", Uuid::new_v4()));
        tokio::fs::write(&message_path, payload)
            .await
            .map_err(|source| PublishError::Transport {
                channel: channel.to_string(),
                source: Box::new(source),
            })?;
        debug!(channel, message = %message_path.display(), "spooled message");
        Ok(())
    }
}
