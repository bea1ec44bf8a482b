//! Publish-only message channel capability.

use async_trait::async_trait;
use handin_core::Envelope;
use tracing::info;

mod error;
mod memory;
mod spool;

pub use error::{PublishError, PublishResult};
pub use memory::MemoryChannel;
pub use spool::SpoolChannel;

/// Messaging capability the submission pipeline depends on.
///
/// The pipeline only ever publishes; consumption belongs to the worker
/// fleet and stays out of this crate.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Publish one payload to a named channel.
    async fn publish(&self, channel: &str, payload: &str) -> PublishResult<()>;
}

/// Flatten an envelope to its wire form and publish it.
///
/// # Errors
///
/// Returns [`PublishError::Encode`] when serialization fails and
/// propagates transport failures from the channel.
pub async fn publish_envelope<C: MessageChannel + ?Sized>(
    channel: &C,
    channel_name: &str,
    envelope: &Envelope,
) -> PublishResult<()> {
    let payload = envelope
        .flatten()
        .map_err(|source| PublishError::Encode { source })?;
    channel.publish(channel_name, &payload).await?;
    info!(channel = channel_name, kind = envelope.kind(), "published envelope");
    Ok(())
}
