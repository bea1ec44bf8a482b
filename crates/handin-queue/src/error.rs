//! Error primitives for message publication.

use thiserror::Error;

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors produced while publishing to a channel.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The payload could not be serialized.
    #[error("message encode failure")]
    Encode {
        /// Underlying serializer error.
        source: serde_json::Error,
    },
    /// The transport rejected or failed the publication.
    #[error("message transport failure")]
    Transport {
        /// Channel the message was bound for.
        channel: String,
        /// Underlying cause.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
