//! Core submission domain types shared across the workspace.
//!
//! # Design
//! - Pure value objects: resource identities, workspace descriptors,
//!   command specs, and wire envelopes. No transport logic lives here.
//! - Everything that crosses the queue is serde-serializable with
//!   fields only; live handles never enter an envelope.

mod command;
mod envelope;
mod error;
mod paths;
mod workspace;

pub use command::CommandSpec;
pub use envelope::{Envelope, RegistrationEnvelope, TaskEnvelope};
pub use error::{ManifestError, ManifestResult};
pub use paths::{ResourcePath, StorePath, join, normalize, relative_to};
pub use workspace::WorkspaceDescriptor;
