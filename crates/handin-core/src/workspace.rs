//! Workspace identity and the derived store keys for its artifacts.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::paths::StorePath;

/// Stable identity of one submission.
///
/// The identifier is minted once at construction and every artifact
/// name and store key is derived from it, so the input and output of a
/// run can never collide with another submission or with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDescriptor {
    id: String,
    prefix: String,
}

impl WorkspaceDescriptor {
    /// Mint a fresh workspace under `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            id: unique_id(),
            prefix: prefix.into(),
        }
    }

    /// Rebuild a descriptor from a previously minted identifier.
    #[must_use]
    pub fn from_parts(id: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prefix: prefix.into(),
        }
    }

    /// Workspace identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Key prefix under which this workspace's artifacts live.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// File name of the input archive.
    #[must_use]
    pub fn input_name(&self) -> String {
        format!("{}_in.tar", self.id)
    }

    /// File name of the output archive.
    #[must_use]
    pub fn output_name(&self) -> String {
        format!("{}_out.tar", self.id)
    }

    /// Store key of the input archive.
    #[must_use]
    pub fn input_key(&self) -> String {
        format!("{}/{}/{}", self.prefix, self.id, self.input_name())
    }

    /// Store key of the output archive.
    #[must_use]
    pub fn output_key(&self) -> String {
        format!("{}/{}/{}", self.prefix, self.id, self.output_name())
    }

    /// Input archive staged under `dir`, paired with its store key.
    #[must_use]
    pub fn input_artifact(&self, dir: &Path) -> StorePath {
        StorePath::new(dir.join(self.input_name()), self.input_key())
    }

    /// Output archive staged under `dir`, paired with its store key.
    #[must_use]
    pub fn output_artifact(&self, dir: &Path) -> StorePath {
        StorePath::new(dir.join(self.output_name()), self.output_key())
    }
}

/// Mint a workspace identifier from the current UTC time and a random
/// UUID. The timestamp keeps listings readable; the UUID carries the
/// uniqueness.
fn unique_id() -> String {
    format!("ws_{}_{}", Utc::now().format("%Y%m%dT%H%M%S"), Uuid::new_v4())
}
