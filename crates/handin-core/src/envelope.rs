//! Wire envelopes published to the task queue.

use serde::{Deserialize, Serialize};

use crate::command::CommandSpec;
use crate::workspace::WorkspaceDescriptor;

/// Request to run a packaged submission.
///
/// Everything a worker needs travels in the envelope itself; the
/// archive bytes are addressed by the workspace keys, never inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    /// Command to execute against the unpacked workspace.
    pub command: CommandSpec,
    /// Identity and store keys of the submission.
    pub workspace: WorkspaceDescriptor,
    /// Directory, relative to the unpacked root, to execute in.
    pub work_dir: String,
    /// Whether the worker should collect performance counters.
    #[serde(default)]
    pub capture_perf: bool,
}

/// Request to register a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEnvelope {
    /// Participant identifier.
    pub id: String,
    /// Contact address for result notifications.
    pub email: String,
}

/// Any message the pipeline can publish, tagged for dispatch on the
/// consuming side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Execute a submission.
    Task(TaskEnvelope),
    /// Register a participant.
    Registration(RegistrationEnvelope),
}

impl Envelope {
    /// Tag under which this envelope travels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Task(_) => "task",
            Self::Registration(_) => "registration",
        }
    }

    /// Serialize to the single-line JSON form the queue carries.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when a field cannot be encoded.
    pub fn flatten(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn task() -> Envelope {
        Envelope::Task(TaskEnvelope {
            command: CommandSpec::new("./run.sh", 60, 1, "deps.aws"),
            workspace: WorkspaceDescriptor::from_parts("ws_fixed", "submission"),
            work_dir: "project".to_string(),
            capture_perf: false,
        })
    }

    #[test]
    fn flatten_tags_the_variant() -> Result<(), Box<dyn Error>> {
        let json = task().flatten()?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["type"], "task");
        assert_eq!(value["workspace"]["id"], "ws_fixed");
        assert_eq!(value["command"]["shell"][0], "./run.sh");
        Ok(())
    }

    #[test]
    fn registration_round_trips() -> Result<(), Box<dyn Error>> {
        let envelope = Envelope::Registration(RegistrationEnvelope {
            id: "s123".to_string(),
            email: "s123@example.edu".to_string(),
        });
        assert_eq!(envelope.kind(), "registration");
        let back: Envelope = serde_json::from_str(&envelope.flatten()?)?;
        assert_eq!(envelope, back);
        Ok(())
    }

    #[test]
    fn capture_perf_defaults_off_when_absent() -> Result<(), Box<dyn Error>> {
        let json = task().flatten()?;
        let mut value: serde_json::Value = serde_json::from_str(&json)?;
        value.as_object_mut().ok_or("object")?.remove("capture_perf");
        let back: Envelope = serde_json::from_value(value)?;
        let Envelope::Task(task) = back else {
            return Err("expected task".into());
        };
        assert!(!task.capture_perf);
        Ok(())
    }
}
