//! Submission lifecycle phases.

/// Phases a task submission moves through, in order. Used for tracing
/// and for reporting where a failed run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// Collecting dependencies and building the input archive.
    Packaging,
    /// Pushing the input archive to the object store.
    Uploading,
    /// Publishing the task envelope to the queue.
    Publishing,
    /// Polling the store for the result archive.
    AwaitingResult,
    /// Extracting and reporting the result contents.
    Unpacking,
    /// Pipeline finished.
    Done,
    /// Pipeline aborted.
    Failed,
}

impl SubmissionPhase {
    /// Stable label for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Packaging => "packaging",
            Self::Uploading => "uploading",
            Self::Publishing => "publishing",
            Self::AwaitingResult => "awaiting_result",
            Self::Unpacking => "unpacking",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}
