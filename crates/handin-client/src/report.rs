//! Result reporting for a completed submission.

/// What came back from a task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    /// Whether the result archive arrived before the deadline.
    pub retrieved: bool,
    /// Captured standard output of the remote run.
    pub stdout: String,
    /// Captured standard error of the remote run.
    pub stderr: String,
}

impl SubmissionReport {
    /// Render both captured streams with the framing students see on
    /// their terminal.
    #[must_use]
    pub fn framed(&self) -> String {
        let mut out = framed_section("STDOUT", &self.stdout);
        out.push('\n');
        out.push_str(&framed_section("STDERR", &self.stderr));
        out
    }
}

fn framed_section(header: &str, body: &str) -> String {
    format!(" ====  {header}  ====\n\n{body}\n ====  END  ====\n")
}
