//! The issuer drives one envelope through the submission pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use handin_config::SubmitConfig;
use handin_core::{Envelope, ResourcePath, TaskEnvelope, join, relative_to};
use handin_queue::{MessageChannel, publish_envelope};
use handin_store::{ObjectStore, TransferClient};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::phase::SubmissionPhase;
use crate::report::SubmissionReport;

const STDOUT_MEMBER: &str = "stdout";
const STDERR_MEMBER: &str = "stderr";

/// Explicit submission context: endpoint configuration, a transfer
/// client, and a message channel, all passed by handle.
pub struct Issuer<S, C> {
    config: SubmitConfig,
    transfers: TransferClient<S>,
    channel: C,
}

impl<S: ObjectStore, C: MessageChannel> Issuer<S, C> {
    /// Assemble an issuer from its capabilities.
    pub const fn new(config: SubmitConfig, transfers: TransferClient<S>, channel: C) -> Self {
        Self {
            config,
            transfers,
            channel,
        }
    }

    /// Endpoint configuration this issuer publishes against.
    #[must_use]
    pub const fn config(&self) -> &SubmitConfig {
        &self.config
    }

    /// Drive one envelope to completion.
    ///
    /// A registration envelope is a single publish and yields no
    /// report. A task envelope runs the full pipeline against the
    /// workspace rooted at `root` and yields a [`SubmissionReport`].
    ///
    /// # Errors
    ///
    /// Propagates the failing stage's error unchanged.
    pub async fn issue(
        &self,
        envelope: &Envelope,
        root: &Path,
    ) -> ClientResult<Option<SubmissionReport>> {
        match envelope {
            Envelope::Registration(registration) => {
                info!(id = %registration.id, "publishing registration");
                publish_envelope(&self.channel, &self.config.reg_queue, envelope).await?;
                Ok(None)
            }
            Envelope::Task(task) => {
                let result = self.run_task(envelope, task, root).await;
                match &result {
                    Ok(report) => info!(
                        phase = SubmissionPhase::Done.as_str(),
                        retrieved = report.retrieved,
                        "submission finished"
                    ),
                    Err(err) => warn!(
                        phase = SubmissionPhase::Failed.as_str(),
                        error = %err,
                        "submission aborted"
                    ),
                }
                result.map(Some)
            }
        }
    }

    async fn run_task(
        &self,
        envelope: &Envelope,
        task: &TaskEnvelope,
        root: &Path,
    ) -> ClientResult<SubmissionReport> {
        let work_dir = PathBuf::from(&task.work_dir);
        std::fs::create_dir_all(&work_dir)
            .map_err(|source| ClientError::io("prepare_work_dir", &work_dir, source))?;

        info!(
            phase = SubmissionPhase::Packaging.as_str(),
            workspace = task.workspace.id(),
            "packaging submission"
        );
        let members = dependencies(task, root)?;
        let input = task.workspace.input_artifact(&work_dir);
        handin_archive::compress(root, input.local(), &members)?;

        info!(
            phase = SubmissionPhase::Uploading.as_str(),
            key = input.key(),
            "uploading input archive"
        );
        self.transfers
            .upload(input.local(), &self.config.bucket, input.key())
            .await?;

        info!(
            phase = SubmissionPhase::Publishing.as_str(),
            channel = %self.config.task_queue,
            "publishing task envelope"
        );
        publish_envelope(&self.channel, &self.config.task_queue, envelope).await?;

        info!(
            phase = SubmissionPhase::AwaitingResult.as_str(),
            timeout_secs = task.command.timeout_secs,
            "waiting for result archive"
        );
        let output = task.workspace.output_artifact(&work_dir);
        let retrieved = self
            .transfers
            .download_within(
                &self.config.bucket,
                output.key(),
                output.local(),
                Duration::from_secs(task.command.timeout_secs),
            )
            .await?
            .is_some();

        info!(phase = SubmissionPhase::Unpacking.as_str(), retrieved, "unpacking result");
        let report = if retrieved {
            unpack_result(task, &work_dir, output.local())?
        } else {
            SubmissionReport {
                retrieved: false,
                stdout: String::new(),
                stderr: String::new(),
            }
        };

        cleanup_archives(&[input.local(), output.local()]);
        Ok(report)
    }
}

fn unpack_result(
    task: &TaskEnvelope,
    work_dir: &Path,
    archive: &Path,
) -> ClientResult<SubmissionReport> {
    handin_archive::decompress(
        work_dir,
        archive,
        &[STDOUT_MEMBER.to_string(), STDERR_MEMBER.to_string()],
    )?;
    let stdout = read_member(work_dir, STDOUT_MEMBER)?;
    let stderr = read_member(work_dir, STDERR_MEMBER)?;

    if task.capture_perf {
        let perf_dir = work_dir.join(task.workspace.id());
        handin_archive::decompress(&perf_dir, archive, &[])?;
        info!(target_dir = %perf_dir.display(), "extracted full result archive");
    }

    Ok(SubmissionReport {
        retrieved: true,
        stdout,
        stderr,
    })
}

fn read_member(work_dir: &Path, member: &str) -> ClientResult<String> {
    let path = work_dir.join(member);
    std::fs::read_to_string(&path).map_err(|source| ClientError::io("read_member", path, source))
}

/// Dependency set of a task: shell tokens that name existing files or
/// folders under the submission root (the optimistic interpretation of
/// a command line) plus the expanded manifest, all relative to the
/// root.
fn dependencies(task: &TaskEnvelope, root: &Path) -> ClientResult<Vec<PathBuf>> {
    let mut members = Vec::new();
    for token in &task.command.shell {
        let anchored = join(root, Path::new(token));
        let Some(raw) = anchored.to_str() else {
            continue;
        };
        let resource = ResourcePath::classify(raw);
        if !resource.exists() {
            continue;
        }
        let member = relative_to(root, resource.path());
        // The root itself and anything above it cannot travel in the
        // archive.
        if member.starts_with("..") || member == Path::new(".") {
            continue;
        }
        members.push(member);
    }
    members.extend(task.command.resolve_manifest(root)?);
    members.sort();
    members.dedup();
    Ok(members)
}

fn cleanup_archives(archives: &[&Path]) {
    for archive in archives {
        if let Err(err) = std::fs::remove_file(archive)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %archive.display(), error = %err, "failed to remove local archive");
        }
    }
}
