//! End-to-end submission scenarios against in-memory backends.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use handin_client::Issuer;
use handin_config::SubmitConfig;
use handin_core::{CommandSpec, Envelope, RegistrationEnvelope, TaskEnvelope, WorkspaceDescriptor};
use handin_queue::MemoryChannel;
use handin_store::{MemoryObjectStore, RetryPolicy, TransferClient};
use tempfile::TempDir;

fn test_config() -> SubmitConfig {
    SubmitConfig {
        region: "local".to_string(),
        bucket: "course".to_string(),
        task_queue: "tasks".to_string(),
        reg_queue: "registrations".to_string(),
    }
}

fn quick_client(store: MemoryObjectStore) -> TransferClient<MemoryObjectStore> {
    TransferClient::new(store, "test").with_policy(RetryPolicy {
        backoff: Duration::from_millis(5),
        retry_forbidden: true,
    })
}

/// Build a result archive holding stdout/stderr members and place it
/// at the workspace output key, the way the worker fleet would.
fn stage_result(
    store: &MemoryObjectStore,
    workspace: &WorkspaceDescriptor,
    stdout: &str,
    stderr: &str,
) -> Result<(), Box<dyn Error>> {
    let staging = TempDir::new()?;
    std::fs::write(staging.path().join("stdout"), stdout)?;
    std::fs::write(staging.path().join("stderr"), stderr)?;
    let tar_path = staging.path().join("result.tar");
    handin_archive::compress(
        staging.path(),
        &tar_path,
        &[PathBuf::from("stdout"), PathBuf::from("stderr")],
    )?;
    store.insert("course", &workspace.output_key(), std::fs::read(&tar_path)?);
    Ok(())
}

#[tokio::test]
async fn task_submission_round_trips() -> Result<(), Box<dyn Error>> {
    let temp = TempDir::new()?;
    let root = temp.path().join("workspace");
    std::fs::create_dir_all(root.join("project"))?;
    std::fs::write(root.join("project/solution.py"), "print('hi')\n")?;
    std::fs::write(root.join("run.sh"), "#!/bin/sh\npython3 project/solution.py\n")?;
    std::fs::write(root.join("deps.aws"), "project/**\n")?;

    let workspace = WorkspaceDescriptor::new("submission");
    let task = TaskEnvelope {
        command: CommandSpec::new("./run.sh", 30, 1, "deps.aws"),
        workspace: workspace.clone(),
        work_dir: temp.path().join("work").display().to_string(),
        capture_perf: false,
    };

    let store = MemoryObjectStore::new();
    stage_result(&store, &workspace, "hi\n", "")?;

    let channel = MemoryChannel::new();
    let issuer = Issuer::new(test_config(), quick_client(store.clone()), channel.clone());

    let report = issuer
        .issue(&Envelope::Task(task), &root)
        .await?
        .expect("task envelopes yield a report");

    assert!(report.retrieved);
    assert_eq!(report.stdout, "hi\n");
    assert_eq!(report.stderr, "");

    // The input archive landed at its derived key.
    assert!(store.object("course", &workspace.input_key()).is_some());

    // Exactly one task envelope went out, carrying the workspace id.
    let published = channel.published("tasks");
    assert_eq!(published.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&published[0])?;
    assert_eq!(value["type"], "task");
    assert_eq!(value["workspace"]["id"], workspace.id());

    // Result members land in the work folder, not the submission root.
    let work = temp.path().join("work");
    assert_eq!(std::fs::read_to_string(work.join("stdout"))?, "hi\n");
    assert!(work.join("stderr").exists());
    assert!(!root.join("stdout").exists());

    // Local archives are cleaned up after reporting.
    assert!(!work.join(workspace.input_name()).exists());
    assert!(!work.join(workspace.output_name()).exists());
    Ok(())
}

#[tokio::test]
async fn missing_result_soft_fails_with_empty_report() -> Result<(), Box<dyn Error>> {
    let temp = TempDir::new()?;
    let root = temp.path().join("workspace");
    std::fs::create_dir_all(&root)?;
    std::fs::write(root.join("run.sh"), "#!/bin/sh\n")?;

    let task = TaskEnvelope {
        command: CommandSpec::new("./run.sh", 0, 1, "deps.aws"),
        workspace: WorkspaceDescriptor::new("submission"),
        work_dir: temp.path().join("work").display().to_string(),
        capture_perf: false,
    };

    let store = MemoryObjectStore::new();
    let channel = MemoryChannel::new();
    let issuer = Issuer::new(test_config(), quick_client(store), channel);

    let report = issuer
        .issue(&Envelope::Task(task), &root)
        .await?
        .expect("task envelopes yield a report");
    assert!(!report.retrieved);
    assert!(report.stdout.is_empty());
    assert!(report.stderr.is_empty());
    Ok(())
}

#[tokio::test]
async fn capture_perf_extracts_the_full_archive() -> Result<(), Box<dyn Error>> {
    let temp = TempDir::new()?;
    let root = temp.path().join("workspace");
    std::fs::create_dir_all(&root)?;
    std::fs::write(root.join("run.sh"), "#!/bin/sh\n")?;

    let workspace = WorkspaceDescriptor::new("submission");
    let task = TaskEnvelope {
        command: CommandSpec::new("./run.sh", 30, 1, "deps.aws"),
        workspace: workspace.clone(),
        work_dir: temp.path().join("work").display().to_string(),
        capture_perf: true,
    };

    let store = MemoryObjectStore::new();
    stage_result(&store, &workspace, "out\n", "err\n")?;

    let issuer = Issuer::new(test_config(), quick_client(store), MemoryChannel::new());
    let report = issuer
        .issue(&Envelope::Task(task), &root)
        .await?
        .expect("task envelopes yield a report");
    assert!(report.retrieved);

    let perf_dir = temp.path().join("work").join(workspace.id());
    assert_eq!(std::fs::read_to_string(perf_dir.join("stdout"))?, "out\n");
    assert_eq!(std::fs::read_to_string(perf_dir.join("stderr"))?, "err\n");
    Ok(())
}

#[tokio::test]
async fn registration_publishes_once_with_no_store_traffic() -> Result<(), Box<dyn Error>> {
    let temp = TempDir::new()?;
    let store = MemoryObjectStore::new();
    let channel = MemoryChannel::new();
    let issuer = Issuer::new(test_config(), quick_client(store.clone()), channel.clone());

    let envelope = Envelope::Registration(RegistrationEnvelope {
        id: "s99".to_string(),
        email: "s99@example.edu".to_string(),
    });
    let report = issuer.issue(&envelope, temp.path()).await?;
    assert!(report.is_none());

    let published = channel.published("registrations");
    assert_eq!(published.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&published[0])?;
    assert_eq!(value["type"], "registration");
    assert_eq!(value["email"], "s99@example.edu");

    assert_eq!(store.traffic(), (0, 0));
    Ok(())
}
