//! Package the current workspace, publish it as a task, and report the
//! result.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use handin_cli::{BackendArgs, CliError, CliResult, ConfigSourceArgs, init_logging, parse_core_count};
use handin_client::Issuer;
use handin_core::{CommandSpec, Envelope, TaskEnvelope, WorkspaceDescriptor};
use handin_store::TransferClient;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "handin-submit", about = "Runs your program on the course backend")]
struct Cli {
    #[command(flatten)]
    config: ConfigSourceArgs,
    #[command(flatten)]
    backend: BackendArgs,
    /// Command to run (executable with arguments).
    #[arg(long)]
    cmd: String,
    /// Manifest file holding dependency glob patterns.
    #[arg(long, default_value = "deps.aws")]
    deps: PathBuf,
    /// Folder where archives are staged.
    #[arg(long)]
    workfolder: Option<PathBuf>,
    /// Task timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,
    /// Keep the full result archive for performance inspection.
    #[arg(long)]
    perf: bool,
    /// Number of cores to request.
    #[arg(long, value_parser = parse_core_count, default_value_t = 1)]
    core: u8,
    /// Prefix for job folders in the store.
    #[arg(long, default_value = "submission")]
    prefix: String,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            process::exit(err.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<i32> {
    let config = cli.config.load().await?;
    let root = std::env::current_dir()
        .map_err(|err| CliError::failure(anyhow::anyhow!("cannot resolve working directory: {err}")))?;
    let workfolder = cli
        .workfolder
        .unwrap_or_else(|| std::env::temp_dir().join("std-submissions"));

    let workspace = WorkspaceDescriptor::new(&cli.prefix);
    info!(workspace = workspace.id(), "submitting workspace");

    let task = TaskEnvelope {
        command: CommandSpec::new(&cli.cmd, cli.timeout, cli.core, cli.deps),
        workspace,
        work_dir: workfolder.display().to_string(),
        capture_perf: cli.perf,
    };

    let (store, channel) = cli.backend.connect();
    let issuer = Issuer::new(config, TransferClient::new(store, "submit"), channel);

    let report = issuer
        .issue(&Envelope::Task(task), &root)
        .await
        .map_err(CliError::failure)?
        .ok_or_else(|| CliError::failure(anyhow::anyhow!("task submission produced no report")))?;

    print!("{}", report.framed());
    if report.retrieved {
        Ok(0)
    } else {
        eprintln!("result did not arrive before the deadline");
        Ok(1)
    }
}
