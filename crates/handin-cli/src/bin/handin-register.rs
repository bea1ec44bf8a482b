//! Register a participant with the course backend.

use std::process;

use clap::Parser;
use handin_cli::{BackendArgs, CliError, CliResult, ConfigSourceArgs, init_logging};
use handin_client::Issuer;
use handin_core::{Envelope, RegistrationEnvelope};
use handin_store::TransferClient;

#[derive(Debug, Parser)]
#[command(name = "handin-register", about = "Registers your id with the course backend")]
struct Cli {
    #[command(flatten)]
    config: ConfigSourceArgs,
    #[command(flatten)]
    backend: BackendArgs,
    /// Participant identifier.
    #[arg(long)]
    id: String,
    /// Contact email for result notifications.
    #[arg(long)]
    email: String,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {}", err.display_message());
        process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = cli.config.load().await?;
    let (store, channel) = cli.backend.connect();
    let issuer = Issuer::new(config, TransferClient::new(store, "register"), channel);

    let envelope = Envelope::Registration(RegistrationEnvelope {
        id: cli.id.clone(),
        email: cli.email,
    });
    let root = std::env::current_dir()
        .map_err(|err| CliError::failure(anyhow::anyhow!("cannot resolve working directory: {err}")))?;
    issuer
        .issue(&envelope, &root)
        .await
        .map_err(CliError::failure)?;

    println!("registration for {} submitted", cli.id);
    Ok(())
}
