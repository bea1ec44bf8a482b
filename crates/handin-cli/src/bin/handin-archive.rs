//! Pack files and folders into a tar archive.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use handin_cli::{CliError, CliResult, init_logging};
use handin_core::{join, relative_to};

#[derive(Debug, Parser)]
#[command(name = "handin-archive", about = "Packs paths into a tar archive")]
struct Cli {
    /// Files or folders to pack, resolved against the current directory.
    #[arg(long, num_args = 1.., required = true)]
    paths: Vec<PathBuf>,
    /// Archive to create (must end in .tar).
    #[arg(long)]
    target: PathBuf,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {}", err.display_message());
        process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let root = std::env::current_dir()
        .map_err(|err| CliError::failure(anyhow::anyhow!("cannot resolve working directory: {err}")))?;
    let members: Vec<PathBuf> = cli
        .paths
        .iter()
        .map(|path| relative_to(&root, &join(&root, path)))
        .collect();
    let archive = handin_archive::compress(&root, &cli.target, &members)
        .map_err(CliError::failure)?;
    println!("created {}", archive.display());
    Ok(())
}
