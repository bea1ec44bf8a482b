//! Unpack a tar archive, optionally selecting members.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use handin_cli::{CliError, CliResult, init_logging};
use handin_core::ResourcePath;

#[derive(Debug, Parser)]
#[command(name = "handin-unarchive", about = "Unpacks a tar archive")]
struct Cli {
    /// Archive to unpack.
    #[arg(long)]
    tarfile: PathBuf,
    /// Directory to unpack into.
    #[arg(long)]
    target: String,
    /// Extract only these members; everything when omitted.
    #[arg(long, num_args = 1..)]
    files: Vec<String>,
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
    let target = ResourcePath::classify(&cli.target);
    if target.exists() && !target.is_folder() {
        return Err(CliError::validation(format!(
            "target {} is an existing file",
            target.path().display()
        )));
    }
    let target = handin_archive::decompress(target.path(), &cli.tarfile, &cli.files)
        .map_err(CliError::failure)?;
    println!("unpacked into {}", target.display());
    Ok(())
}
