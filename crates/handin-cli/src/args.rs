//! Shared argument blocks and value parsers.

use std::path::PathBuf;

use clap::Args;
use handin_config::{ConfigError, SubmitConfig};

use crate::error::{CliError, CliResult};

const MIN_CORES: u8 = 1;
const MAX_CORES: u8 = 8;

/// Where the endpoint configuration comes from. Exactly one source
/// must be given.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ConfigSourceArgs {
    /// URL serving the configuration document.
    #[arg(long)]
    pub configurl: Option<String>,
    /// Local configuration file.
    #[arg(long)]
    pub configfile: Option<PathBuf>,
}

impl ConfigSourceArgs {
    /// Load the configuration from whichever source was given.
    ///
    /// # Errors
    ///
    /// Maps bad sources to validation errors and transport or parse
    /// problems to failures.
    pub async fn load(&self) -> CliResult<SubmitConfig> {
        match (&self.configurl, &self.configfile) {
            (Some(url), None) => SubmitConfig::load_url(url).await.map_err(map_config_error),
            (None, Some(path)) => SubmitConfig::load_file(path).map_err(map_config_error),
            _ => Err(CliError::validation(
                "exactly one of --configurl and --configfile is required",
            )),
        }
    }
}

fn map_config_error(err: ConfigError) -> CliError {
    match err {
        ConfigError::NotFound { path } => {
            CliError::validation(format!("configuration file {} not found", path.display()))
        }
        ConfigError::InvalidSource { source_text, reason } => {
            CliError::validation(format!("configuration url '{source_text}' rejected: {reason}"))
        }
        other => CliError::failure(other),
    }
}

/// Clap value parser for `--core`: an integer between 1 and 8.
///
/// # Errors
///
/// Returns a message suitable for clap's error rendering.
pub fn parse_core_count(raw: &str) -> Result<u8, String> {
    let value: u8 = raw
        .parse()
        .map_err(|_| "must be an integer".to_string())?;
    if (MIN_CORES..=MAX_CORES).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "must be an integer between {MIN_CORES} and {MAX_CORES}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Probe {
        #[command(flatten)]
        config: ConfigSourceArgs,
        #[arg(long, value_parser = parse_core_count, default_value_t = 1)]
        core: u8,
    }

    #[test]
    fn config_sources_are_mutually_exclusive() {
        assert!(Probe::try_parse_from(["probe"]).is_err());
        assert!(
            Probe::try_parse_from([
                "probe",
                "--configurl",
                "https://example.edu/config.aws",
                "--configfile",
                "config.aws",
            ])
            .is_err()
        );
        let parsed =
            Probe::try_parse_from(["probe", "--configfile", "config.aws"]).expect("file source");
        assert!(parsed.config.configfile.is_some());
    }

    #[test]
    fn core_count_is_range_checked() {
        assert!(parse_core_count("0").is_err());
        assert!(parse_core_count("9").is_err());
        assert!(parse_core_count("four").is_err());
        assert_eq!(parse_core_count("1"), Ok(1));
        assert_eq!(parse_core_count("8"), Ok(8));

        let parsed = Probe::try_parse_from(["probe", "--configfile", "c", "--core", "4"])
            .expect("valid core");
        assert_eq!(parsed.core, 4);
        assert!(Probe::try_parse_from(["probe", "--configfile", "c", "--core", "12"]).is_err());
    }
}
