//! Shared plumbing for the handin binaries.
//!
//! Layout:
//! - `args.rs`: config-source group and value parsers
//! - `backend.rs`: local store/spool wiring
//! - `error.rs`: exit-code-aware error type
//! - `logging.rs`: tracing subscriber installation
//! - `src/bin/`: one thin entrypoint per tool

mod args;
mod backend;
mod error;
mod logging;

pub use args::{ConfigSourceArgs, parse_core_count};
pub use backend::BackendArgs;
pub use error::{CliError, CliResult};
pub use logging::init_logging;
