//! Compiles and inspects resource images.
//!
//! A resource image holds the parsed lemma index, override rules and
//! dictionaries, so `extract --resource-image` skips the text parsing.

mod build;
mod inspect;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::{build::BuildError, inspect::InspectError};

#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Builds a resource image from the text resources.
    Build(build::Args),

    /// Prints the number of entries in a resource image.
    Inspect(inspect::Args),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    BuildError(#[from] BuildError),

    #[error(transparent)]
    InspectError(#[from] InspectError),
}

fn main() -> Result<(), CompileError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Inspect(args) => Ok(inspect::run(args)?),
    }
}
