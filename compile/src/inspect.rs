//! Prints a summary of a resource image.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use vokabel::errors::VokabelError;
use vokabel::{Language, ResourceContext};

#[derive(Parser, Debug)]
#[clap(name = "inspect", about = "Prints the contents of a resource image.")]
pub struct Args {
    /// Resource image to inspect.
    #[clap(short = 'i', long)]
    image_in: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read the resource image: {0}")]
    Vokabel(#[from] VokabelError),
}

pub fn run(args: Args) -> Result<(), InspectError> {
    let ctx = ResourceContext::from_image_path(&args.image_in)?;
    summarize(&ctx, io::stdout().lock())
}

fn summarize<W>(ctx: &ResourceContext, mut wtr: W) -> Result<(), InspectError>
where
    W: Write,
{
    writeln!(wtr, "lemma index\t{}", ctx.index().len())?;
    writeln!(wtr, "overrides\t{}", ctx.overrides().len())?;
    writeln!(wtr, "stems\t{}", ctx.stems().len())?;
    for language in [Language::De, Language::En] {
        if let Some(dict) = ctx.dictionary(language) {
            writeln!(wtr, "dictionary {language}\t{}", dict.len())?;
        }
    }
    Ok(())
}
