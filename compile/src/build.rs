//! Builds a resource image from the text resources.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use vokabel::errors::VokabelError;
use vokabel::{Language, ResourceContext, ResourcePaths};

#[derive(Parser, Debug)]
#[clap(name = "build", about = "Compiles the text resources into a resource image.")]
pub struct Args {
    /// Lemma index (CSV: word, POS, lemma, rank).
    #[clap(short = 'i', long)]
    lemma_index_in: PathBuf,

    /// Lemma override rules (TSV: lemma, word, target, context).
    #[clap(short = 'r', long)]
    overrides_in: Option<PathBuf>,

    /// Dictionaries as `language=path`, e.g. `de=glosses.tsv`. Can be repeated.
    #[clap(short = 'd', long = "dictionary-in", value_parser = parse_dictionary)]
    dictionaries_in: Vec<(Language, PathBuf)>,

    /// File to which the resource image is written.
    #[clap(short = 'o', long)]
    image_out: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Resource compilation failed: {0}")]
    Vokabel(#[from] VokabelError),
}

fn parse_dictionary(arg: &str) -> Result<(Language, PathBuf), String> {
    let (lang, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected language=path, got {arg:?}"))?;
    let lang = lang.parse::<Language>().map_err(|e| e.to_string())?;
    if path.is_empty() {
        return Err(format!("empty path in {arg:?}"));
    }
    Ok((lang, PathBuf::from(path)))
}

pub fn run(args: Args) -> Result<(), BuildError> {
    let mut paths = ResourcePaths::new(args.lemma_index_in);
    if let Some(path) = args.overrides_in {
        paths = paths.overrides(path);
    }
    for (language, path) in args.dictionaries_in {
        paths = paths.dictionary(language, path);
    }

    log::info!("Compiling the resources...");
    let ctx = ResourceContext::load(&paths)?;

    log::info!("Writing the resource image...");
    ctx.write_image(File::create(&args.image_out)?)?;
    log::info!(
        "Wrote {} index entries, {} override rules and {} stems to {}",
        ctx.index().len(),
        ctx.overrides().len(),
        ctx.stems().len(),
        args.image_out.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dictionary() {
        assert_eq!(
            Ok((Language::De, PathBuf::from("de.tsv"))),
            parse_dictionary("de=de.tsv")
        );
        assert!(parse_dictionary("de.tsv").is_err());
        assert!(parse_dictionary("fr=fr.tsv").is_err());
        assert!(parse_dictionary("en=").is_err());
    }

    #[test]
    fn test_build_image() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("index.csv");
        let dict = dir.path().join("de.tsv");
        let image = dir.path().join("resources.img");
        std::fs::write(&index, "Haus,NOUN,Haus,1\nTür,NOUN,Tür,2\n").unwrap();
        std::fs::write(&dict, "Haus\thouse\n").unwrap();

        run(Args {
            lemma_index_in: index,
            overrides_in: None,
            dictionaries_in: vec![(Language::De, dict)],
            image_out: image.clone(),
        })
        .unwrap();

        let ctx = ResourceContext::from_image_path(&image).unwrap();
        assert_eq!(2, ctx.index().len());
        assert!(ctx.dictionary(Language::De).unwrap().contains("Haus"));
    }
}
