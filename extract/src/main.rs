//! Extracts a vocabulary list from a text.
//!
//! The text is read from `--text`, `--text1-file`, the config file, the
//! `VOKABEL_INPUT_TEXT` environment variable or piped stdin. Results are
//! written to stdout or `--output-file`, diagnostics to stderr.

mod config_file;
mod render;

use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use vokabel::{
    Extraction, ExtractionType, Language, OrderMode, PartSingularization, Pipeline,
    PipelineConfig, PosFilter, ResourceContext, ResourcePaths, SplitMode,
};
use vokabel::errors::VokabelError;

use crate::config_file::ConfigFile;
use crate::render::{Format, ParallelTexts, Renderer};

const INPUT_ENV: &str = "VOKABEL_INPUT_TEXT";

/// Number of parallel texts shown in triple mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Mode {
    #[default]
    Single,
    Triple,
}

impl std::str::FromStr for Mode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "triple" => Ok(Self::Triple),
            _ => Err("Could not parse a mode"),
        }
    }
}

#[derive(Parser, Debug)]
#[clap(name = "extract", version, about = "Extracts lemmas and compound components from a text")]
struct Args {
    /// What to extract. Choices are word and sentence.
    #[clap(long = "type", default_value = "word")]
    extraction_type: ExtractionType,

    /// Language of the text. Choices are de and en.
    #[clap(short = 'l', long, default_value = "de")]
    language: Language,

    /// Text to process.
    #[clap(short = 't', long, conflicts_with = "text1_file")]
    text: Option<String>,

    /// File containing the text to process.
    #[clap(long)]
    text1_file: Option<PathBuf>,

    /// Line-aligned parallel text shown in triple mode.
    #[clap(long)]
    text2_file: Option<PathBuf>,

    /// Second line-aligned parallel text shown in triple mode.
    #[clap(long)]
    text3_file: Option<PathBuf>,

    /// Lemma index (CSV: word, POS, lemma, rank).
    #[clap(long)]
    lemma_index_file: Option<PathBuf>,

    /// Lemma override rules (TSV: lemma, word, target, context).
    #[clap(long)]
    lemma_override_file: Option<PathBuf>,

    /// German dictionary (TSV: headword, gloss).
    #[clap(long)]
    de_dictionary_file: Option<PathBuf>,

    /// Compiled resource image. Replaces the text resources.
    #[clap(long, conflicts_with_all = ["lemma_index_file", "lemma_override_file", "de_dictionary_file"])]
    resource_image: Option<PathBuf>,

    /// Number of context sentences on each side.
    #[clap(long, default_value = "0")]
    sentence_context_size: usize,

    /// Output format. Choices are list, tsv, html, and context.
    #[clap(short = 'O', long, default_value = "list")]
    stdout_format: Format,

    /// Ordering of the vocabulary. Choices are first-seen, frequency, and alphabetical.
    #[clap(long, default_value = "first-seen")]
    order: OrderMode,

    /// Removes genitive endings from nouns missing in the lemma index.
    #[clap(long)]
    de_fix_genitive: bool,

    /// Splits German compounds.
    #[clap(long)]
    de_gcs: bool,

    /// POS tags eligible for splitting, e.g. "NOUN ADJ", "!VERB" or "ALL".
    #[clap(long, num_args = 1..)]
    de_gcs_pos_tags: Vec<String>,

    /// How components are emitted. Choices are combined and separate.
    #[clap(long, default_value = "separate")]
    de_gcs_split_mode: SplitMode,

    /// Keeps the compound itself next to its components.
    #[clap(long)]
    de_gcs_preserve_compound_word: bool,

    /// Drops unmatched fractions instead of merging them into a neighbour.
    #[clap(long)]
    de_gcs_skip_merge_fractions: bool,

    /// Keeps unmatched fractions as masked parts, e.g. "__xy__".
    #[clap(long)]
    de_gcs_mask_unknown_parts: bool,

    /// Which compound parts are reduced to their lemma. Choices are only-nouns, all, and none.
    #[clap(long, default_value = "only-nouns")]
    de_gcs_part_singularization: PartSingularization,

    /// Lists compound parts instead of the compound in sentence word lists.
    #[clap(long)]
    de_gcs_add_parts_to_wordlist: bool,

    /// Capitalizes the first letter of every noun lemma.
    #[clap(long)]
    de_force_noun_capitalization: bool,

    /// Capitalizes the first letter of every proper noun lemma.
    #[clap(long)]
    force_proper_noun_capitalization: bool,

    /// Writes the output to this file instead of stdout.
    #[clap(short = 'o', long)]
    output_file: Option<PathBuf>,

    /// Output mode. Choices are single and triple.
    #[clap(short = 'm', long, default_value = "single")]
    mode: Mode,

    /// TOML configuration file.
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,
}

/// Errors of the extract command.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Vokabel(#[from] VokabelError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to read the configuration file '{}': {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("failed to parse the configuration file '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to read the input file '{}': {source}", .path.display())]
    InputRead { path: PathBuf, source: io::Error },

    #[error("failed to write the output file '{}': {source}", .path.display())]
    OutputWrite { path: PathBuf, source: io::Error },

    #[error("no {0} given on the command line or in the configuration file")]
    MissingSetting(&'static str),

    #[error("no input text; use --text, --text1-file, {INPUT_ENV} or pipe the text to stdin")]
    NoInput,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ExtractError> {
    let config_file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let (ctx, config) = prepare(&args, &config_file)?;
    let text = read_input(&args, &config_file)?;

    let parallel = match args.mode {
        Mode::Single => ParallelTexts::default(),
        Mode::Triple => {
            let text2 = args.text2_file.as_ref().or(config_file.input.text2.as_ref());
            let text3 = args.text3_file.as_ref().or(config_file.input.text3.as_ref());
            let mut texts = vec![];
            for path in [text2, text3].into_iter().flatten() {
                texts.push(read_file(path)?);
            }
            if texts.is_empty() {
                log::warn!("triple mode without --text2-file or --text3-file");
            }
            ParallelTexts::new(texts)
        }
    };

    let pipeline = Pipeline::new(&ctx, config);
    let extraction = pipeline.run(&text);

    let renderer = Renderer::new(args.stdout_format, parallel);
    match &args.output_file {
        Some(path) => {
            let output_error = |source| ExtractError::OutputWrite {
                path: path.clone(),
                source,
            };
            let file = File::create(path).map_err(output_error)?;
            write_extraction(&renderer, BufWriter::new(file), &extraction).map_err(output_error)?;
            log::info!("wrote {}", path.display());
        }
        None => write_extraction(&renderer, BufWriter::new(io::stdout().lock()), &extraction)?,
    }

    Ok(())
}

/// Validates the flags, then loads the resources.
fn prepare(
    args: &Args,
    config_file: &ConfigFile,
) -> Result<(ResourceContext, PipelineConfig), ExtractError> {
    let config = pipeline_config(args)?;
    let ctx = load_resources(args, config_file)?;
    Ok((ctx, config))
}

fn write_extraction<W>(renderer: &Renderer, mut wtr: W, extraction: &Extraction) -> io::Result<()>
where
    W: Write,
{
    match extraction {
        Extraction::Words(entries) => {
            log::info!("extracted {} lemmas", entries.len());
            renderer.render_words(&mut wtr, entries)?;
        }
        Extraction::Sentences(records) => {
            log::info!("extracted {} sentences", records.len());
            renderer.render_sentences(&mut wtr, records)?;
        }
    }
    wtr.flush()
}

fn pipeline_config(args: &Args) -> Result<PipelineConfig, ExtractError> {
    let mut builder = PipelineConfig::builder(args.language)
        .extraction_type(args.extraction_type)
        .context_size(args.sentence_context_size)
        .order(args.order)
        .fix_genitive(args.de_fix_genitive)
        .gcs(args.de_gcs)
        .split_mode(args.de_gcs_split_mode)
        .preserve_compound(args.de_gcs_preserve_compound_word)
        .skip_merge_fractions(args.de_gcs_skip_merge_fractions)
        .mask_unknown_parts(args.de_gcs_mask_unknown_parts)
        .part_singularization(args.de_gcs_part_singularization)
        .add_parts_to_wordlist(args.de_gcs_add_parts_to_wordlist)
        .force_noun_capitalization(args.de_force_noun_capitalization)
        .force_proper_noun_capitalization(args.force_proper_noun_capitalization);
    if !args.de_gcs_pos_tags.is_empty() {
        builder = builder.pos_filter(PosFilter::from_args(&args.de_gcs_pos_tags)?);
    }
    Ok(builder.build()?)
}

/// Loads the resources. Command-line paths win over the configuration file.
fn load_resources(args: &Args, config_file: &ConfigFile) -> Result<ResourceContext, ExtractError> {
    if let Some(path) = &args.resource_image {
        log::info!("loading the resource image {}", path.display());
        return Ok(ResourceContext::from_image_path(path)?);
    }

    let configured = config_file.resources(args.language);
    let lemma_index = args
        .lemma_index_file
        .clone()
        .or_else(|| configured.and_then(|r| r.lemma_index.clone()))
        .ok_or(ExtractError::MissingSetting("lemma index file"))?;
    let mut paths = ResourcePaths::new(lemma_index);

    if let Some(overrides) = args
        .lemma_override_file
        .clone()
        .or_else(|| configured.and_then(|r| r.overrides.clone()))
    {
        paths = paths.overrides(overrides);
    }

    let de_dictionary = args.de_dictionary_file.clone().or_else(|| {
        config_file
            .resources(Language::De)
            .and_then(|r| r.dictionary.clone())
    });
    if let Some(path) = de_dictionary {
        paths = paths.dictionary(Language::De, path);
    }
    if let Some(path) = config_file
        .resources(Language::En)
        .and_then(|r| r.dictionary.clone())
    {
        paths = paths.dictionary(Language::En, path);
    }

    Ok(ResourceContext::load(&paths)?)
}

fn read_input(args: &Args, config_file: &ConfigFile) -> Result<String, ExtractError> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = args.text1_file.as_ref().or(config_file.input.text1.as_ref()) {
        return read_file(path);
    }
    if let Ok(text) = std::env::var(INPUT_ENV) {
        if !text.is_empty() {
            return Ok(text);
        }
    }
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut text = String::new();
        stdin.lock().read_to_string(&mut text)?;
        return Ok(text);
    }
    Err(ExtractError::NoInput)
}

fn read_file(path: &Path) -> Result<String, ExtractError> {
    fs::read_to_string(path).map_err(|source| ExtractError::InputRead {
        path: path.to_path_buf(),
        source,
    })
}
