//! # vokabel
//!
//! Lemma resolution and German compound splitting for vocabulary extraction.
//!
//! A text is tokenized, every word is resolved to its lemma through user
//! overrides and a lemma index, German genitive endings are optionally
//! removed, German compounds are optionally split into their components, and
//! the resulting lemmas are annotated with dictionary glosses and
//! deduplicated into a vocabulary list.
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use vokabel::{
//!     Dictionary, Language, LemmaIndex, Pipeline, PipelineConfig, ResourceContext, SplitMode,
//! };
//!
//! let index = LemmaIndex::from_reader(
//!     "Haus,NOUN,Haus,10\nTür,NOUN,Tür,20\nklemmt,VERB,klemmen,30\n".as_bytes(),
//! )?;
//! let dict = Dictionary::from_reader("Haus\thouse\nTür\tdoor\n".as_bytes())?;
//! let ctx = ResourceContext::builder(index)
//!     .dictionary(Language::De, dict)
//!     .build()?;
//!
//! let config = PipelineConfig::builder(Language::De)
//!     .gcs(true)
//!     .split_mode(SplitMode::Separate)
//!     .build()?;
//! let pipeline = Pipeline::new(&ctx, config);
//!
//! let entries = pipeline.extract_words("Die Haustür klemmt.");
//! let lemmas: Vec<_> = entries.iter().map(|e| e.lemma.as_str()).collect();
//! assert_eq!(lemmas, ["Die", "Haus", "Tür", "klemmen"]);
//! assert_eq!(entries[1].gloss.as_deref(), Some("house"));
//! # Ok(())
//! # }
//! ```

pub mod annotator;
pub mod assembler;
pub mod common;
pub mod config;
pub mod errors;
pub mod genitive;
pub mod pipeline;
pub mod resolver;
pub mod resources;
pub mod sentence;
pub mod splitter;
pub mod token;
pub mod tokenizer;
mod utils;


// Re-exports
pub use annotator::DictionaryAnnotator;
pub use assembler::{Position, SentenceRecord, VocabularyAssembler, VocabularyEntry};
pub use common::{Language, PosTag};
pub use config::{
    Aggregation, ExtractionType, GcsOptions, OrderMode, PartSingularization, PipelineConfig,
    PosFilter, SplitMode, SplitPolicy,
};
pub use genitive::GenitiveFixer;
pub use pipeline::{Extraction, Pipeline};
pub use resolver::{Confidence, LemmaQuery, LemmaResolver, LemmaStrategy, Resolution};
pub use resources::{Dictionary, LemmaIndex, OverrideTable, ResourceContext, ResourcePaths};
pub use splitter::{CompoundSplitResult, CompoundSplitter};
pub use tokenizer::{Document, Tokenizer};

/// Version of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
