//! Read-only bundle of the resources a run needs.
//!
//! A [`ResourceContext`] is loaded once, before any token is processed, and
//! borrowed immutably by every component afterwards.

pub mod dictionary;
pub(crate) mod image;
pub mod lemma_index;
pub mod overrides;
pub mod stems;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use hashbrown::HashMap;

use crate::common::Language;
use crate::errors::{Result, VokabelError};
use crate::resources::image::RawResources;

pub use crate::resources::dictionary::{Dictionary, DictionaryEntry};
pub use crate::resources::image::IMAGE_MAGIC;
pub use crate::resources::lemma_index::{IndexMatch, LemmaIndex, LemmaIndexEntry};
pub use crate::resources::overrides::{OverrideTable, RawOverride};
pub use crate::resources::stems::{Stem, StemLexicon, StemMatch};

/// Locations of the text resources.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourcePaths {
    /// Lemma index. Required.
    pub lemma_index: PathBuf,

    /// Override rules. If given, the file must be readable.
    pub overrides: Option<PathBuf>,

    /// Dictionaries per language. Missing files only produce a warning.
    pub dictionaries: Vec<(Language, PathBuf)>,
}

impl ResourcePaths {
    /// Creates paths with only the lemma index set.
    pub fn new<P>(lemma_index: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            lemma_index: lemma_index.into(),
            ..Self::default()
        }
    }

    pub fn overrides<P>(mut self, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.overrides = Some(path.into());
        self
    }

    pub fn dictionary<P>(mut self, language: Language, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.dictionaries.push((language, path.into()));
        self
    }
}

/// Lemma index, overrides, dictionaries and the derived stem lexicon.
pub struct ResourceContext {
    index: LemmaIndex,
    overrides: OverrideTable,
    dictionaries: HashMap<Language, Dictionary>,
    stems: StemLexicon,
}

impl ResourceContext {
    /// Starts building a context from already parsed resources.
    pub fn builder(index: LemmaIndex) -> ResourceContextBuilder {
        ResourceContextBuilder {
            index,
            overrides: OverrideTable::default(),
            dictionaries: HashMap::new(),
        }
    }

    /// Loads all resources from text files.
    ///
    /// # Errors
    ///
    /// [`VokabelError::ResourceLoad`] is returned when the lemma index or a
    /// given override file cannot be read. A malformed index row is an
    /// [`VokabelError::InvalidFormat`]. Missing dictionaries are not errors.
    pub fn load(paths: &ResourcePaths) -> Result<Self> {
        let index = LemmaIndex::from_reader(open("lemma index", &paths.lemma_index)?)?;
        log::info!(
            "loaded lemma index with {} entries from {}",
            index.len(),
            paths.lemma_index.display()
        );
        let mut builder = Self::builder(index);

        if let Some(path) = &paths.overrides {
            builder = builder.overrides(OverrideTable::from_reader(open("lemma override file", path)?)?);
        }

        for (language, path) in &paths.dictionaries {
            match File::open(path) {
                Ok(file) => {
                    let dict = Dictionary::from_reader(BufReader::new(file))?;
                    log::info!(
                        "loaded {} dictionary with {} headwords from {}",
                        language,
                        dict.len(),
                        path.display()
                    );
                    builder = builder.dictionary(*language, dict);
                }
                Err(e) => {
                    log::warn!(
                        "{} dictionary not loaded from {}: {e}; glosses will be empty",
                        language,
                        path.display()
                    );
                }
            }
        }
        builder.build()
    }

    /// Reads a context from a resource image.
    ///
    /// # Errors
    ///
    /// [`VokabelError`] is returned when the magic bytes mismatch or the
    /// archive fails validation.
    pub fn from_image<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let (index, overrides, dictionaries) = RawResources::read(rdr)?.into_parts()?;
        let mut builder = Self::builder(index).overrides(overrides);
        for (language, dict) in dictionaries {
            builder = builder.dictionary(language, dict);
        }
        builder.build()
    }

    /// Reads a context from a resource image file.
    pub fn from_image_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_image(open("resource image", path.as_ref())?)
    }

    /// Writes the context as a resource image.
    ///
    /// # Errors
    ///
    /// [`VokabelError`] is returned when writing or serialization fails.
    pub fn write_image<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        let mut dictionaries: Vec<_> = self.dictionaries.iter().map(|(l, d)| (*l, d)).collect();
        dictionaries.sort_by_key(|(l, _)| *l);
        let raw = RawResources::new(&self.index, &self.overrides, dictionaries);
        let mut wtr = BufWriter::new(wtr);
        raw.write(&mut wtr)?;
        wtr.flush()?;
        Ok(())
    }

    #[inline(always)]
    pub fn index(&self) -> &LemmaIndex {
        &self.index
    }

    #[inline(always)]
    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Gets the dictionary of `language`, if one was loaded.
    #[inline(always)]
    pub fn dictionary(&self, language: Language) -> Option<&Dictionary> {
        self.dictionaries.get(&language)
    }

    #[inline(always)]
    pub fn stems(&self) -> &StemLexicon {
        &self.stems
    }
}

/// Builder of [`ResourceContext`].
pub struct ResourceContextBuilder {
    index: LemmaIndex,
    overrides: OverrideTable,
    dictionaries: HashMap<Language, Dictionary>,
}

impl ResourceContextBuilder {
    pub fn overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets the dictionary of `language`, replacing any earlier one.
    pub fn dictionary(mut self, language: Language, dictionary: Dictionary) -> Self {
        self.dictionaries.insert(language, dictionary);
        self
    }

    /// Builds the context and its stem lexicon.
    ///
    /// # Errors
    ///
    /// [`VokabelError`] is returned when the stem lexicon cannot be built.
    pub fn build(self) -> Result<ResourceContext> {
        let stems = StemLexicon::build(&self.index, self.dictionaries.get(&Language::De))?;
        Ok(ResourceContext {
            index: self.index,
            overrides: self.overrides,
            dictionaries: self.dictionaries,
            stems,
        })
    }
}

fn open(resource: &'static str, path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| VokabelError::resource_load(resource, path, e))
}
