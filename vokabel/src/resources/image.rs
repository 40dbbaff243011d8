//! Binary resource image.
//!
//! An image stores the parsed lemma index, override rules and dictionaries as
//! an rkyv archive. The layout is the magic bytes, padding up to the rkyv
//! alignment, then the archive. Compiled regexes and the stem trie are not
//! stored; they are rebuilt when the image is loaded.

use std::io::{Read, Write};

use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::common::{Language, PosTag};
use crate::errors::{Result, VokabelError};
use crate::resources::dictionary::{Dictionary, DictionaryEntry};
use crate::resources::lemma_index::{LemmaIndex, LemmaIndexEntry};
use crate::resources::overrides::{OverrideTable, RawOverride};

/// Magic bytes identifying a resource image.
///
/// The version is that of the image layout, not of the crate.
pub const IMAGE_MAGIC: &[u8] = b"VokabelResources 0.1\n";

const IMAGE_MAGIC_LEN: usize = IMAGE_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (IMAGE_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;

#[derive(Archive, Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct RawIndexEntry {
    surface: String,
    pos: Option<String>,
    lemma: String,
    rank: u32,
}

#[derive(Archive, Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct RawRule {
    result_lemma: String,
    original_word: String,
    target_lemma: String,
    context: Option<String>,
}

#[derive(Archive, Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct RawGloss {
    headword: String,
    gloss: Option<String>,
}

#[derive(Archive, Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct RawDictionary {
    language: String,
    entries: Vec<RawGloss>,
}

/// Archived form of a resource context.
#[derive(Archive, Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct RawResources {
    index: Vec<RawIndexEntry>,
    overrides: Vec<RawRule>,
    dictionaries: Vec<RawDictionary>,
}

impl RawResources {
    pub(crate) fn new<'a, I>(
        index: &LemmaIndex,
        overrides: &OverrideTable,
        dictionaries: I,
    ) -> Self
    where
        I: IntoIterator<Item = (Language, &'a Dictionary)>,
    {
        Self {
            index: index
                .entries()
                .iter()
                .map(|e| RawIndexEntry {
                    surface: e.surface.clone(),
                    pos: e.pos.map(|p| p.as_str().to_string()),
                    lemma: e.lemma.clone(),
                    rank: e.rank,
                })
                .collect(),
            overrides: overrides
                .raw_rules()
                .iter()
                .map(|r| RawRule {
                    result_lemma: r.result_lemma.clone(),
                    original_word: r.original_word.clone(),
                    target_lemma: r.target_lemma.clone(),
                    context: r.context.clone(),
                })
                .collect(),
            dictionaries: dictionaries
                .into_iter()
                .map(|(language, dict)| RawDictionary {
                    language: language.code().to_string(),
                    entries: dict
                        .entries()
                        .iter()
                        .map(|e| RawGloss {
                            headword: e.headword.clone(),
                            gloss: e.gloss.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub(crate) fn into_parts(self) -> Result<(LemmaIndex, OverrideTable, Vec<(Language, Dictionary)>)> {
        let mut entries = Vec::with_capacity(self.index.len());
        for e in self.index {
            let pos = match e.pos {
                Some(p) => Some(p.parse::<PosTag>().map_err(|_| {
                    VokabelError::invalid_format("resource image", format!("unknown POS tag {p:?}"))
                })?),
                None => None,
            };
            entries.push(LemmaIndexEntry {
                surface: e.surface,
                pos,
                lemma: e.lemma,
                rank: e.rank,
            });
        }
        let index = LemmaIndex::from_entries(entries)?;

        let overrides = OverrideTable::from_raw(self.overrides.into_iter().map(|r| RawOverride {
            result_lemma: r.result_lemma,
            original_word: r.original_word,
            target_lemma: r.target_lemma,
            context: r.context,
        }));

        let mut dictionaries = vec![];
        for d in self.dictionaries {
            let language = d.language.parse::<Language>()?;
            let dict = Dictionary::from_entries(d.entries.into_iter().map(|g| DictionaryEntry {
                headword: g.headword,
                gloss: g.gloss,
            }))?;
            dictionaries.push((language, dict));
        }
        Ok((index, overrides, dictionaries))
    }

    /// Writes the image.
    pub(crate) fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(IMAGE_MAGIC)?;
        wtr.write_all(&[0xFF; PADDING_LEN])?;
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(self).map_err(|e| {
            VokabelError::invalid_state("rkyv serialization failed".to_string(), e.to_string())
        })?;
        wtr.write_all(&bytes)?;
        Ok(())
    }

    /// Reads and validates an image.
    pub(crate) fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; IMAGE_MAGIC_LEN];
        rdr.read_exact(&mut magic)?;
        if magic != IMAGE_MAGIC {
            return Err(VokabelError::invalid_argument(
                "rdr",
                "The magic number of the input image mismatches.",
            ));
        }
        let mut padding = [0; PADDING_LEN];
        rdr.read_exact(&mut padding)?;

        let mut buffer = vec![];
        rdr.read_to_end(&mut buffer)?;
        let mut aligned: AlignedVec<RKYV_ALIGNMENT> = AlignedVec::with_capacity(buffer.len());
        aligned.extend_from_slice(&buffer);

        rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned).map_err(|e| {
            VokabelError::invalid_state(
                "rkyv validation failed. The image may be corrupted or incompatible.".to_string(),
                e.to_string(),
            )
        })
    }
}
