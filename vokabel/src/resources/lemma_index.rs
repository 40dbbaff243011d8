//! Lemma index.
//!
//! The index is a CSV file read line by line. The meaning of a row depends on
//! its number of fields:
//!
//! | fields | layout                          |
//! |--------|---------------------------------|
//! | 1      | `lemma`                         |
//! | 2      | `surface,lemma`                 |
//! | 3      | `surface,pos,lemma`             |
//! | 4      | `surface,pos,lemma,rank`        |
//!
//! `*` or an empty POS field matches any tag. Without an explicit rank, the
//! ordinal of the row is used, so files sorted by frequency need no rank
//! column. Lower ranks are more frequent. The first row of a key wins.

use std::io::Read;

use hashbrown::HashMap;

use crate::common::PosTag;
use crate::errors::{Result, VokabelError};
use crate::utils::{parse_csv_row, read_resource_lines};

/// A row of the lemma index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaIndexEntry {
    pub surface: String,

    /// [`None`] matches any tag.
    pub pos: Option<PosTag>,

    pub lemma: String,

    /// Frequency rank, lower is more frequent.
    pub rank: u32,
}

impl LemmaIndexEntry {
    /// Returns `true` if the entry describes a noun.
    ///
    /// Entries without a tag count as nouns when the lemma is capitalized.
    pub fn is_nominal(&self) -> bool {
        match self.pos {
            Some(pos) => pos.is_nominal(),
            None => self.lemma.chars().next().is_some_and(char::is_uppercase),
        }
    }
}

/// Result of an index lookup.
#[derive(Clone, Copy, Debug)]
pub struct IndexMatch<'a> {
    pub entry: &'a LemmaIndexEntry,

    /// `true` if the entry carries exactly the queried tag.
    pub exact_pos: bool,
}

#[derive(Clone, Copy, Debug)]
struct LemmaInfo {
    rank: u32,
    nominal: bool,
}

/// Mapping from (surface, POS) to lemma.
#[derive(Clone, Debug, Default)]
pub struct LemmaIndex {
    entries: Vec<LemmaIndexEntry>,
    by_surface: HashMap<String, Vec<u32>>,
    lemmas: HashMap<String, LemmaInfo>,
}

impl LemmaIndex {
    /// Builds an index from entries. Later duplicates of a (surface, POS) key are ignored.
    ///
    /// # Errors
    ///
    /// [`VokabelError`] is returned when the number of entries exceeds [`u32::MAX`].
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = LemmaIndexEntry>,
    {
        let mut index = Self::default();
        for entry in entries {
            let ids = index.by_surface.entry(entry.surface.clone()).or_default();
            if ids
                .iter()
                .any(|&id| index.entries[id as usize].pos == entry.pos)
            {
                continue;
            }
            ids.push(u32::try_from(index.entries.len())?);

            let nominal = entry.is_nominal();
            index
                .lemmas
                .entry(entry.lemma.clone())
                .and_modify(|info| {
                    info.rank = info.rank.min(entry.rank);
                    info.nominal |= nominal;
                })
                .or_insert(LemmaInfo {
                    rank: entry.rank,
                    nominal,
                });
            index.entries.push(entry);
        }
        Ok(index)
    }

    /// Reads an index in CSV format.
    ///
    /// # Errors
    ///
    /// [`VokabelError`] is returned when a row has an unexpected number of
    /// fields, an unknown POS tag, an invalid rank, or empty surface or lemma.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut entries = vec![];
        for (ordinal, line) in read_resource_lines(rdr)?.into_iter().enumerate() {
            let fields = parse_csv_row(&line.text)?;
            let fields: Vec<&str> = fields.iter().map(|f| f.trim()).collect();
            let bad = |msg: String| {
                VokabelError::invalid_format("lemma index", format!("line {}: {msg}", line.number))
            };

            let (surface, pos, lemma, rank) = match fields.as_slice() {
                [lemma] => (*lemma, "*", *lemma, None),
                [surface, lemma] => (*surface, "*", *lemma, None),
                [surface, pos, lemma] => (*surface, *pos, *lemma, None),
                [surface, pos, lemma, rank] => (*surface, *pos, *lemma, Some(*rank)),
                _ => {
                    return Err(bad(format!(
                        "expected 1 to 4 fields, got {}",
                        fields.len()
                    )));
                }
            };
            if surface.is_empty() || lemma.is_empty() {
                return Err(bad("surface and lemma must not be empty".to_string()));
            }
            let pos = match pos {
                "" | "*" => None,
                tag => Some(
                    tag.parse::<PosTag>()
                        .map_err(|_| bad(format!("unknown POS tag {tag:?}")))?,
                ),
            };
            let rank = match rank {
                Some(r) => r
                    .parse::<u32>()
                    .map_err(|e| bad(format!("invalid rank {r:?}: {e}")))?,
                None => u32::try_from(ordinal)?,
            };
            entries.push(LemmaIndexEntry {
                surface: surface.to_string(),
                pos,
                lemma: lemma.to_string(),
                rank,
            });
        }
        Self::from_entries(entries)
    }

    /// Looks up a surface form.
    ///
    /// An entry with exactly `pos` is preferred, then a wildcard entry, then
    /// the best-ranked entry of any tag. With [`PosTag::X`], the best-ranked
    /// entry of any tag is returned directly.
    pub fn lookup(&self, surface: &str, pos: PosTag) -> Option<IndexMatch<'_>> {
        let ids = self.by_surface.get(surface)?;
        let candidates = ids.iter().map(|&id| &self.entries[id as usize]);

        if !pos.is_unknown() {
            if let Some(entry) = candidates.clone().find(|e| e.pos == Some(pos)) {
                return Some(IndexMatch {
                    entry,
                    exact_pos: true,
                });
            }
            if let Some(entry) = candidates.clone().find(|e| e.pos.is_none()) {
                return Some(IndexMatch {
                    entry,
                    exact_pos: false,
                });
            }
        }
        // min_by_key returns the first minimum, i.e. the earliest row on ties.
        candidates.min_by_key(|e| e.rank).map(|entry| IndexMatch {
            entry,
            exact_pos: false,
        })
    }

    /// Returns `true` if `surface` appears in the index with any tag.
    pub fn contains_surface(&self, surface: &str) -> bool {
        self.by_surface.contains_key(surface)
    }

    /// Returns `true` if `lemma` is a lemma of some entry.
    pub fn contains_lemma(&self, lemma: &str) -> bool {
        self.lemmas.contains_key(lemma)
    }

    /// Returns `true` if `lemma` is the lemma of a noun entry.
    pub fn is_noun_lemma(&self, lemma: &str) -> bool {
        self.lemmas.get(lemma).is_some_and(|info| info.nominal)
    }

    /// Gets the best rank of a lemma.
    pub fn rank_of(&self, lemma: &str) -> Option<u32> {
        self.lemmas.get(lemma).map(|info| info.rank)
    }

    /// Gets all entries in file order.
    pub fn entries(&self) -> &[LemmaIndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "\
# surface,pos,lemma,rank
Häuser,NOUN,Haus,120
Hauses,NOUN,Haus,120
Haus,NOUN,Haus,120
lief,VERB,laufen,80
Lauf,NOUN,Lauf,900
Lauf,*,laufen,950
Lauf,NOUN,Laufe,1
";

    #[test]
    fn test_from_reader() {
        let index = LemmaIndex::from_reader(INDEX.as_bytes()).unwrap();
        // The duplicate (Lauf, NOUN) row is dropped.
        assert_eq!(6, index.len());
        assert_eq!(Some(120), index.rank_of("Haus"));
        assert!(index.is_noun_lemma("Haus"));
        assert!(!index.is_noun_lemma("laufen"));
        assert!(index.contains_surface("Hauses"));
    }

    #[test]
    fn test_lookup_priority() {
        let index = LemmaIndex::from_reader(INDEX.as_bytes()).unwrap();

        let m = index.lookup("Lauf", PosTag::Noun).unwrap();
        assert_eq!("Lauf", m.entry.lemma);
        assert!(m.exact_pos);

        let m = index.lookup("Lauf", PosTag::Verb).unwrap();
        assert_eq!("laufen", m.entry.lemma);
        assert!(!m.exact_pos);

        let m = index.lookup("Lauf", PosTag::X).unwrap();
        assert_eq!("Lauf", m.entry.lemma);

        let m = index.lookup("lief", PosTag::Noun).unwrap();
        assert_eq!("laufen", m.entry.lemma);
        assert!(!m.exact_pos);

        assert!(index.lookup("Baum", PosTag::Noun).is_none());
    }

    #[test]
    fn test_short_layouts() {
        let index = LemmaIndex::from_reader("der\nund\nHäuser,Haus\n".as_bytes()).unwrap();
        assert_eq!(Some(0), index.rank_of("der"));
        assert_eq!(Some(2), index.rank_of("Haus"));
        assert_eq!("Haus", index.lookup("Häuser", PosTag::X).unwrap().entry.lemma);
        assert!(index.is_noun_lemma("Haus"));
    }

    #[test]
    fn test_invalid_rows() {
        assert!(LemmaIndex::from_reader("a,b,c,d,e\n".as_bytes()).is_err());
        assert!(LemmaIndex::from_reader("Haus,NOMEN,Haus\n".as_bytes()).is_err());
        assert!(LemmaIndex::from_reader("Haus,NOUN,Haus,oft\n".as_bytes()).is_err());
        assert!(LemmaIndex::from_reader(",NOUN,Haus\n".as_bytes()).is_err());
    }
}
