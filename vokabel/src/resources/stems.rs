//! Stem lexicon used by compound splitting.
//!
//! Keys are lower-cased surfaces and lemmas of the lemma index and headwords
//! of the German dictionary. Each key points to the canonical lemma the stem
//! stands for.

use std::collections::BTreeMap;

use crate::errors::{Result, VokabelError};
use crate::resources::dictionary::Dictionary;
use crate::resources::lemma_index::LemmaIndex;

/// A stem known to the lexicon.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stem {
    /// Canonical lemma, with its original casing.
    pub lemma: String,

    /// Rank of the lemma in the index, if the stem comes from the index.
    pub rank: Option<u32>,

    /// `true` if the stem is a headword of the dictionary.
    pub in_dictionary: bool,

    nominal: bool,
}

impl Stem {
    /// `true` if the stem stands for a noun or a proper noun.
    pub fn is_nominal(&self) -> bool {
        self.nominal
    }

    /// Lower values are preferred when two entries share a key.
    fn preference(&self) -> (bool, u32) {
        (!self.nominal, self.rank.unwrap_or(u32::MAX))
    }
}

/// A match of [`StemLexicon::common_prefix_iterator`].
#[derive(Clone, Copy, Debug)]
pub struct StemMatch<'a> {
    /// Id of the stem, usable with [`StemLexicon::stem`].
    pub id: u32,

    pub stem: &'a Stem,

    /// End position of the match in characters.
    pub end_char: usize,
}

/// Trie over lower-cased stems.
#[derive(Default)]
pub struct StemLexicon {
    // crawdad cannot build an empty trie.
    trie: Option<crawdad::Trie>,
    stems: Vec<Stem>,
}

impl StemLexicon {
    /// Builds the lexicon from the index and an optional dictionary.
    ///
    /// # Errors
    ///
    /// [`VokabelError`] is returned when the trie cannot be built.
    pub fn build(index: &LemmaIndex, dictionary: Option<&Dictionary>) -> Result<Self> {
        let mut map: BTreeMap<String, Stem> = BTreeMap::new();

        let mut add = |key: String, stem: Stem| {
            if key.chars().count() < 2 {
                return;
            }
            match map.get_mut(&key) {
                Some(old) => {
                    let in_dictionary = old.in_dictionary || stem.in_dictionary;
                    if stem.rank.is_some() && stem.preference() < old.preference() {
                        *old = stem;
                    }
                    old.in_dictionary = in_dictionary;
                }
                None => {
                    map.insert(key, stem);
                }
            }
        };

        for entry in index.entries() {
            let stem = Stem {
                lemma: entry.lemma.clone(),
                rank: index.rank_of(&entry.lemma),
                in_dictionary: false,
                nominal: entry.is_nominal(),
            };
            add(entry.surface.to_lowercase(), stem.clone());
            add(entry.lemma.to_lowercase(), stem);
        }
        if let Some(dict) = dictionary {
            for entry in dict.entries() {
                add(
                    entry.headword.to_lowercase(),
                    Stem {
                        lemma: entry.headword.clone(),
                        rank: None,
                        in_dictionary: true,
                        nominal: entry.headword.chars().next().is_some_and(char::is_uppercase),
                    },
                );
            }
        }

        let mut records = Vec::with_capacity(map.len());
        let mut stems = Vec::with_capacity(map.len());
        for (key, stem) in map {
            records.push((key, u32::try_from(stems.len())?));
            stems.push(stem);
        }
        let trie = if records.is_empty() {
            None
        } else {
            Some(
                crawdad::Trie::from_records(records.iter().map(|(k, v)| (k, *v)))
                    .map_err(|e| VokabelError::invalid_argument("records", e.to_string()))?,
            )
        };
        log::debug!("built stem lexicon with {} stems", stems.len());
        Ok(Self { trie, stems })
    }

    /// Iterates over all stems that are prefixes of `input`.
    ///
    /// `input` must be lower-cased.
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = StemMatch<'a>> + 'a {
        self.trie.iter().flat_map(move |trie| {
            trie.common_prefix_search(input.iter().copied())
                .map(move |(value, end_char)| StemMatch {
                    id: value,
                    stem: &self.stems[value as usize],
                    end_char,
                })
        })
    }

    /// Gets the stem spelled exactly as `key` (lower-cased).
    pub fn get(&self, key: &str) -> Option<&Stem> {
        let value = self.trie.as_ref()?.exact_match(key.chars())?;
        self.stems.get(value as usize)
    }

    /// Gets the longest stem of at least `min_len` characters that ends
    /// `input`, i.e. the head of a compound.
    ///
    /// `input` must be lower-cased.
    pub fn head(&self, input: &[char], min_len: usize) -> Option<&Stem> {
        let last = input.len().checked_sub(min_len.max(1))?;
        (0..=last).find_map(|start| {
            let key: String = input[start..].iter().collect();
            self.get(&key)
        })
    }

    /// Gets the stem with the given id.
    #[inline(always)]
    pub fn stem(&self, id: u32) -> Option<&Stem> {
        self.stems.get(usize::try_from(id).ok()?)
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> StemLexicon {
        let index = LemmaIndex::from_reader(
            "Arbeit,NOUN,Arbeit,300\nPlatz,NOUN,Platz,500\nplatzen,VERB,platzen,4000\nessen,VERB,essen,200\nEssen,NOUN,Essen,700\n"
                .as_bytes(),
        )
        .unwrap();
        let dict = Dictionary::from_reader("Sicherheit\tsafety\nEi\tegg\n".as_bytes()).unwrap();
        StemLexicon::build(&index, Some(&dict)).unwrap()
    }

    #[test]
    fn test_common_prefix() {
        let lex = lexicon();
        let input: Vec<char> = "platzende".chars().collect();
        let found: Vec<_> = lex
            .common_prefix_iterator(&input)
            .map(|m| (m.stem.lemma.as_str(), m.end_char))
            .collect();
        assert_eq!(vec![("Platz", 5), ("platzen", 7)], found);
    }

    #[test]
    fn test_noun_preferred_on_collision() {
        let lex = lexicon();
        let stem = lex.get("essen").unwrap();
        assert_eq!("Essen", stem.lemma);
        assert_eq!(Some(700), stem.rank);
    }

    #[test]
    fn test_dictionary_stems() {
        let lex = lexicon();
        let stem = lex.get("sicherheit").unwrap();
        assert_eq!("Sicherheit", stem.lemma);
        assert!(stem.in_dictionary);
        assert_eq!(None, stem.rank);
        assert!(lex.get("ei").unwrap().in_dictionary);
        assert!(lex.get("haus").is_none());
    }

    #[test]
    fn test_head() {
        let lex = lexicon();
        let input: Vec<char> = "arbeitsplatzsicherheit".chars().collect();
        let head = lex.head(&input, 3).unwrap();
        assert_eq!("Sicherheit", head.lemma);
        assert!(head.is_nominal());

        let input: Vec<char> = "zerplatzen".chars().collect();
        let head = lex.head(&input, 3).unwrap();
        assert_eq!("platzen", head.lemma);
        assert!(!head.is_nominal());

        let input: Vec<char> = "frühstücksei".chars().collect();
        assert!(lex.head(&input, 3).is_none());
        assert_eq!("Ei", lex.head(&input, 2).unwrap().lemma);
    }

    #[test]
    fn test_empty() {
        let lex = StemLexicon::build(&LemmaIndex::default(), None).unwrap();
        assert!(lex.is_empty());
        assert_eq!(0, lex.common_prefix_iterator(&['a']).count());
        assert!(lex.get("a").is_none());
    }
}
