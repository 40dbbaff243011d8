//! Assembly of the final vocabulary list.

use std::cmp::Ordering;

use hashbrown::HashMap;

use crate::common::{Language, PosTag};
use crate::config::OrderMode;
use crate::resources::LemmaIndex;
use crate::sentence::SentenceContext;

/// Where a lemma was seen first.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Position {
    /// Ordinal of the token in the document.
    pub token: usize,

    /// Index of the sentence.
    pub sentence: usize,

    /// Offset of the token in characters.
    pub char_offset: usize,
}

/// A vocabulary candidate produced for one token.
#[derive(Clone, Debug)]
pub struct Occurrence<'a> {
    pub lemma: String,
    pub pos: PosTag,
    pub gloss: Option<String>,
    pub surface: &'a str,
    pub position: Position,

    /// Component lemmas of a combined compound entry.
    pub parts: Vec<String>,
}

/// A distinct lemma of the vocabulary list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VocabularyEntry {
    pub lemma: String,
    pub language: Language,
    pub pos: PosTag,
    pub gloss: Option<String>,

    /// Surface forms the lemma was seen as, in order of first occurrence.
    pub source_forms: Vec<String>,

    pub first_seen: Position,

    /// Number of occurrences in the text.
    pub occurrences: usize,

    /// Sentences around the first occurrence, if requested.
    pub context: Option<SentenceContext>,

    /// Component lemmas of a combined compound entry; empty otherwise.
    pub parts: Vec<String>,
}

impl VocabularyEntry {
    /// Gets the shortest source form, the first one on ties.
    pub fn shortest_form(&self) -> &str {
        self.source_forms
            .iter()
            .min_by_key(|f| f.chars().count())
            .map_or(self.lemma.as_str(), String::as_str)
    }
}

/// A sentence with its vocabulary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentenceRecord {
    pub index: usize,
    pub text: String,
    pub context: Option<SentenceContext>,

    /// Distinct lemmas of the sentence, most frequent first.
    pub words: Vec<String>,
}

/// Deduplicates occurrences into vocabulary entries.
#[derive(Clone, Debug)]
pub struct VocabularyAssembler {
    language: Language,
    entries: Vec<VocabularyEntry>,
    ids: HashMap<(String, Language), usize>,
    // Word lists of the sentences.
    sentences: HashMap<usize, Vec<String>>,
}

impl VocabularyAssembler {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            entries: vec![],
            ids: HashMap::new(),
            sentences: HashMap::new(),
        }
    }

    /// Adds an occurrence and returns the id of its entry.
    ///
    /// A repeated lemma only adds its surface form to the existing entry.
    pub fn add(&mut self, occurrence: Occurrence) -> usize {
        let sentence = occurrence.position.sentence;
        let id = self.add_unlisted(occurrence);
        let lemma = self.entries[id].lemma.clone();
        self.list(sentence, lemma);
        id
    }

    /// Adds an occurrence without listing its lemma in the sentence word list.
    pub fn add_unlisted(&mut self, occurrence: Occurrence) -> usize {
        let key = (occurrence.lemma, self.language);
        let id = match self.ids.get(&key) {
            Some(&id) => {
                let entry = &mut self.entries[id];
                entry.occurrences += 1;
                if !entry.source_forms.iter().any(|f| f == occurrence.surface) {
                    entry.source_forms.push(occurrence.surface.to_string());
                }
                id
            }
            None => {
                let id = self.entries.len();
                self.entries.push(VocabularyEntry {
                    lemma: key.0.clone(),
                    language: self.language,
                    pos: occurrence.pos,
                    gloss: occurrence.gloss,
                    source_forms: vec![occurrence.surface.to_string()],
                    first_seen: occurrence.position,
                    occurrences: 1,
                    context: None,
                    parts: occurrence.parts,
                });
                self.ids.insert(key, id);
                id
            }
        };
        id
    }

    /// Lists `lemma` in the word list of `sentence`.
    pub fn list(&mut self, sentence: usize, lemma: String) {
        let words = self.sentences.entry(sentence).or_default();
        if !words.contains(&lemma) {
            words.push(lemma);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the distinct lemmas of a sentence, most frequent first.
    pub fn sentence_words(&self, sentence: usize, index: &LemmaIndex) -> Vec<String> {
        let Some(words) = self.sentences.get(&sentence) else {
            return vec![];
        };
        let mut words = words.clone();
        words.sort_by(|a, b| by_frequency(a, b, index));
        words
    }

    /// Orders the entries and attaches contexts.
    ///
    /// `context` is called with the sentence of each entry's first occurrence.
    pub fn finish<F>(self, order: OrderMode, index: &LemmaIndex, mut context: F) -> Vec<VocabularyEntry>
    where
        F: FnMut(usize) -> Option<SentenceContext>,
    {
        let mut entries = self.entries;
        match order {
            OrderMode::FirstSeen => {}
            OrderMode::Frequency => entries.sort_by(|a, b| by_frequency(&a.lemma, &b.lemma, index)),
            OrderMode::Alphabetical => entries.sort_by(|a, b| {
                a.lemma
                    .to_lowercase()
                    .cmp(&b.lemma.to_lowercase())
                    .then_with(|| a.lemma.cmp(&b.lemma))
            }),
        }
        for entry in &mut entries {
            entry.context = context(entry.first_seen.sentence);
        }
        entries
    }
}

/// Known lemmas by rank, then unknown ones; alphabetical within equal ranks.
fn by_frequency(a: &str, b: &str, index: &LemmaIndex) -> Ordering {
    let key = |lemma: &str| {
        let rank = index.rank_of(lemma);
        (rank.is_none(), rank, lemma.to_lowercase())
    };
    key(a).cmp(&key(b))
}
