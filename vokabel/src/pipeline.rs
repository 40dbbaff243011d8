//! Driver running all components over a text.

use std::borrow::Cow;

use hashbrown::HashSet;

use crate::annotator::DictionaryAnnotator;
use crate::assembler::{Occurrence, Position, SentenceRecord, VocabularyAssembler, VocabularyEntry};
use crate::common::{capitalize_first, has_internal_caps, is_all_caps, Language, PosTag};
use crate::config::{ExtractionType, PipelineConfig, SplitPolicy};
use crate::genitive::GenitiveFixer;
use crate::resolver::{Confidence, LemmaQuery, LemmaResolver};
use crate::resources::ResourceContext;
use crate::sentence::SentenceContext;
use crate::splitter::{CandidateKind, CompoundSplitter, SplitCandidate};
use crate::token::{Token, TokenKind};
use crate::tokenizer::{Document, Tokenizer};

/// Result of a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Extraction {
    /// Distinct lemmas, for [`ExtractionType::Word`].
    Words(Vec<VocabularyEntry>),
    /// One record per sentence, for [`ExtractionType::Sentence`].
    Sentences(Vec<SentenceRecord>),
}

/// Vocabulary extraction pipeline.
///
/// The pipeline borrows the resource context immutably; any number of texts
/// can be processed with one pipeline, and every run is independent of the
/// previous ones.
///
/// # Examples
///
/// ```
/// use vokabel::{Extraction, LemmaIndex, Language, Pipeline, PipelineConfig, ResourceContext};
///
/// let index = LemmaIndex::from_reader("Häuser,NOUN,Haus,1\n".as_bytes())?;
/// let ctx = ResourceContext::builder(index).build()?;
/// let config = PipelineConfig::builder(Language::De).build()?;
/// let pipeline = Pipeline::new(&ctx, config);
///
/// let Extraction::Words(entries) = pipeline.run("Die Häuser sind alt.") else {
///     unreachable!();
/// };
/// assert!(entries.iter().any(|e| e.lemma == "Haus"));
/// # Ok::<(), vokabel::errors::VokabelError>(())
/// ```
pub struct Pipeline<'r> {
    ctx: &'r ResourceContext,
    config: PipelineConfig,
    tokenizer: Tokenizer,
    resolver: LemmaResolver,
    fixer: GenitiveFixer<'r>,
    splitter: CompoundSplitter<'r>,
    annotator: DictionaryAnnotator<'r>,
}

impl<'r> Pipeline<'r> {
    /// Creates a pipeline with the default lemma resolver.
    pub fn new(ctx: &'r ResourceContext, config: PipelineConfig) -> Self {
        Self {
            ctx,
            tokenizer: Tokenizer::new(config.language()),
            config,
            resolver: LemmaResolver::new(),
            fixer: GenitiveFixer::new(ctx),
            splitter: CompoundSplitter::new(ctx),
            annotator: DictionaryAnnotator::new(ctx),
        }
    }

    /// Replaces the lemma resolver.
    pub fn resolver(mut self, resolver: LemmaResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the genitive fixer, e.g. one with extra exceptions.
    pub fn genitive_fixer(mut self, fixer: GenitiveFixer<'r>) -> Self {
        self.fixer = fixer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes a text according to the configured extraction type.
    pub fn run(&self, text: &str) -> Extraction {
        match self.config.extraction_type() {
            ExtractionType::Word => Extraction::Words(self.extract_words(text)),
            ExtractionType::Sentence => Extraction::Sentences(self.extract_sentences(text)),
        }
    }

    /// Extracts the distinct lemmas of a text.
    pub fn extract_words(&self, text: &str) -> Vec<VocabularyEntry> {
        let doc = self.tokenizer.tokenize(text);
        let asm = self.assemble(&doc);
        log::debug!("assembled {} entries", asm.len());
        asm.finish(self.config.order(), self.ctx.index(), |i| self.context(&doc, i))
    }

    /// Extracts every non-empty sentence with its word list.
    pub fn extract_sentences(&self, text: &str) -> Vec<SentenceRecord> {
        let doc = self.tokenizer.tokenize(text);
        let asm = self.assemble(&doc);
        doc.sentences()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, s)| SentenceRecord {
                index: i,
                text: s.to_string(),
                context: self.context(&doc, i),
                words: asm.sentence_words(i, self.ctx.index()),
            })
            .collect()
    }

    fn context(&self, doc: &Document, sentence: usize) -> Option<SentenceContext> {
        let size = self.config.context_size();
        (size > 0).then(|| doc.context(sentence, size))
    }

    fn assemble(&self, doc: &Document) -> VocabularyAssembler {
        let mut asm = VocabularyAssembler::new(self.config.language());
        let lowercase = lowercase_words(doc);
        let list_parts = self.config.gcs().is_some_and(|g| g.add_parts_to_wordlist);
        for token in doc.tokens() {
            if token.kind() == TokenKind::Link || !token.is_lexical() {
                continue;
            }
            let sentence = doc.sentence(token.sentence()).unwrap_or_default();
            let pos = self.guess_pos(&token, &lowercase);
            let analysis = self.analyze(&token, pos, sentence);
            let listed = !analysis.split || list_parts;
            if !listed {
                asm.list(token.sentence(), analysis.lemma);
            }
            for candidate in analysis.candidates {
                let gloss = if candidate.parts.is_empty() {
                    self.annotator
                        .gloss(&candidate.lemma, self.config.language())
                        .map(str::to_string)
                } else {
                    self.annotator
                        .gloss_parts(&candidate.parts, self.config.language())
                };
                let occurrence = Occurrence {
                    lemma: candidate.lemma,
                    pos: candidate.pos,
                    gloss,
                    surface: token.surface(),
                    position: Position {
                        token: token.index(),
                        sentence: token.sentence(),
                        char_offset: token.range_char().start,
                    },
                    parts: candidate.parts,
                };
                if listed {
                    asm.add(occurrence);
                } else {
                    asm.add_unlisted(occurrence);
                }
            }
        }
        asm
    }

    /// Guesses the POS of a word the tokenizer left untagged.
    ///
    /// Only for languages capitalizing nouns, and only for words the lemma
    /// index does not know. A capitalized sentence-initial word that never
    /// occurs in lower case elsewhere in the text is a noun. Otherwise the
    /// word is a noun if its longest known final stem is one.
    fn guess_pos(&self, token: &Token, lowercase: &HashSet<String>) -> PosTag {
        let pos = token.pos();
        if !pos.is_unknown()
            || token.kind() != TokenKind::Word
            || !self.config.language().capitalizes_nouns()
        {
            return pos;
        }
        let surface = token.surface();
        let lower = surface.to_lowercase();
        let index = self.ctx.index();
        if index.contains_surface(surface) || index.contains_surface(&lower) {
            return pos;
        }
        if token.is_sentence_start()
            && surface.chars().next().is_some_and(char::is_uppercase)
            && !lowercase.contains(&lower)
        {
            return PosTag::Noun;
        }
        let min_len = self
            .config
            .gcs()
            .map_or_else(|| SplitPolicy::default().min_stem_len, |g| g.policy.min_stem_len);
        let chars: Vec<char> = lower.chars().collect();
        match self.ctx.stems().head(&chars, min_len) {
            Some(stem) if stem.is_nominal() => PosTag::Noun,
            _ => pos,
        }
    }

    /// Resolves a token and splits its lemma.
    fn analyze(&self, token: &Token, pos: PosTag, sentence: &str) -> Analysis {
        let surface = token.surface();
        let form = if self.config.fix_genitive() {
            self.fixer.fix(surface, pos)
        } else {
            Cow::Borrowed(surface)
        };
        let query = LemmaQuery::new(surface, pos)
            .form(&form)
            .sentence(sentence, token.is_sentence_start());
        let resolution = self.resolver.resolve(&query, self.ctx);
        log::debug!(
            "{surface:?} -> {:?} ({}, {:?})",
            resolution.lemma,
            resolution.source,
            resolution.confidence
        );

        let pos = resolution.pos;
        let (split, candidates): (bool, Vec<SplitCandidate>) = match self.config.gcs() {
            // Overrides are final.
            Some(gcs) if resolution.confidence != Confidence::Forced => {
                let result = self.splitter.split(&resolution.lemma, pos, gcs, sentence);
                (result.is_split(), result.candidates)
            }
            _ => (
                false,
                vec![SplitCandidate {
                    lemma: resolution.lemma.clone(),
                    parts: vec![],
                    kind: CandidateKind::Unsplit,
                }],
            ),
        };
        Analysis {
            lemma: self.format_lemma(&resolution.lemma, pos),
            split,
            candidates: candidates
                .into_iter()
                .map(|c| Candidate {
                    lemma: self.format_lemma(&c.lemma, pos),
                    parts: c.parts.iter().map(|p| self.format_lemma(p, pos)).collect(),
                    pos,
                })
                .collect(),
        }
    }

    /// Applies the configured capitalization.
    ///
    /// Words in all capitals or with capitals inside are kept as they are.
    fn format_lemma(&self, lemma: &str, pos: PosTag) -> String {
        if is_all_caps(lemma) || has_internal_caps(lemma) {
            return lemma.to_string();
        }
        let force = match pos {
            PosTag::Noun => {
                self.config.force_noun_capitalization() && self.config.language() == Language::De
            }
            PosTag::Propn => self.config.force_proper_noun_capitalization(),
            _ => false,
        };
        if force {
            capitalize_first(lemma)
        } else {
            lemma.to_string()
        }
    }
}

/// Lower-cased words written in lower case and not starting a sentence.
fn lowercase_words(doc: &Document) -> HashSet<String> {
    doc.tokens()
        .filter(|t| t.kind() == TokenKind::Word && !t.is_sentence_start())
        .map(|t| t.surface())
        .filter(|s| s.chars().next().is_some_and(char::is_lowercase))
        .map(str::to_lowercase)
        .collect()
}

struct Analysis {
    /// Formatted lemma of the whole word.
    lemma: String,

    /// `true` if the word was split into components.
    split: bool,

    candidates: Vec<Candidate>,
}

struct Candidate {
    lemma: String,
    parts: Vec<String>,
    pos: PosTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::SplitMode;
    use crate::resources::{Dictionary, LemmaIndex, OverrideTable};

    fn context() -> ResourceContext {
        let index = LemmaIndex::from_reader(
            "Haus,NOUN,Haus,10\nTür,NOUN,Tür,20\nist,AUX,sein,1\nalt,ADJ,alt,30\nberlin,PROPN,berlin,50\n"
                .as_bytes(),
        )
        .unwrap();
        let dict = Dictionary::from_reader("Haus\thouse\nTür\tdoor\n".as_bytes()).unwrap();
        ResourceContext::builder(index)
            .overrides(OverrideTable::default())
            .dictionary(Language::De, dict)
            .build()
            .unwrap()
    }

    fn lemmas(entries: &[VocabularyEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.lemma.as_str()).collect()
    }

    #[test]
    fn test_punctuation_and_links_are_skipped() {
        let ctx = context();
        let config = PipelineConfig::builder(Language::De).build().unwrap();
        let pipeline = Pipeline::new(&ctx, config);
        let entries = pipeline.extract_words("Das Haus ist alt, siehe https://example.org/haus. 42!");
        assert_eq!(vec!["Das", "Haus", "sein", "alt", "siehe"], lemmas(&entries));
    }

    #[test]
    fn test_combined_glosses() {
        let ctx = context();
        let config = PipelineConfig::builder(Language::De)
            .gcs(true)
            .split_mode(SplitMode::Combined)
            .build()
            .unwrap();
        let pipeline = Pipeline::new(&ctx, config);
        let entries = pipeline.extract_words("Die Haustür klemmt.");
        let entry = entries.iter().find(|e| e.lemma == "Haus + Tür").unwrap();
        assert_eq!(Some("house; door"), entry.gloss.as_deref());
        assert_eq!(vec!["Haus", "Tür"], entry.parts);
        assert_eq!(vec!["Haustür"], entry.source_forms);
    }

    #[test]
    fn test_capitalization() {
        let ctx = context();
        let config = PipelineConfig::builder(Language::De)
            .force_proper_noun_capitalization(true)
            .build()
            .unwrap();
        let pipeline = Pipeline::new(&ctx, config);
        let entries = pipeline.extract_words("Wir fahren nach berlin und zur NATO.");
        assert!(lemmas(&entries).contains(&"Berlin"));
        assert!(lemmas(&entries).contains(&"NATO"));
    }

    #[test]
    fn test_sentence_start_guessing() {
        let ctx = context();
        let config = PipelineConfig::builder(Language::De).gcs(true).build().unwrap();
        let pipeline = Pipeline::new(&ctx, config);

        let entries = pipeline.extract_words("Haustüren sind alt.");
        assert_eq!(PosTag::Noun, entries[0].pos);
        assert_eq!(vec!["Haus", "Türen"], lemmas(&entries)[..2].to_vec());

        // Seen in lower case, so it is not taken for a noun.
        let entries = pipeline.extract_words("Bald ist es alt. Es wird bald neu.");
        assert_eq!("bald", entries[0].lemma);
        assert_eq!(PosTag::X, entries[0].pos);
    }

    #[test]
    fn test_nominal_head() {
        let ctx = context();
        let config = PipelineConfig::builder(Language::De).gcs(true).build().unwrap();
        let pipeline = Pipeline::new(&ctx, config);
        let entries = pipeline.extract_words("Es ist eine althaustür.");
        assert!(lemmas(&entries).ends_with(&["alt", "Haus", "Tür"]));
    }

    #[test]
    fn test_sentence_words_of_split_compounds() {
        let ctx = context();
        let config = |list_parts| {
            PipelineConfig::builder(Language::De)
                .extraction_type(ExtractionType::Sentence)
                .gcs(true)
                .add_parts_to_wordlist(list_parts)
                .build()
                .unwrap()
        };

        let pipeline = Pipeline::new(&ctx, config(false));
        let Extraction::Sentences(records) = pipeline.run("Die Haustür ist alt.") else {
            panic!("expected sentences");
        };
        assert!(records[0].words.contains(&"Haustür".to_string()));
        assert!(!records[0].words.contains(&"Tür".to_string()));

        let pipeline = Pipeline::new(&ctx, config(true));
        let Extraction::Sentences(records) = pipeline.run("Die Haustür ist alt.") else {
            panic!("expected sentences");
        };
        assert!(records[0].words.contains(&"Tür".to_string()));
        assert!(!records[0].words.contains(&"Haustür".to_string()));
    }

    #[test]
    fn test_sentences() {
        let ctx = context();
        let config = PipelineConfig::builder(Language::De)
            .extraction_type(ExtractionType::Sentence)
            .context_size(1)
            .build()
            .unwrap();
        let pipeline = Pipeline::new(&ctx, config);
        let Extraction::Sentences(records) =
            pipeline.run("Das Haus ist alt.\nDie Tür ist neu.\n\nEnde gut.")
        else {
            panic!("expected sentences");
        };
        assert_eq!(3, records.len());
        assert_eq!(1, records[1].index);
        assert_eq!(3, records[2].index);
        assert_eq!("Die Tür ist neu.", records[1].text);
        assert_eq!(vec!["sein", "Tür", "Die", "neu"], records[1].words);
        let context = records[0].context.as_ref().unwrap();
        assert!(context.left.is_empty());
        assert_eq!(vec!["Die Tür ist neu."], context.right);
    }
}
