//! German compound splitting.
//!
//! A compound is segmented into stems of the stem lexicon, optionally
//! separated by linking morphemes. Among all segmentations covering the whole
//! word, the one with the fewest components wins; ties are broken by the
//! aggregated rank of the stems, then by insertion order. Short unknown
//! fragments at either end of the word are *fractions*, which are either
//! dropped or merged into their neighbour.

pub(crate) mod lattice;

use std::cell::RefCell;
use std::ops::Range;

use crate::common::{capitalize_first, has_internal_caps, is_all_caps, lower_tail, PosTag};
use crate::config::{GcsOptions, SplitMode};
use crate::resources::{ResourceContext, Stem};
use crate::splitter::lattice::{Lattice, NodeKind, PathNode, LINKS};

const INDEX_STEM_CONFIDENCE: f32 = 0.9;
const DICTIONARY_STEM_CONFIDENCE: f32 = 0.7;
const MERGED_CONFIDENCE: f32 = 0.5;

/// Marker wrapped around the text of a masked fraction.
pub const UNKNOWN_MARKER: &str = "__";

/// Separator of component lemmas in combined mode.
pub const COMBINED_SEPARATOR: &str = " + ";

/// A constituent of a compound.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Lemma of the constituent.
    pub lemma: String,

    /// Characters of the compound the constituent was read from, without a
    /// following linking morpheme.
    pub surface: String,

    /// Position of `surface` in the compound, in characters.
    pub range_char: Range<usize>,

    /// Number of characters covered, including a following linking morpheme.
    pub coverage: usize,

    /// Confidence in `[0, 1]`.
    pub confidence: f32,

    /// `true` for a masked fraction that no resource knows.
    pub unknown: bool,
}

/// Role of an emitted candidate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CandidateKind {
    /// The word was not split.
    Unsplit,
    /// The compound itself, emitted because of the preserve flag.
    Preserved,
    /// A single component (`separate` mode).
    Component,
    /// All components together (`combined` mode).
    Combined,
}

/// A vocabulary candidate emitted by the splitter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SplitCandidate {
    pub lemma: String,

    /// Component lemmas of a [`CandidateKind::Combined`] candidate.
    pub parts: Vec<String>,

    pub kind: CandidateKind,
}

/// Outcome of splitting one word.
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundSplitResult {
    /// The word that was split.
    pub compound: String,

    /// Components in order. An unsplit word has itself as the only component.
    pub components: Vec<Component>,

    /// Candidates to add to the vocabulary, in emission order.
    pub candidates: Vec<SplitCandidate>,
}

impl CompoundSplitResult {
    fn unsplit(lemma: &str) -> Self {
        let len = lemma.chars().count();
        Self {
            compound: lemma.to_string(),
            components: vec![Component {
                lemma: lemma.to_string(),
                surface: lemma.to_string(),
                range_char: 0..len,
                coverage: len,
                confidence: 1.0,
                unknown: false,
            }],
            candidates: vec![SplitCandidate {
                lemma: lemma.to_string(),
                parts: vec![],
                kind: CandidateKind::Unsplit,
            }],
        }
    }

    /// Returns `true` if the word was split into two or more components.
    pub fn is_split(&self) -> bool {
        self.components.len() > 1
    }

    /// Iterates over the component lemmas.
    pub fn component_lemmas(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.lemma.as_str())
    }
}

/// Compound splitter over a resource context.
///
/// The result depends only on the arguments of [`split`](Self::split) and
/// the immutable resources.
pub struct CompoundSplitter<'r> {
    ctx: &'r ResourceContext,
    // Reused between calls to avoid reallocations.
    lattice: RefCell<Lattice>,
}

impl<'r> CompoundSplitter<'r> {
    pub fn new(ctx: &'r ResourceContext) -> Self {
        Self {
            ctx,
            lattice: RefCell::new(Lattice::default()),
        }
    }

    /// Splits `lemma`.
    ///
    /// # Arguments
    ///
    /// * `lemma` - Lemma to split, after the genitive fix.
    /// * `pos` - Part of speech of the word.
    /// * `options` - Compound splitting options.
    /// * `sentence` - Sentence the word occurs in, for context-dependent overrides.
    pub fn split(
        &self,
        lemma: &str,
        pos: PosTag,
        options: &GcsOptions,
        sentence: &str,
    ) -> CompoundSplitResult {
        if !options.pos_filter.accepts(pos) {
            return CompoundSplitResult::unsplit(lemma);
        }
        if lemma.contains('-') {
            return self.split_hyphenated(lemma, pos, options, sentence);
        }
        if lemma.chars().count() < options.policy.min_compound_len
            || is_all_caps(lemma)
            || has_internal_caps(lemma)
        {
            return CompoundSplitResult::unsplit(lemma);
        }

        let chars: Vec<char> = lemma.chars().collect();
        let Some(path) = self.segment(&chars, options) else {
            log::debug!("no segmentation for {lemma:?}");
            return CompoundSplitResult::unsplit(lemma);
        };
        if path.iter().filter(|n| n.kind.is_stem()).count() < 2 {
            return CompoundSplitResult::unsplit(lemma);
        }

        let components = self.build_components(&chars, &path, pos, options, lemma, sentence);
        if components.len() < 2 {
            return CompoundSplitResult::unsplit(lemma);
        }
        log::debug!(
            "split {lemma:?} into {:?}",
            components.iter().map(|c| c.lemma.as_str()).collect::<Vec<_>>()
        );
        self.emit(lemma, components, options)
    }

    /// Splits a hyphenated word at its hyphens.
    fn split_hyphenated(
        &self,
        word: &str,
        pos: PosTag,
        options: &GcsOptions,
        sentence: &str,
    ) -> CompoundSplitResult {
        let singularize = options.part_singularization.applies_to(pos);
        let mut components = vec![];
        let mut offset = 0;
        for part in word.split('-') {
            let len = part.chars().count();
            let range = offset..offset + len;
            offset += len + 1;

            let trimmed = part.trim();
            if trimmed.chars().count() < 2 {
                continue;
            }
            let lemma = self.resolve_part(trimmed, singularize, word, sentence);
            components.push(Component {
                lemma,
                surface: part.to_string(),
                range_char: range,
                coverage: len,
                confidence: INDEX_STEM_CONFIDENCE,
                unknown: false,
            });
        }
        if components.len() < 2 {
            return CompoundSplitResult::unsplit(word);
        }
        self.emit(word, components, options)
    }

    /// Builds the lattice and returns its best path.
    fn segment(&self, chars: &[char], options: &GcsOptions) -> Option<Vec<PathNode>> {
        let policy = &options.policy;
        let lower: Vec<char> = chars
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();
        let len = lower.len();
        let stems = self.ctx.stems();

        let mut lattice = self.lattice.borrow_mut();
        lattice.reset(len);

        for start in 0..len {
            if start == 0 {
                for flen in 1..policy.min_stem_len.min(len) {
                    if self.is_fraction(&lower[..flen]) {
                        lattice.insert_node(
                            0,
                            flen,
                            NodeKind::LeadingFraction,
                            0,
                            u64::from(policy.fraction_cost),
                            policy,
                        );
                    }
                }
            }
            if !lattice.has_previous_node(start) {
                continue;
            }

            for m in stems.common_prefix_iterator(&lower[start..]) {
                if !is_valid_stem(m.stem, m.end_char, policy.min_stem_len) {
                    continue;
                }
                let cost = m
                    .stem
                    .rank
                    .unwrap_or(policy.dictionary_stem_cost);
                lattice.insert_node(
                    start,
                    start + m.end_char,
                    NodeKind::Stem(m.id),
                    u64::from(cost),
                    0,
                    policy,
                );
            }

            if start > 0 {
                for link in LINKS {
                    let link_len = link.chars().count();
                    if start + link_len < len && lower[start..].iter().copied().take(link_len).eq(link.chars()) {
                        lattice.insert_node(
                            start,
                            start + link_len,
                            NodeKind::Link,
                            0,
                            u64::from(policy.link_cost),
                            policy,
                        );
                    }
                }

                let flen = len - start;
                if flen < policy.min_stem_len && self.is_fraction(&lower[start..]) {
                    lattice.insert_node(
                        start,
                        len,
                        NodeKind::TrailingFraction,
                        0,
                        u64::from(policy.fraction_cost),
                        policy,
                    );
                }
            }
        }
        lattice.best_path()
    }

    /// Returns `true` if `fragment` has no dictionary entry of its own.
    fn is_fraction(&self, fragment: &[char]) -> bool {
        let key: String = fragment.iter().collect();
        !self
            .ctx
            .stems()
            .get(&key)
            .is_some_and(|s| s.in_dictionary)
    }

    fn build_components(
        &self,
        chars: &[char],
        path: &[PathNode],
        pos: PosTag,
        options: &GcsOptions,
        compound: &str,
        sentence: &str,
    ) -> Vec<Component> {
        let singularize = options.part_singularization.applies_to(pos);
        let mut components: Vec<Component> = vec![];
        let mut leading: Option<Range<usize>> = None;

        for node in path {
            let surface: String = chars[node.start..node.end].iter().collect();
            match node.kind {
                NodeKind::Stem(id) => {
                    let Some(stem) = self.ctx.stems().stem(id) else {
                        continue;
                    };
                    let part = cased_like(&surface, &stem.lemma);
                    let base = if singularize { stem.lemma.as_str() } else { part.as_str() };
                    let lemma = self
                        .ctx
                        .overrides()
                        .lookup_part(base, &part, compound, sentence)
                        .unwrap_or(base)
                        .to_string();
                    let mut component = Component {
                        lemma,
                        surface,
                        range_char: node.start..node.end,
                        coverage: node.end - node.start,
                        confidence: if stem.rank.is_some() {
                            INDEX_STEM_CONFIDENCE
                        } else {
                            DICTIONARY_STEM_CONFIDENCE
                        },
                        unknown: false,
                    };
                    if let Some(range) = leading.take() {
                        merge_leading(&mut component, chars, range);
                    }
                    components.push(component);
                }
                NodeKind::Link => {
                    if let Some(last) = components.last_mut() {
                        last.coverage += node.end - node.start;
                    }
                }
                NodeKind::LeadingFraction | NodeKind::TrailingFraction
                    if options.mask_unknown_parts =>
                {
                    components.push(masked(surface, node.start..node.end));
                }
                NodeKind::LeadingFraction => {
                    if !options.skip_merge_fractions {
                        leading = Some(node.start..node.end);
                    }
                }
                NodeKind::TrailingFraction => {
                    if !options.skip_merge_fractions {
                        if let Some(last) = components.last_mut() {
                            merge_trailing(last, chars, node.start..node.end);
                        }
                    }
                }
                NodeKind::Bos => {}
            }
        }
        components
    }

    /// Resolves a part of a hyphenated word.
    fn resolve_part(&self, part: &str, singularize: bool, compound: &str, sentence: &str) -> String {
        let lemma = if !singularize || is_all_caps(part) || has_internal_caps(part) {
            part.to_string()
        } else {
            self.ctx
                .index()
                .lookup(part, PosTag::X)
                .map_or_else(|| part.to_string(), |m| m.entry.lemma.clone())
        };
        self.ctx
            .overrides()
            .lookup_part(&lemma, part, compound, sentence)
            .map_or(lemma.clone(), str::to_string)
    }

    fn emit(&self, compound: &str, components: Vec<Component>, options: &GcsOptions) -> CompoundSplitResult {
        let mut candidates = vec![];
        if options.preserve_compound {
            candidates.push(SplitCandidate {
                lemma: compound.to_string(),
                parts: vec![],
                kind: CandidateKind::Preserved,
            });
        }
        match options.split_mode {
            SplitMode::Separate => {
                for c in components.iter().filter(|c| !c.unknown) {
                    if candidates.iter().any(|x: &SplitCandidate| x.lemma == c.lemma) {
                        continue;
                    }
                    candidates.push(SplitCandidate {
                        lemma: c.lemma.clone(),
                        parts: vec![],
                        kind: CandidateKind::Component,
                    });
                }
            }
            SplitMode::Combined => {
                let parts: Vec<String> = components.iter().map(|c| c.lemma.clone()).collect();
                candidates.push(SplitCandidate {
                    lemma: parts.join(COMBINED_SEPARATOR),
                    parts,
                    kind: CandidateKind::Combined,
                });
            }
        }
        CompoundSplitResult {
            compound: compound.to_string(),
            components,
            candidates,
        }
    }
}

#[inline(always)]
fn is_valid_stem(stem: &Stem, len: usize, min_stem_len: usize) -> bool {
    (stem.rank.is_some() && len >= min_stem_len) || (stem.in_dictionary && len >= 2)
}

/// Cases `surface` like `like`: capitalized if `like` is, lower-case otherwise.
fn cased_like(surface: &str, like: &str) -> String {
    let lower = surface.to_lowercase();
    if like.chars().next().is_some_and(char::is_uppercase) {
        capitalize_first(&lower)
    } else {
        lower_tail(&lower)
    }
}

fn masked(surface: String, range: Range<usize>) -> Component {
    Component {
        lemma: format!("{UNKNOWN_MARKER}{surface}{UNKNOWN_MARKER}"),
        coverage: range.len(),
        range_char: range,
        surface,
        confidence: 0.0,
        unknown: true,
    }
}

fn merge_leading(component: &mut Component, chars: &[char], fraction: Range<usize>) {
    let prefix: String = chars[fraction.clone()].iter().collect();
    let surface: String = chars[fraction.start..component.range_char.end].iter().collect();
    component.lemma = cased_like(&format!("{prefix}{}", component.lemma), &component.lemma);
    component.coverage += fraction.len();
    component.range_char = fraction.start..component.range_char.end;
    component.surface = surface;
    component.confidence = MERGED_CONFIDENCE;
}

fn merge_trailing(component: &mut Component, chars: &[char], fraction: Range<usize>) {
    let suffix: String = chars[fraction.clone()].iter().collect();
    let surface: String = chars[component.range_char.start..fraction.end].iter().collect();
    component.lemma = cased_like(&format!("{}{suffix}", component.lemma), &component.lemma);
    component.coverage += fraction.len();
    component.range_char = component.range_char.start..fraction.end;
    component.surface = surface;
    component.confidence = MERGED_CONFIDENCE;
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::{PartSingularization, PosFilter};
    use crate::resources::{Dictionary, LemmaIndex, OverrideTable};

    const INDEX: &str = "\
Arbeit,NOUN,Arbeit,300
Platz,NOUN,Platz,500
Plätze,NOUN,Platz,500
Sicherheit,NOUN,Sicherheit,800
Haus,NOUN,Haus,100
Häuser,NOUN,Haus,100
Tür,NOUN,Tür,900
Schlüssel,NOUN,Schlüssel,1500
Bund,NOUN,Bund,2000
Land,NOUN,Land,400
Länder,NOUN,Land,400
Kind,NOUN,Kind,150
Kinder,NOUN,Kind,150
Garten,NOUN,Garten,1200
Arbeitsplatz,NOUN,Arbeitsplatz,3000
laufen,VERB,laufen,600
";

    fn context(dict: &str, rules: &str) -> ResourceContext {
        let index = LemmaIndex::from_reader(INDEX.as_bytes()).unwrap();
        ResourceContext::builder(index)
            .overrides(OverrideTable::from_reader(rules.as_bytes()).unwrap())
            .dictionary(
                crate::common::Language::De,
                Dictionary::from_reader(dict.as_bytes()).unwrap(),
            )
            .build()
            .unwrap()
    }

    fn options() -> GcsOptions {
        GcsOptions::default()
    }

    #[test]
    fn test_fewest_components() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);
        let result = splitter.split("Arbeitsplatzsicherheit", PosTag::Noun, &options(), "");
        assert_eq!(
            vec!["Arbeitsplatz", "Sicherheit"],
            result.component_lemmas().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_linking_morphemes() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);

        let result = splitter.split("Haustürschlüssel", PosTag::Noun, &options(), "");
        assert_eq!(
            vec!["Haus", "Tür", "Schlüssel"],
            result.component_lemmas().collect::<Vec<_>>()
        );

        let result = splitter.split("Bundesländer", PosTag::Noun, &options(), "");
        assert_eq!(vec!["Bund", "Land"], result.component_lemmas().collect::<Vec<_>>());
        assert_eq!(0..4, result.components[0].range_char);
        assert_eq!(6, result.components[0].coverage);
        assert_eq!("länder", result.components[1].surface);

        let result = splitter.split("Kindergarten", PosTag::Noun, &options(), "");
        assert_eq!(vec!["Kind", "Garten"], result.component_lemmas().collect::<Vec<_>>());
    }

    #[test]
    fn test_unsplittable_and_known_words() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);
        for word in ["Sicherheit", "Xylophon", "Haus", "EU-", "NATO"] {
            let result = splitter.split(word, PosTag::Noun, &options(), "");
            assert!(!result.is_split(), "{word}");
            assert_eq!(CandidateKind::Unsplit, result.candidates[0].kind);
            assert_eq!(word, result.candidates[0].lemma);
        }
    }

    #[test]
    fn test_pos_short_circuit() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);
        let options = GcsOptions {
            pos_filter: "!VERB".parse::<PosFilter>().unwrap(),
            ..options()
        };
        let result = splitter.split("Haustür", PosTag::Verb, &options, "");
        assert!(!result.is_split());
        let result = splitter.split("Haustür", PosTag::Noun, &options, "");
        assert!(result.is_split());
    }

    #[test]
    fn test_preserve_and_combined() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);

        let preserve = GcsOptions {
            preserve_compound: true,
            ..options()
        };
        let result = splitter.split("Haustür", PosTag::Noun, &preserve, "");
        let lemmas: Vec<_> = result.candidates.iter().map(|c| c.lemma.as_str()).collect();
        assert_eq!(vec!["Haustür", "Haus", "Tür"], lemmas);
        assert_eq!(CandidateKind::Preserved, result.candidates[0].kind);

        let combined = GcsOptions {
            split_mode: SplitMode::Combined,
            ..options()
        };
        let result = splitter.split("Haustür", PosTag::Noun, &combined, "");
        assert_eq!(1, result.candidates.len());
        assert_eq!("Haus + Tür", result.candidates[0].lemma);
        assert_eq!(vec!["Haus", "Tür"], result.candidates[0].parts);
    }

    #[test]
    fn test_fractions() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);

        let merged = splitter.split("Haustürxy", PosTag::Noun, &options(), "");
        assert_eq!(vec!["Haus", "Türxy"], merged.component_lemmas().collect::<Vec<_>>());
        assert_eq!(MERGED_CONFIDENCE, merged.components[1].confidence);
        assert_eq!(9, merged.components.iter().map(|c| c.coverage).sum::<usize>());

        let skip = GcsOptions {
            skip_merge_fractions: true,
            ..options()
        };
        let dropped = splitter.split("Haustürxy", PosTag::Noun, &skip, "");
        assert_eq!(vec!["Haus", "Tür"], dropped.component_lemmas().collect::<Vec<_>>());

        let leading = splitter.split("Zkinderhaus", PosTag::Noun, &options(), "");
        assert_eq!(vec!["Zkind", "Haus"], leading.component_lemmas().collect::<Vec<_>>());
    }

    #[test]
    fn test_masked_fractions() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);
        let mask = GcsOptions {
            mask_unknown_parts: true,
            ..options()
        };

        let result = splitter.split("Haustürxy", PosTag::Noun, &mask, "");
        assert_eq!(
            vec!["Haus", "Tür", "__xy__"],
            result.component_lemmas().collect::<Vec<_>>()
        );
        assert!(result.components[2].unknown);
        assert_eq!(7..9, result.components[2].range_char);
        let lemmas: Vec<_> = result.candidates.iter().map(|c| c.lemma.as_str()).collect();
        assert_eq!(vec!["Haus", "Tür"], lemmas);

        let combined = GcsOptions {
            split_mode: SplitMode::Combined,
            ..mask
        };
        let result = splitter.split("Zkinderhaus", PosTag::Noun, &combined, "");
        assert_eq!("__Z__ + Kind + Haus", result.candidates[0].lemma);
    }

    #[test]
    fn test_part_singularization() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);

        let result = splitter.split("Bundesländer", PosTag::Noun, &options(), "");
        assert_eq!(vec!["Bund", "Land"], result.component_lemmas().collect::<Vec<_>>());

        let result = splitter.split("Bundesländer", PosTag::Adj, &options(), "");
        assert_eq!(vec!["Bund", "Länder"], result.component_lemmas().collect::<Vec<_>>());

        let all = GcsOptions {
            part_singularization: PartSingularization::All,
            ..options()
        };
        let result = splitter.split("Bundesländer", PosTag::Adj, &all, "");
        assert_eq!(vec!["Bund", "Land"], result.component_lemmas().collect::<Vec<_>>());

        let none = GcsOptions {
            part_singularization: PartSingularization::None,
            ..options()
        };
        let result = splitter.split("Häuser-Garten", PosTag::Noun, &none, "");
        assert_eq!(vec!["Häuser", "Garten"], result.component_lemmas().collect::<Vec<_>>());
    }

    #[test]
    fn test_dictionary_stems_and_overrides() {
        let ctx = context("Ei\tegg\n", "\tPlätze\tPlatz (Sitz)\n");
        let splitter = CompoundSplitter::new(&ctx);

        let result = splitter.split("Eierschalen", PosTag::Noun, &options(), "");
        assert!(!result.is_split());

        let result = splitter.split("Kinderei", PosTag::Noun, &options(), "");
        assert_eq!(vec!["Kind", "Ei"], result.component_lemmas().collect::<Vec<_>>());
        assert_eq!(DICTIONARY_STEM_CONFIDENCE, result.components[1].confidence);

        let result = splitter.split("Hausplätze", PosTag::Noun, &options(), "");
        assert_eq!(vec!["Haus", "Platz (Sitz)"], result.component_lemmas().collect::<Vec<_>>());
    }

    #[test]
    fn test_hyphenated() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);
        let result = splitter.split("Häuser-Garten", PosTag::Noun, &options(), "");
        assert_eq!(vec!["Haus", "Garten"], result.component_lemmas().collect::<Vec<_>>());
        assert_eq!(7..13, result.components[1].range_char);

        let result = splitter.split("E-Mail", PosTag::Noun, &options(), "");
        assert!(!result.is_split());
    }

    #[test]
    fn test_deterministic() {
        let ctx = context("", "");
        let splitter = CompoundSplitter::new(&ctx);
        let first = splitter.split("Kinderhausgarten", PosTag::Noun, &options(), "");
        for _ in 0..10 {
            assert_eq!(first, splitter.split("Kinderhausgarten", PosTag::Noun, &options(), ""));
        }
    }
}
