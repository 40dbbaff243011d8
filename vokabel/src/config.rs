//! Validated run configuration.
//!
//! [`PipelineConfig`] is built once per run through [`PipelineConfigBuilder`],
//! which rejects invalid flag combinations before any text is processed.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::common::{Language, PosTag};
use crate::errors::{Result, VokabelError};

/// What the pipeline extracts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ExtractionType {
    /// One entry per distinct lemma.
    #[default]
    Word,
    /// One record per sentence, with the sentence's word list.
    Sentence,
}

impl FromStr for ExtractionType {
    type Err = VokabelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "word" => Ok(Self::Word),
            "sentence" => Ok(Self::Sentence),
            _ => Err(VokabelError::invalid_argument(
                "type",
                format!("{s:?} is not one of word, sentence"),
            )),
        }
    }
}

/// Ordering of the assembled vocabulary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OrderMode {
    /// Order of first occurrence in the text.
    #[default]
    FirstSeen,
    /// Most frequent lemmas first, according to the lemma index rank.
    Frequency,
    /// Case-insensitive alphabetical order.
    Alphabetical,
}

impl FromStr for OrderMode {
    type Err = VokabelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first-seen" | "first_seen" => Ok(Self::FirstSeen),
            "frequency" => Ok(Self::Frequency),
            "alphabetical" => Ok(Self::Alphabetical),
            _ => Err(VokabelError::invalid_argument(
                "order",
                format!("{s:?} is not one of first-seen, frequency, alphabetical"),
            )),
        }
    }
}

/// How the components of a split compound are emitted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SplitMode {
    /// One merged entry standing for all components.
    Combined,
    /// Each component is its own vocabulary candidate.
    #[default]
    Separate,
}

impl FromStr for SplitMode {
    type Err = VokabelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "combined" => Ok(Self::Combined),
            "separate" => Ok(Self::Separate),
            _ => Err(VokabelError::invalid_argument(
                "de-gcs-split-mode",
                format!("{s:?} is not one of combined, separate"),
            )),
        }
    }
}

/// Which compound components are reduced to their lemma.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PartSingularization {
    /// Components keep the form they have in the compound.
    None,
    /// Components of nouns and proper nouns only.
    #[default]
    OnlyNouns,
    /// Components of every word.
    All,
}

impl PartSingularization {
    /// Returns `true` if the components of a word tagged `pos` are lemmatized.
    #[inline(always)]
    pub fn applies_to(self, pos: PosTag) -> bool {
        match self {
            Self::None => false,
            Self::OnlyNouns => pos.is_nominal(),
            Self::All => true,
        }
    }
}

impl FromStr for PartSingularization {
    type Err = VokabelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "only-nouns" | "only_nouns" => Ok(Self::OnlyNouns),
            "all" => Ok(Self::All),
            _ => Err(VokabelError::invalid_argument(
                "de-gcs-part-singularization",
                format!("{s:?} is not one of none, only-nouns, all"),
            )),
        }
    }
}

/// How component costs add up along a segmentation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Aggregation {
    /// Sum of the component ranks.
    #[default]
    Sum,
    /// Rank of the rarest component.
    Worst,
}

impl Aggregation {
    #[inline(always)]
    pub(crate) fn combine(self, acc: u64, cost: u64) -> u64 {
        match self {
            Self::Sum => acc.saturating_add(cost),
            Self::Worst => acc.max(cost),
        }
    }
}

/// Scoring parameters of compound segmentation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SplitPolicy {
    /// Minimum length in characters of a stem taken from the lemma index.
    pub min_stem_len: usize,

    /// Words shorter than this are never split.
    pub min_compound_len: usize,

    /// Cost of a stem known only from the dictionary.
    pub dictionary_stem_cost: u32,

    /// Cost added for every linking morpheme.
    pub link_cost: u32,

    /// Cost added for every fraction.
    pub fraction_cost: u32,

    /// Aggregation of component costs.
    pub aggregation: Aggregation,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            min_stem_len: 3,
            min_compound_len: 4,
            dictionary_stem_cost: 500_000,
            link_cost: 1,
            fraction_cost: 1_000_000,
            aggregation: Aggregation::Sum,
        }
    }
}

/// Set of POS tags that compound splitting is applied to.
///
/// Parsed once from strings such as `"NOUN ADJ"`, `"!VERB !AUX"` or `"ALL"`.
/// If any tag is prefixed with `!`, the filter accepts every tag except the
/// negated ones and plain tags are ignored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PosFilter {
    accepted: BTreeSet<PosTag>,
}

impl PosFilter {
    /// Accepts every tag.
    pub fn all() -> Self {
        Self {
            accepted: PosTag::ALL.into_iter().collect(),
        }
    }

    /// Accepts exactly the given tags.
    pub fn only<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = PosTag>,
    {
        Self {
            accepted: tags.into_iter().collect(),
        }
    }

    /// Accepts every tag except the given ones.
    pub fn except<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = PosTag>,
    {
        let excluded: BTreeSet<_> = tags.into_iter().collect();
        Self::only(PosTag::ALL.into_iter().filter(|t| !excluded.contains(t)))
    }

    /// Parses a list of tag arguments.
    ///
    /// Every argument may itself contain several tags separated by white space
    /// or commas.
    ///
    /// # Errors
    ///
    /// [`VokabelError`] is returned when a tag name is unknown or the list is empty.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = vec![];
        for arg in args {
            words.extend(
                arg.as_ref()
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|w| !w.is_empty())
                    .map(str::to_string),
            );
        }
        if words.is_empty() {
            return Err(VokabelError::invalid_argument(
                "de-gcs-pos-tags",
                "at least one POS tag is required",
            ));
        }

        let parse = |w: &str| {
            w.parse::<PosTag>().map_err(|_| {
                VokabelError::invalid_argument("de-gcs-pos-tags", format!("unknown POS tag {w:?}"))
            })
        };

        if words.iter().any(|w| w.starts_with('!')) {
            let mut excluded = vec![];
            for w in words.iter().filter_map(|w| w.strip_prefix('!')) {
                excluded.push(parse(w)?);
            }
            return Ok(Self::except(excluded));
        }
        if words.iter().any(|w| w.eq_ignore_ascii_case("ALL")) {
            return Ok(Self::all());
        }
        let mut accepted = vec![];
        for w in &words {
            accepted.push(parse(w)?);
        }
        Ok(Self::only(accepted))
    }

    /// Returns `true` if compound splitting applies to `tag`.
    #[inline(always)]
    pub fn accepts(&self, tag: PosTag) -> bool {
        self.accepted.contains(&tag)
    }
}

impl Default for PosFilter {
    fn default() -> Self {
        Self::only([PosTag::Noun, PosTag::Propn, PosTag::Adv, PosTag::Adj])
    }
}

impl FromStr for PosFilter {
    type Err = VokabelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_args([s])
    }
}

impl fmt::Display for PosFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<_> = self.accepted.iter().map(|t| t.as_str()).collect();
        f.write_str(&tags.join(" "))
    }
}

/// Options of German compound splitting.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GcsOptions {
    pub pos_filter: PosFilter,
    pub split_mode: SplitMode,

    /// Also emit the unsplit compound, before its components.
    pub preserve_compound: bool,

    /// Drop fractions instead of merging them into a neighbour.
    pub skip_merge_fractions: bool,

    /// Keep fractions as masked components of their own. Masked components
    /// are never emitted as separate candidates.
    pub mask_unknown_parts: bool,

    pub part_singularization: PartSingularization,

    /// List the components of a split word in the sentence word lists.
    /// Otherwise the lists hold the unsplit lemma.
    pub add_parts_to_wordlist: bool,

    pub policy: SplitPolicy,
}

/// Validated configuration of a pipeline run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineConfig {
    pub(crate) extraction_type: ExtractionType,
    pub(crate) language: Language,
    pub(crate) context_size: usize,
    pub(crate) fix_genitive: bool,
    pub(crate) gcs: Option<GcsOptions>,
    pub(crate) order: OrderMode,
    pub(crate) force_noun_capitalization: bool,
    pub(crate) force_proper_noun_capitalization: bool,
}

impl PipelineConfig {
    /// Starts building a configuration for `language`.
    pub fn builder(language: Language) -> PipelineConfigBuilder {
        PipelineConfigBuilder::new(language)
    }

    pub fn extraction_type(&self) -> ExtractionType {
        self.extraction_type
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of sentences attached on each side of an occurrence.
    pub fn context_size(&self) -> usize {
        self.context_size
    }

    pub fn fix_genitive(&self) -> bool {
        self.fix_genitive
    }

    /// Compound splitting options, or [`None`] if splitting is disabled.
    pub fn gcs(&self) -> Option<&GcsOptions> {
        self.gcs.as_ref()
    }

    pub fn order(&self) -> OrderMode {
        self.order
    }

    /// `true` if German noun lemmas are always capitalized.
    pub fn force_noun_capitalization(&self) -> bool {
        self.force_noun_capitalization
    }

    /// `true` if proper noun lemmas are always capitalized.
    pub fn force_proper_noun_capitalization(&self) -> bool {
        self.force_proper_noun_capitalization
    }
}

/// Builder of [`PipelineConfig`].
///
/// # Examples
///
/// ```
/// use vokabel::{Language, PipelineConfig, SplitMode};
///
/// let config = PipelineConfig::builder(Language::De)
///     .gcs(true)
///     .split_mode(SplitMode::Combined)
///     .build()?;
/// assert!(config.gcs().is_some());
///
/// let err = PipelineConfig::builder(Language::En).gcs(true).build();
/// assert!(err.is_err());
/// # Ok::<(), vokabel::errors::VokabelError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PipelineConfigBuilder {
    extraction_type: ExtractionType,
    language: Language,
    context_size: usize,
    fix_genitive: bool,
    gcs: bool,
    pos_filter: PosFilter,
    split_mode: SplitMode,
    preserve_compound: bool,
    skip_merge_fractions: bool,
    mask_unknown_parts: bool,
    part_singularization: PartSingularization,
    add_parts_to_wordlist: bool,
    policy: SplitPolicy,
    order: OrderMode,
    force_noun_capitalization: bool,
    force_proper_noun_capitalization: bool,
}

impl PipelineConfigBuilder {
    fn new(language: Language) -> Self {
        Self {
            extraction_type: ExtractionType::default(),
            language,
            context_size: 0,
            fix_genitive: false,
            gcs: false,
            pos_filter: PosFilter::default(),
            split_mode: SplitMode::default(),
            preserve_compound: false,
            skip_merge_fractions: false,
            mask_unknown_parts: false,
            part_singularization: PartSingularization::default(),
            add_parts_to_wordlist: false,
            policy: SplitPolicy::default(),
            order: OrderMode::default(),
            force_noun_capitalization: false,
            force_proper_noun_capitalization: false,
        }
    }

    pub fn extraction_type(mut self, extraction_type: ExtractionType) -> Self {
        self.extraction_type = extraction_type;
        self
    }

    /// Sets the number of context sentences on each side (0 = no context).
    pub fn context_size(mut self, size: usize) -> Self {
        self.context_size = size;
        self
    }

    pub fn fix_genitive(mut self, yes: bool) -> Self {
        self.fix_genitive = yes;
        self
    }

    /// Enables compound splitting.
    pub fn gcs(mut self, yes: bool) -> Self {
        self.gcs = yes;
        self
    }

    pub fn pos_filter(mut self, filter: PosFilter) -> Self {
        self.pos_filter = filter;
        self
    }

    pub fn split_mode(mut self, mode: SplitMode) -> Self {
        self.split_mode = mode;
        self
    }

    pub fn preserve_compound(mut self, yes: bool) -> Self {
        self.preserve_compound = yes;
        self
    }

    pub fn skip_merge_fractions(mut self, yes: bool) -> Self {
        self.skip_merge_fractions = yes;
        self
    }

    pub fn mask_unknown_parts(mut self, yes: bool) -> Self {
        self.mask_unknown_parts = yes;
        self
    }

    pub fn part_singularization(mut self, mode: PartSingularization) -> Self {
        self.part_singularization = mode;
        self
    }

    pub fn add_parts_to_wordlist(mut self, yes: bool) -> Self {
        self.add_parts_to_wordlist = yes;
        self
    }

    pub fn split_policy(mut self, policy: SplitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn order(mut self, order: OrderMode) -> Self {
        self.order = order;
        self
    }

    pub fn force_noun_capitalization(mut self, yes: bool) -> Self {
        self.force_noun_capitalization = yes;
        self
    }

    pub fn force_proper_noun_capitalization(mut self, yes: bool) -> Self {
        self.force_proper_noun_capitalization = yes;
        self
    }

    /// Validates the flag combination.
    ///
    /// # Errors
    ///
    /// [`VokabelError`] is returned when
    ///
    /// - compound splitting, the genitive fix or noun capitalization is
    ///   requested for a language other than German,
    /// - preserve, skip-merge, masking or word list flags are set without
    ///   compound splitting, or
    /// - the split policy has zero-length thresholds.
    pub fn build(self) -> Result<PipelineConfig> {
        if self.language != Language::De {
            if self.gcs {
                return Err(VokabelError::invalid_argument(
                    "de-gcs",
                    format!("compound splitting requires language de, got {}", self.language),
                ));
            }
            if self.fix_genitive {
                return Err(VokabelError::invalid_argument(
                    "de-fix-genitive",
                    format!("the genitive fix requires language de, got {}", self.language),
                ));
            }
            if self.force_noun_capitalization {
                return Err(VokabelError::invalid_argument(
                    "de-force-noun-capitalization",
                    format!("noun capitalization requires language de, got {}", self.language),
                ));
            }
        }
        if !self.gcs {
            if self.preserve_compound {
                return Err(VokabelError::invalid_argument(
                    "de-gcs-preserve-compound-word",
                    "requires --de-gcs to be enabled",
                ));
            }
            if self.skip_merge_fractions {
                return Err(VokabelError::invalid_argument(
                    "de-gcs-skip-merge-fractions",
                    "requires --de-gcs to be enabled",
                ));
            }
            if self.mask_unknown_parts {
                return Err(VokabelError::invalid_argument(
                    "de-gcs-mask-unknown-parts",
                    "requires --de-gcs to be enabled",
                ));
            }
            if self.add_parts_to_wordlist {
                return Err(VokabelError::invalid_argument(
                    "de-gcs-add-parts-to-wordlist",
                    "requires --de-gcs to be enabled",
                ));
            }
        }
        if self.policy.min_stem_len == 0 || self.policy.min_compound_len < 2 {
            return Err(VokabelError::invalid_argument(
                "split_policy",
                "min_stem_len must be positive and min_compound_len at least 2",
            ));
        }

        let gcs = self.gcs.then(|| GcsOptions {
            pos_filter: self.pos_filter,
            split_mode: self.split_mode,
            preserve_compound: self.preserve_compound,
            skip_merge_fractions: self.skip_merge_fractions,
            mask_unknown_parts: self.mask_unknown_parts,
            part_singularization: self.part_singularization,
            add_parts_to_wordlist: self.add_parts_to_wordlist,
            policy: self.policy,
        });
        Ok(PipelineConfig {
            extraction_type: self.extraction_type,
            language: self.language,
            context_size: self.context_size,
            fix_genitive: self.fix_genitive,
            gcs,
            order: self.order,
            force_noun_capitalization: self.force_noun_capitalization,
            force_proper_noun_capitalization: self.force_proper_noun_capitalization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_filter_inclusion() {
        let filter: PosFilter = "NOUN ADJ".parse().unwrap();
        assert!(filter.accepts(PosTag::Noun));
        assert!(filter.accepts(PosTag::Adj));
        assert!(!filter.accepts(PosTag::Verb));
    }

    #[test]
    fn test_pos_filter_negation_wins() {
        let filter = PosFilter::from_args(["NOUN", "!VERB"]).unwrap();
        assert!(!filter.accepts(PosTag::Verb));
        assert!(filter.accepts(PosTag::Adp));
        assert!(filter.accepts(PosTag::Noun));
    }

    #[test]
    fn test_pos_filter_all_and_errors() {
        let filter: PosFilter = "ALL".parse().unwrap();
        assert!(PosTag::ALL.iter().all(|&t| filter.accepts(t)));
        assert_eq!(
            Some("de-gcs-pos-tags"),
            "NOUN VERBZ".parse::<PosFilter>().unwrap_err().invalid_argument_name()
        );
        assert!(PosFilter::from_args(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_default_pos_filter() {
        assert_eq!("ADJ ADV NOUN PROPN", PosFilter::default().to_string());
    }

    #[test]
    fn test_gcs_requires_german() {
        let err = PipelineConfig::builder(Language::En).gcs(true).build().unwrap_err();
        assert_eq!(Some("de-gcs"), err.invalid_argument_name());
        let err = PipelineConfig::builder(Language::En)
            .fix_genitive(true)
            .build()
            .unwrap_err();
        assert_eq!(Some("de-fix-genitive"), err.invalid_argument_name());
        let err = PipelineConfig::builder(Language::En)
            .force_noun_capitalization(true)
            .build()
            .unwrap_err();
        assert_eq!(Some("de-force-noun-capitalization"), err.invalid_argument_name());
        assert!(PipelineConfig::builder(Language::En)
            .force_proper_noun_capitalization(true)
            .build()
            .is_ok());
    }

    #[test]
    fn test_preserve_requires_gcs() {
        let err = PipelineConfig::builder(Language::De)
            .preserve_compound(true)
            .build()
            .unwrap_err();
        assert_eq!(Some("de-gcs-preserve-compound-word"), err.invalid_argument_name());
        let err = PipelineConfig::builder(Language::De)
            .skip_merge_fractions(true)
            .build()
            .unwrap_err();
        assert_eq!(Some("de-gcs-skip-merge-fractions"), err.invalid_argument_name());
        let err = PipelineConfig::builder(Language::De)
            .mask_unknown_parts(true)
            .build()
            .unwrap_err();
        assert_eq!(Some("de-gcs-mask-unknown-parts"), err.invalid_argument_name());
        let err = PipelineConfig::builder(Language::De)
            .add_parts_to_wordlist(true)
            .build()
            .unwrap_err();
        assert_eq!(Some("de-gcs-add-parts-to-wordlist"), err.invalid_argument_name());
    }

    #[test]
    fn test_part_singularization() {
        let mode: PartSingularization = "only-nouns".parse().unwrap();
        assert_eq!(PartSingularization::default(), mode);
        assert!(mode.applies_to(PosTag::Noun));
        assert!(mode.applies_to(PosTag::Propn));
        assert!(!mode.applies_to(PosTag::Adj));
        assert!(PartSingularization::All.applies_to(PosTag::Adj));
        assert!(!PartSingularization::None.applies_to(PosTag::Noun));
        assert_eq!(
            Some("de-gcs-part-singularization"),
            "some".parse::<PartSingularization>().unwrap_err().invalid_argument_name()
        );
    }

    #[test]
    fn test_build() {
        let config = PipelineConfig::builder(Language::De)
            .gcs(true)
            .preserve_compound(true)
            .context_size(2)
            .build()
            .unwrap();
        let gcs = config.gcs().unwrap();
        assert!(gcs.preserve_compound);
        assert!(!gcs.mask_unknown_parts);
        assert!(!gcs.add_parts_to_wordlist);
        assert_eq!(PartSingularization::OnlyNouns, gcs.part_singularization);
        assert_eq!(SplitMode::Separate, gcs.split_mode);
        assert_eq!(2, config.context_size());
        assert!(PipelineConfig::builder(Language::En).build().unwrap().gcs().is_none());
    }

    #[test]
    fn test_aggregation() {
        assert_eq!(7, Aggregation::Sum.combine(3, 4));
        assert_eq!(4, Aggregation::Worst.combine(3, 4));
    }
}
