//! Lemma resolution.
//!
//! A [`LemmaResolver`] holds an ordered list of [`LemmaStrategy`] objects and
//! returns the answer of the first one that knows the word. The default list
//! is override rules, then the lemma index, then the word itself.

use crate::common::{has_internal_caps, is_all_caps, PosTag};
use crate::resources::ResourceContext;

/// How much a resolved lemma can be trusted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Confidence {
    /// The word itself, nothing better was found.
    Low,
    /// Index entry of another or unknown POS.
    Medium,
    /// Index entry with exactly the token's POS.
    High,
    /// User override.
    Forced,
}

/// A word to resolve.
#[derive(Clone, Copy, Debug)]
pub struct LemmaQuery<'q> {
    /// Surface form as written in the text.
    pub surface: &'q str,

    /// Form used for the index lookup, e.g. after the genitive fix.
    pub form: &'q str,

    pub pos: PosTag,

    /// Sentence the word occurs in.
    pub sentence: &'q str,

    /// `true` if the word starts its sentence.
    pub sentence_start: bool,
}

impl<'q> LemmaQuery<'q> {
    /// Creates a query whose lookup form is the surface itself.
    pub fn new(surface: &'q str, pos: PosTag) -> Self {
        Self {
            surface,
            form: surface,
            pos,
            sentence: "",
            sentence_start: false,
        }
    }

    pub fn form(mut self, form: &'q str) -> Self {
        self.form = form;
        self
    }

    pub fn sentence(mut self, sentence: &'q str, sentence_start: bool) -> Self {
        self.sentence = sentence;
        self.sentence_start = sentence_start;
        self
    }
}

/// Result of a resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    pub lemma: String,

    /// POS of the token, refined by the index when the tokenizer did not know it.
    pub pos: PosTag,

    /// Name of the strategy that produced the lemma.
    pub source: &'static str,

    pub confidence: Confidence,
}

/// A source of lemmas.
pub trait LemmaStrategy: Send + Sync {
    /// Short name used in logs and [`Resolution::source`].
    fn name(&self) -> &'static str;

    /// Resolves the query, or returns [`None`] to pass it on to the next strategy.
    fn resolve(&self, query: &LemmaQuery, ctx: &ResourceContext) -> Option<Resolution>;
}

/// User override rules.
pub struct OverrideStrategy;

impl LemmaStrategy for OverrideStrategy {
    fn name(&self) -> &'static str {
        "override"
    }

    fn resolve(&self, query: &LemmaQuery, ctx: &ResourceContext) -> Option<Resolution> {
        if ctx.overrides().is_empty() {
            return None;
        }
        let provisional = IndexStrategy.resolve(query, ctx);
        let lemma = provisional.as_ref().map_or(query.form, |r| r.lemma.as_str());
        let target = ctx.overrides().lookup(lemma, query.surface, query.sentence)?;
        Some(Resolution {
            lemma: target.to_string(),
            pos: provisional.map_or(query.pos, |r| r.pos),
            source: self.name(),
            confidence: Confidence::Forced,
        })
    }
}

/// Lookup in the lemma index.
pub struct IndexStrategy;

impl LemmaStrategy for IndexStrategy {
    fn name(&self) -> &'static str {
        "index"
    }

    fn resolve(&self, query: &LemmaQuery, ctx: &ResourceContext) -> Option<Resolution> {
        let index = ctx.index();
        let found = index.lookup(query.form, query.pos).or_else(|| {
            if query.sentence_start {
                index.lookup(&query.form.to_lowercase(), query.pos)
            } else {
                None
            }
        })?;
        Some(Resolution {
            lemma: found.entry.lemma.clone(),
            pos: if query.pos.is_unknown() {
                found.entry.pos.unwrap_or(query.pos)
            } else {
                query.pos
            },
            source: self.name(),
            confidence: if found.exact_pos {
                Confidence::High
            } else {
                Confidence::Medium
            },
        })
    }
}

/// The word itself.
///
/// A sentence-initial word that is not a noun loses its capital, unless it is
/// written in capitals or has capitals inside.
pub struct IdentityStrategy;

impl IdentityStrategy {
    fn lemma(query: &LemmaQuery) -> String {
        let form = query.form;
        if query.sentence_start
            && !query.pos.is_nominal()
            && form.chars().count() > 1
            && !is_all_caps(form)
            && !has_internal_caps(form)
        {
            form.to_lowercase()
        } else {
            form.to_string()
        }
    }

    fn resolution(&self, query: &LemmaQuery) -> Resolution {
        Resolution {
            lemma: Self::lemma(query),
            pos: query.pos,
            source: self.name(),
            confidence: Confidence::Low,
        }
    }
}

impl LemmaStrategy for IdentityStrategy {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn resolve(&self, query: &LemmaQuery, _ctx: &ResourceContext) -> Option<Resolution> {
        Some(self.resolution(query))
    }
}

/// Resolver trying its strategies in order.
pub struct LemmaResolver {
    strategies: Vec<Box<dyn LemmaStrategy>>,
}

impl Default for LemmaResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LemmaResolver {
    /// Creates a resolver with override, index and identity strategies.
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(OverrideStrategy),
            Box::new(IndexStrategy),
            Box::new(IdentityStrategy),
        ])
    }

    /// Creates a resolver with custom strategies.
    ///
    /// If no strategy answers, the word itself is returned.
    pub fn with_strategies(strategies: Vec<Box<dyn LemmaStrategy>>) -> Self {
        Self { strategies }
    }

    /// Resolves a word.
    pub fn resolve(&self, query: &LemmaQuery, ctx: &ResourceContext) -> Resolution {
        for strategy in &self.strategies {
            if let Some(resolution) = strategy.resolve(query, ctx) {
                log::trace!(
                    "{:?} -> {:?} ({})",
                    query.surface,
                    resolution.lemma,
                    resolution.source
                );
                return resolution;
            }
        }
        IdentityStrategy.resolution(query)
    }

    /// Names of the strategies, in order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}
