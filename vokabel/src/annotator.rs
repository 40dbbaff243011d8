//! Dictionary glosses.

use crate::common::{capitalize_first, Language};
use crate::resources::ResourceContext;

/// Separator of component glosses of a combined entry.
pub const GLOSS_SEPARATOR: &str = "; ";

/// Best-effort gloss lookup. A missing dictionary or entry is never an error.
pub struct DictionaryAnnotator<'r> {
    ctx: &'r ResourceContext,
}

impl<'r> DictionaryAnnotator<'r> {
    pub fn new(ctx: &'r ResourceContext) -> Self {
        Self { ctx }
    }

    /// Gets the gloss of `lemma`.
    ///
    /// The exact lemma is tried first, then its capitalized and lower-cased
    /// variants. Entries without a gloss are passed over.
    pub fn gloss(&self, lemma: &str, language: Language) -> Option<&'r str> {
        let dict = self.ctx.dictionary(language)?;
        let capitalized = capitalize_first(lemma);
        let lower = lemma.to_lowercase();
        [lemma, capitalized.as_str(), lower.as_str()]
            .into_iter()
            .find_map(|key| dict.get(key).and_then(|entry| entry.gloss.as_deref()))
    }

    /// Gets the glosses of the components of a combined entry, joined.
    ///
    /// Components without a gloss are left out; [`None`] if none has one.
    pub fn gloss_parts<S>(&self, parts: &[S], language: Language) -> Option<String>
    where
        S: AsRef<str>,
    {
        let glosses: Vec<&str> = parts
            .iter()
            .filter_map(|p| self.gloss(p.as_ref(), language))
            .collect();
        if glosses.is_empty() {
            None
        } else {
            Some(glosses.join(GLOSS_SEPARATOR))
        }
    }
}
