//! User-supplied lemma overrides.
//!
//! Each line of an override file is
//! `ResultLemma<TAB>OriginalWord<TAB>TargetLemma[<TAB>Context]`. Column 2 and
//! column 4 accept a `regex:` prefix. A rule is keyed by the provisional
//! lemma, the surface word, or both, and rules fall into five buckets that
//! are tried in order:
//!
//! 1. exact (lemma, word),
//! 2. lemma with a word regex,
//! 3. exact word,
//! 4. word regex,
//! 5. lemma only.
//!
//! In the exact buckets, rules with a context condition are tried before the
//! unconditional one. Regex buckets are scanned in file order.

use std::io::Read;

use hashbrown::HashMap;
use regex::Regex;

use crate::errors::Result;
use crate::utils::read_resource_lines;

const REGEX_PREFIX: &str = "regex:";

/// An override line as written in the file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawOverride {
    pub result_lemma: String,
    pub original_word: String,
    pub target_lemma: String,
    pub context: Option<String>,
}

/// Condition on the sentence a word occurs in.
#[derive(Clone, Debug)]
pub enum ContextCondition {
    Substring(String),
    Regex(Regex),
}

impl ContextCondition {
    fn parse(raw: &str) -> Result<Self, regex::Error> {
        match raw.strip_prefix(REGEX_PREFIX) {
            Some(pattern) => Ok(Self::Regex(Regex::new(pattern)?)),
            None => Ok(Self::Substring(raw.trim().to_string())),
        }
    }

    fn matches(&self, sentence: &str) -> bool {
        match self {
            Self::Substring(s) => sentence.contains(s.as_str()),
            Self::Regex(re) => re.is_match(sentence),
        }
    }
}

/// The replacement part of a rule.
#[derive(Clone, Debug)]
pub struct OverrideRule {
    pub target: String,
    pub condition: Option<ContextCondition>,
}

impl OverrideRule {
    fn applies(&self, sentence: &str) -> bool {
        self.condition.as_ref().is_none_or(|c| c.matches(sentence))
    }
}

/// Picks the first conditional rule that matches, else the unconditional one.
fn select<'a>(rules: Option<&'a Vec<OverrideRule>>, sentence: &str) -> Option<&'a str> {
    let rules = rules?;
    rules
        .iter()
        .filter(|r| r.condition.is_some())
        .find(|r| r.applies(sentence))
        .or_else(|| rules.iter().find(|r| r.condition.is_none()))
        .map(|r| r.target.as_str())
}

/// Compiled override rules.
#[derive(Clone, Debug, Default)]
pub struct OverrideTable {
    lemma_word: HashMap<String, HashMap<String, Vec<OverrideRule>>>,
    lemma_word_regex: Vec<(String, Regex, OverrideRule)>,
    word: HashMap<String, Vec<OverrideRule>>,
    word_regex: Vec<(Regex, OverrideRule)>,
    lemma: HashMap<String, Vec<OverrideRule>>,
    raw: Vec<RawOverride>,
}

impl OverrideTable {
    /// Compiles raw rules.
    ///
    /// Rules with an invalid regex or without a key are skipped with a warning.
    pub fn from_raw<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = RawOverride>,
    {
        let mut table = Self::default();
        for raw in rules {
            if table.add(&raw) {
                table.raw.push(raw);
            }
        }
        log::info!("loaded {} lemma override rules", table.raw.len());
        table
    }

    fn add(&mut self, raw: &RawOverride) -> bool {
        let lemma = raw.result_lemma.trim();
        let word_regex = raw.original_word.strip_prefix(REGEX_PREFIX);
        let word = raw.original_word.trim();
        let target = raw.target_lemma.trim();
        if target.is_empty() || (lemma.is_empty() && word.is_empty()) {
            log::warn!(
                "skipping override for {:?}: a target and a lemma or word are required",
                raw.original_word
            );
            return false;
        }

        let condition = match raw.context.as_deref().filter(|c| !c.is_empty()) {
            Some(c) => match ContextCondition::parse(c) {
                Ok(cond) => Some(cond),
                Err(e) => {
                    log::warn!("skipping override with invalid context regex {c:?}: {e}");
                    return false;
                }
            },
            None => None,
        };
        let rule = OverrideRule {
            target: target.to_string(),
            condition,
        };

        let word_regex = match word_regex {
            Some(pattern) => match Regex::new(&format!("^(?:{pattern})$")) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("skipping override with invalid word regex {pattern:?}: {e}");
                    return false;
                }
            },
            None => None,
        };

        match (lemma.is_empty(), word.is_empty(), word_regex) {
            (false, false, Some(re)) => {
                self.lemma_word_regex.push((lemma.to_string(), re, rule));
            }
            (false, false, None) => {
                self.lemma_word
                    .entry(lemma.to_string())
                    .or_default()
                    .entry(word.to_string())
                    .or_default()
                    .push(rule);
            }
            (true, _, Some(re)) => self.word_regex.push((re, rule)),
            (true, _, None) => self.word.entry(word.to_string()).or_default().push(rule),
            (false, true, _) => self.lemma.entry(lemma.to_string()).or_default().push(rule),
        }
        true
    }

    /// Reads a tab-separated override file.
    ///
    /// Malformed lines are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`VokabelError`](crate::errors::VokabelError) is returned only when
    /// the input cannot be read.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut rules = vec![];
        for line in read_resource_lines(rdr)? {
            let cols: Vec<&str> = line.text.split('\t').collect();
            if cols.len() < 3 {
                log::warn!(
                    "skipping malformed override line {}: expected at least 3 columns",
                    line.number
                );
                continue;
            }
            rules.push(RawOverride {
                result_lemma: cols[0].to_string(),
                original_word: cols[1].to_string(),
                target_lemma: cols[2].to_string(),
                context: cols.get(3).map(|c| c.to_string()),
            });
        }
        Ok(Self::from_raw(rules))
    }

    /// Finds the forced lemma of a word.
    ///
    /// # Arguments
    ///
    /// * `lemma` - Provisional lemma of the word.
    /// * `word` - Surface form of the word.
    /// * `sentence` - Sentence the word occurs in.
    pub fn lookup(&self, lemma: &str, word: &str, sentence: &str) -> Option<&str> {
        self.resolve(lemma, word, word, sentence)
    }

    /// Finds the forced lemma of a compound component.
    ///
    /// Rules keyed by (lemma, word) match against the whole compound, while
    /// word-only rules match against the component.
    pub fn lookup_part(
        &self,
        part_lemma: &str,
        part: &str,
        compound: &str,
        sentence: &str,
    ) -> Option<&str> {
        self.resolve(part_lemma, compound, part, sentence)
    }

    fn resolve(
        &self,
        lemma: &str,
        pair_word: &str,
        word: &str,
        sentence: &str,
    ) -> Option<&str> {
        if let Some(target) = select(
            self.lemma_word.get(lemma).and_then(|m| m.get(pair_word)),
            sentence,
        ) {
            return Some(target);
        }
        if let Some((_, _, rule)) = self
            .lemma_word_regex
            .iter()
            .find(|(l, re, rule)| l == lemma && re.is_match(pair_word) && rule.applies(sentence))
        {
            return Some(rule.target.as_str());
        }
        if let Some(target) = select(self.word.get(word), sentence) {
            return Some(target);
        }
        if let Some((_, rule)) = self
            .word_regex
            .iter()
            .find(|(re, rule)| re.is_match(word) && rule.applies(sentence))
        {
            return Some(rule.target.as_str());
        }
        select(self.lemma.get(lemma), sentence)
    }

    /// Gets the accepted rules as written in the file.
    pub fn raw_rules(&self) -> &[RawOverride] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
# ResultLemma\tOriginalWord\tTargetLemma\tContext
Arbeitsplatzsicherheit\tArbeitsplatzsicherheit\tSicherheit
\tBank\tBank (Geldinstitut)\tGeld
\tBank\tBank (Sitzgelegenheit)
\tregex:Bänke?n?\tBank (Möbel)\tregex:\\bsitzen\\b
Bank\t\tBank (allgemein)
gehen\tregex:ging(st|en|t)?\tgehen (Vergangenheit)
nur zwei
\tregex:[unclosed\tX
";

    #[test]
    fn test_from_reader_skips_bad_lines() {
        let table = OverrideTable::from_reader(RULES.as_bytes()).unwrap();
        assert_eq!(6, table.len());
    }

    #[test]
    fn test_precedence() {
        let table = OverrideTable::from_reader(RULES.as_bytes()).unwrap();
        assert_eq!(
            Some("Sicherheit"),
            table.lookup(
                "Arbeitsplatzsicherheit",
                "Arbeitsplatzsicherheit",
                "Die Arbeitsplatzsicherheit steigt."
            )
        );
        // Conditional rules are tried first, the unconditional one is the fallback.
        assert_eq!(
            Some("Bank (Geldinstitut)"),
            table.lookup("Bank", "Bank", "Ich bringe Geld zur Bank.")
        );
        assert_eq!(
            Some("Bank (Sitzgelegenheit)"),
            table.lookup("Bank", "Bank", "Die Bank ist grün.")
        );
        // The word regex only applies with a matching context.
        assert_eq!(
            Some("Bank (Möbel)"),
            table.lookup("Bank", "Bänke", "Wir sitzen auf Bänke.")
        );
        assert_eq!(
            Some("Bank (allgemein)"),
            table.lookup("Bank", "Bänke", "Die Bänke sind neu.")
        );
        assert_eq!(
            Some("gehen (Vergangenheit)"),
            table.lookup("gehen", "gingen", "Sie gingen.")
        );
        assert_eq!(None, table.lookup("gehen", "gehst", "Du gehst."));
    }

    #[test]
    fn test_lookup_part() {
        let table = OverrideTable::from_reader(RULES.as_bytes()).unwrap();
        assert_eq!(
            Some("Bank (Sitzgelegenheit)"),
            table.lookup_part("Bank", "Bank", "Parkbank", "Eine Parkbank.")
        );
        assert_eq!(None, table.lookup_part("Park", "Park", "Parkbank", "Eine Parkbank."));
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let table = OverrideTable::from_reader(RULES.as_bytes()).unwrap();
        let first = table.lookup("Bank", "Bank", "Die Bank.");
        assert_eq!(first, table.lookup("Bank", "Bank", "Die Bank."));
    }
}
