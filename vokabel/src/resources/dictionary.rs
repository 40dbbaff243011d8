//! Bilingual glossary of headwords.
//!
//! A dictionary file has one headword per line, optionally followed by a tab
//! and the gloss. A bare headword is a known word without a gloss.

use std::io::Read;

use hashbrown::HashMap;

use crate::errors::Result;
use crate::utils::read_resource_lines;

/// A headword with its optional gloss.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DictionaryEntry {
    pub headword: String,
    pub gloss: Option<String>,
}

/// Glossary of one language.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    map: HashMap<String, u32>,
}

impl Dictionary {
    /// Builds a dictionary. The first entry of a headword wins.
    ///
    /// # Errors
    ///
    /// [`VokabelError`](crate::errors::VokabelError) is returned when the
    /// number of entries exceeds [`u32::MAX`].
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = DictionaryEntry>,
    {
        let mut dict = Self::default();
        for entry in entries {
            if entry.headword.is_empty() || dict.map.contains_key(&entry.headword) {
                continue;
            }
            dict.map
                .insert(entry.headword.clone(), u32::try_from(dict.entries.len())?);
            dict.entries.push(entry);
        }
        Ok(dict)
    }

    /// Reads a dictionary file.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut entries = vec![];
        for line in read_resource_lines(rdr)? {
            let (headword, gloss) = match line.text.split_once('\t') {
                Some((h, g)) => (h, Some(g.trim())),
                None => (line.text.as_str(), None),
            };
            entries.push(DictionaryEntry {
                headword: headword.trim().to_string(),
                gloss: gloss.filter(|g| !g.is_empty()).map(str::to_string),
            });
        }
        Self::from_entries(entries)
    }

    /// Gets the entry of `headword`.
    pub fn get(&self, headword: &str) -> Option<&DictionaryEntry> {
        self.map
            .get(headword)
            .map(|&i| &self.entries[i as usize])
    }

    pub fn contains(&self, headword: &str) -> bool {
        self.map.contains_key(headword)
    }

    /// Gets all entries in file order.
    pub fn entries(&self) -> &[DictionaryEntry] {
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

    #[test]
    fn test_from_reader() {
        let dict =
            Dictionary::from_reader("Arbeit\twork\nPlatz\tplace; square\nSicherheit\nArbeit\tlabour\n".as_bytes())
                .unwrap();
        assert_eq!(3, dict.len());
        assert_eq!(Some("work"), dict.get("Arbeit").unwrap().gloss.as_deref());
        assert_eq!(None, dict.get("Sicherheit").unwrap().gloss);
        assert!(dict.contains("Platz"));
        assert!(dict.get("Haus").is_none());
    }

    #[test]
    fn test_empty_gloss_is_none() {
        let dict = Dictionary::from_reader("Haus\t  \n".as_bytes()).unwrap();
        assert_eq!(None, dict.get("Haus").unwrap().gloss);
    }
}
