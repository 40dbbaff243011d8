//! Optional TOML configuration file.
//!
//! ```toml
//! [resources.de]
//! lemma_index = "de/lemmas.csv"
//! overrides = "de/overrides.tsv"
//! dictionary = "de/glosses.tsv"
//!
//! [input]
//! text1 = "texts/source.txt"
//! text2 = "texts/translation.txt"
//! ```
//!
//! Relative paths are resolved against the directory of the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use vokabel::Language;

use crate::ExtractError;

/// Resource files of one language.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LanguageResources {
    pub lemma_index: Option<PathBuf>,
    pub overrides: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
}

/// Input text files.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InputFiles {
    pub text1: Option<PathBuf>,
    pub text2: Option<PathBuf>,
    pub text3: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Resources keyed by language code.
    pub resources: BTreeMap<String, LanguageResources>,
    pub input: InputFiles,
}

impl ConfigFile {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let content = fs::read_to_string(path).map_err(|source| ExtractError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ExtractError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Gets the resources of a language.
    pub fn resources(&self, language: Language) -> Option<&LanguageResources> {
        self.resources.get(language.code())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        for res in self.resources.values_mut() {
            resolve(&mut res.lemma_index);
            resolve(&mut res.overrides);
            resolve(&mut res.dictionary);
        }
        resolve(&mut self.input.text1);
        resolve(&mut self.input.text2);
        resolve(&mut self.input.text3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vokabel.toml");
        fs::write(
            &path,
            "[resources.de]\nlemma_index = \"de/lemmas.csv\"\ndictionary = \"/abs/de.tsv\"\n\n[input]\ntext1 = \"a.txt\"\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        let de = config.resources(Language::De).unwrap();
        assert_eq!(Some(dir.path().join("de/lemmas.csv")), de.lemma_index);
        assert_eq!(Some(PathBuf::from("/abs/de.tsv")), de.dictionary);
        assert_eq!(None, de.overrides);
        assert_eq!(Some(dir.path().join("a.txt")), config.input.text1);
        assert!(config.resources(Language::En).is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vokabel.toml");
        fs::write(&path, "[resources.de]\nlemma_idx = \"x\"\n").unwrap();
        assert!(matches!(
            ConfigFile::load(&path),
            Err(ExtractError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ConfigFile::load(&dir.path().join("none.toml")),
            Err(ExtractError::ConfigRead { .. })
        ));
    }
}
