//! Translation catalogs
//!
//! A catalog maps content-derived keys to entries and is stored as one JSON object
//! per locale, `<dir>/<locale>.json`.

use crate::config::LocalizeConfig;
use crate::error::{LocalizeError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Where the text was found, usually a file path.
    #[serde(default)]
    pub description: String,
    pub text: String,
}

impl TranslationEntry {
    pub fn new(description: impl Into<String>, text: impl Into<String>) -> Self {
        TranslationEntry {
            description: description.into(),
            text: text.into(),
        }
    }
}

/// Key → entry, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations {
    entries: IndexMap<String, TranslationEntry>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TranslationEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TranslationEntry)> {
        self.entries.iter()
    }

    /// Insert without checks; an existing key is overwritten in place.
    pub fn insert(&mut self, key: impl Into<String>, entry: TranslationEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Insert with last-write-wins. Two different texts under one key is a
    /// collision, reported through `config`.
    pub fn merge_entry(
        &mut self,
        key: String,
        entry: TranslationEntry,
        config: &LocalizeConfig,
    ) -> Result<()> {
        if let Some(existing) = self.entries.get(&key) {
            if existing.text != entry.text {
                config.violation(LocalizeError::KeyCollision {
                    key: key.clone(),
                    existing: existing.text.clone(),
                    incoming: entry.text.clone(),
                })?;
            }
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    pub fn merge(&mut self, other: Translations, config: &LocalizeConfig) -> Result<()> {
        for (key, entry) in other.entries {
            self.merge_entry(key, entry, config)?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromIterator<(String, TranslationEntry)> for Translations {
    fn from_iter<I: IntoIterator<Item = (String, TranslationEntry)>>(iter: I) -> Self {
        Translations {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Translations {
    type Item = (String, TranslationEntry);
    type IntoIter = indexmap::map::IntoIter<String, TranslationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Source of catalogs for the runtime lookup.
pub trait CatalogLoader: Send + Sync {
    /// `Ok(None)` when no catalog exists for `locale`.
    fn load(&self, locale: &str) -> Result<Option<Translations>>;
}

/// Reads `<root>/<locale>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryLoader { root: root.into() }
    }

    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.root.join(format!("{}.json", locale))
    }
}

impl CatalogLoader for DirectoryLoader {
    fn load(&self, locale: &str) -> Result<Option<Translations>> {
        let path = self.path_for(locale);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no catalog for locale");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        Translations::from_json(&json).map(Some)
    }
}
