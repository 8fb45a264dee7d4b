//! Descriptor abbreviation dictionary.
//!
//! An ordered list of `from → to` substitutions. Order matters in
//! [`Dictionary::expand_text`]: each entry rewrites the output of the
//! previous ones.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DictionaryError, DictionaryResult};
use crate::models::TastingNote;

/// Built-in abbreviations, in application order.
const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    ("wyne", "white wine"),
    ("v.pale", "very pale"),
    ("p.gold", "pale gold"),
    ("o.gold", "old gold"),
    ("f.gold", "full gold"),
    ("p.amber", "pale amber"),
    ("f.amber", "full amber"),
    ("f.sherry", "fino sherry"),
    ("med", "medium"),
    ("aroma", "aromatic"),
    ("peat", "peaty"),
    ("fruit", "fruity"),
    ("grass", "grassy"),
    ("salt", "salty"),
    ("smoke", "smoky"),
    ("spice", "spicy"),
    ("oil", "oily"),
    ("ling", "lingering"),
    ("very", "very long"),
];

/// One abbreviation and its expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

/// Ordered substitution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: Vec<Substitution>,
}

impl Dictionary {
    pub fn new<I, F, T>(entries: I) -> DictionaryResult<Self>
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(from, to)| Substitution { from: from.into(), to: to.into() })
            .collect();
        Self { entries }.validated()
    }

    /// Parse a JSON array of `{"from": .., "to": ..}` objects.
    pub fn from_json(json: &str) -> DictionaryResult<Self> {
        serde_json::from_str::<Self>(json)?.validated()
    }

    pub fn load(path: impl AsRef<Path>) -> DictionaryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn entries(&self) -> &[Substitution] {
        &self.entries
    }

    fn validated(self) -> DictionaryResult<Self> {
        // An empty pattern would match between every character
        match self.entries.iter().position(|e| e.from.is_empty()) {
            Some(index) => Err(DictionaryError::EmptyToken(index)),
            None => Ok(self),
        }
    }

    /// Replace every occurrence of every entry over the whole text, one
    /// entry at a time.
    ///
    /// Matches are plain substrings: `oil` also rewrites `oily` to `oilyy`,
    /// and an expansion can be rewritten again by a later entry.
    pub fn expand_text(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, entry| acc.replace(&entry.from, &entry.to))
    }

    /// Expansion of a token that equals an entry exactly.
    pub fn expand_token(&self, token: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.from == token)
            .map(|entry| entry.to.clone())
    }

    /// Expand the color and every descriptor token of a note in place.
    pub fn expand_note(&self, note: &mut TastingNote) {
        if let Some(color) = note.color.as_mut() {
            if let Some(expanded) = self.expand_token(color) {
                *color = expanded;
            }
        }
        for descriptors in note.descriptors_mut() {
            descriptors.map_tokens(|token| self.expand_token(token));
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES
                .iter()
                .map(|&(from, to)| Substitution { from: from.to_string(), to: to.to_string() })
                .collect(),
        }
    }
}
