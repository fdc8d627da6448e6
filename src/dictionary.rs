/*!
 * Terminology dictionary backed by a JSON file.
 *
 * The file is a flat JSON object mapping a term to its preferred
 * translation. Entry order is preserved across load and save. Saving goes
 * through a temporary file in the same directory that is renamed over the
 * target, so a concurrent reader sees either the old or the new file.
 */

use std::io::Write;
use std::path::Path;

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::errors::InputError;

/// Ordered term -> replacement mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Map<String, Value>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from pairs, keeping their order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut dictionary = Self::new();
        for (term, replacement) in pairs {
            dictionary.insert(term, replacement);
        }
        dictionary
    }

    /// Read the dictionary from disk. Every call reads the file again.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| InputError::DictionaryUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let dictionary = Self::from_json(&content).map_err(|message| InputError::MalformedDictionary {
            path: path.to_path_buf(),
            message,
        })?;

        debug!("Loaded {} dictionary entries from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    /// Parse dictionary JSON; values must all be strings
    pub fn from_json(content: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
        let Value::Object(entries) = value else {
            return Err("expected a JSON object".to_string());
        };

        if let Some((term, _)) = entries.iter().find(|(_, v)| !v.is_string()) {
            return Err(format!("value for '{}' is not a string", term));
        }

        Ok(Self { entries })
    }

    /// Write the dictionary with 4-space indentation, replacing the file atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(self.to_pretty_json()?.as_bytes())?;
        temp.flush()?;
        temp.persist(path)?;

        debug!("Saved {} dictionary entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Human-diffable representation used on disk
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.entries.serialize(&mut serializer)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Compact representation embedded in prompts
    pub fn to_compact_json(&self) -> String {
        Value::Object(self.entries.clone()).to_string()
    }

    /// Add or replace a term; a replaced term keeps its position
    pub fn insert(&mut self, term: impl Into<String>, replacement: impl Into<String>) -> Option<String> {
        self.entries
            .insert(term.into(), Value::String(replacement.into()))
            .and_then(|old| old.as_str().map(str::to_string))
    }

    /// Remove a term, keeping the order of the others
    pub fn remove(&mut self, term: &str) -> Option<String> {
        self.entries
            .shift_remove(term)
            .and_then(|old| old.as_str().map(str::to_string))
    }

    /// Replace every entry with those of `other`, taking its order
    pub fn replace_all(&mut self, other: Dictionary) {
        self.entries = other.entries;
    }

    /// Look up a term
    pub fn get(&self, term: &str) -> Option<&str> {
        self.entries.get(term).and_then(Value::as_str)
    }

    /// Iterate entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
