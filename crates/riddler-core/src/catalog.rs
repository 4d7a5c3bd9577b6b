use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::preprocess::normalize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Normalized riddle, the lookup key
    pub riddle: String,
    pub answer: String,
}

/// Riddle → answer catalog, read once at startup.
///
/// Keys are normalized riddles. Entries keep the order in which their riddle
/// first appeared in the source; a repeated riddle replaces the answer but
/// not the position.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl CatalogStore {
    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        tracing::info!("Loading catalog from file: {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::FileNotFound(path.display().to_string()),
            _ => LoadError::IoError(e),
        })?;

        let store = Self::from_json(&json)?;
        tracing::info!("Loaded {} catalog entries", store.len());
        Ok(store)
    }

    /// Parse a JSON array of `{"riddle": .., "answers": ..}` records
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let Value::Array(records) = serde_json::from_str::<Value>(json)? else {
            return Err(LoadError::InvalidFormat(
                "expected a JSON array of riddle records".to_string(),
            ));
        };

        let mut store = Self::default();
        let mut skipped = 0usize;

        for (position, record) in records.iter().enumerate() {
            let Value::Object(fields) = record else {
                return Err(LoadError::InvalidFormat(format!(
                    "record {position} is not an object"
                )));
            };

            let riddle = coerce_text(fields.get("riddle"));
            let answer = coerce_text(fields.get("answers"));
            if !store.insert(&riddle, answer) {
                skipped += 1;
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} records with an empty riddle", skipped);
        }

        Ok(store)
    }

    /// Build a catalog from in-memory pairs
    pub fn from_entries<I, R, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, A)>,
        R: AsRef<str>,
        A: Into<String>,
    {
        let mut store = Self::default();
        for (riddle, answer) in pairs {
            store.insert(riddle.as_ref(), answer.into());
        }
        store
    }

    /// Returns false when the riddle normalizes to nothing
    fn insert(&mut self, riddle: &str, answer: String) -> bool {
        let riddle = normalize(riddle);
        if riddle.is_empty() {
            return false;
        }

        match self.index.get(&riddle) {
            Some(&slot) => self.entries[slot].answer = answer,
            None => {
                self.index.insert(riddle.clone(), self.entries.len());
                self.entries.push(CatalogEntry { riddle, answer });
            }
        }
        true
    }

    /// Exact lookup by normalized riddle
    pub fn get(&self, riddle: &str) -> Option<&CatalogEntry> {
        self.index.get(riddle).map(|&slot| &self.entries[slot])
    }

    /// Entries in source order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Text form of a JSON field: strings verbatim, scalars by display form,
/// arrays joined with ", ", missing or null as empty.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| coerce_text(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(object @ Value::Object(_)) => object.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
