// Bibliographic records and record identity.
//
// A record is whatever the export converter produced: an ordered map of field
// name to string value. The core never mutates a record; every stage returns
// new collections.

pub mod dedup;
pub mod key;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// One bibliographic entry, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter, used when assembling records by hand.
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.fields.insert(field.to_string(), value.to_string());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Whether the field is present at all, even if its value is empty.
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn doi(&self) -> Option<&str> {
        self.get("doi")
    }

    /// The abstract, if present and not blank.
    pub fn abstract_text(&self) -> Option<&str> {
        self.get("abstract").filter(|a| !a.trim().is_empty())
    }

    /// Entry category (article, inproceedings, ...), lowercased.
    pub fn entry_type(&self) -> Option<String> {
        self.get("entry_type").map(|t| t.trim().to_lowercase())
    }

    /// Publication year.
    ///
    /// `Ok(None)` when the field is absent; `MalformedField` when it is present
    /// but not an integer.
    pub fn year(&self) -> Result<Option<i32>> {
        let Some(raw) = self.get("year") else {
            return Ok(None);
        };
        raw.trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| CoreError::MalformedField {
                field: "year".to_string(),
                value: raw.to_string(),
            })
    }

    /// Author keywords: comma-separated, trimmed, lowercased, blanks dropped.
    pub fn keywords(&self) -> Option<Vec<String>> {
        let raw = self.get("keywords")?;
        Some(
            raw.split(',')
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
