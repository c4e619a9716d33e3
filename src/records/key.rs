// Canonical key resolution: the single identity rule for records.
//
// DOI wins whenever it is non-empty after trimming; otherwise the trimmed,
// lowercased title is the key. Every identity check in the crate (corpus
// dedup, the chain-local duplicate criterion, cross-source tallies) goes
// through `resolve` so the rule cannot drift between call sites.

use serde::{Deserialize, Serialize};

use super::Record;

/// Which field produced a canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Doi,
    Title,
}

/// The identity of a record within one processing run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalKey {
    pub key: String,
    pub kind: KeyKind,
}

/// Derive the canonical key for a record.
///
/// A record with neither DOI nor title resolves to the empty title key, so all
/// such records collapse onto one identity.
pub fn resolve(record: &Record) -> CanonicalKey {
    let doi = record.doi().map(|d| d.trim().to_lowercase()).unwrap_or_default();
    if !doi.is_empty() {
        return CanonicalKey {
            key: doi,
            kind: KeyKind::Doi,
        };
    }

    CanonicalKey {
        key: record
            .title()
            .map(|t| t.trim().to_lowercase())
            .unwrap_or_default(),
        kind: KeyKind::Title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doi_takes_precedence() {
        let r = Record::new()
            .with("doi", "  10.1/ABC ")
            .with("title", "Some Title");
        assert_eq!(
            resolve(&r),
            CanonicalKey {
                key: "10.1/abc".to_string(),
                kind: KeyKind::Doi
            }
        );
    }

    #[test]
    fn test_blank_doi_falls_back_to_title() {
        let r = Record::new().with("doi", "   ").with("title", " Web3 DAOs ");
        let key = resolve(&r);
        assert_eq!(key.kind, KeyKind::Title);
        assert_eq!(key.key, "web3 daos");
    }

    #[test]
    fn test_empty_record_keys_on_empty_title() {
        let key = resolve(&Record::new());
        assert_eq!(key.kind, KeyKind::Title);
        assert_eq!(key.key, "");
    }
}
