// The standard inclusion criteria of a systematic review protocol.
//
// Each one mirrors a single eligibility rule. Field semantics follow the export
// converter: `entry_type` is the entry category, presence of a field counts
// even when its value is empty (Accessible, English).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::traits::Criterion;
use crate::error::Result;
use crate::records::dedup::DedupState;
use crate::records::Record;

const PEER_REVIEWED_TYPES: [&str; 3] = ["article", "inproceedings", "conference"];
const INCOMPLETE_TYPES: [&str; 2] = ["abstract", "preliminary"];

/// Entry category is a peer-reviewed venue type.
pub struct PeerReviewed;

impl Criterion for PeerReviewed {
    fn name(&self) -> &str {
        "peer_reviewed"
    }

    fn admits(&mut self, record: &Record) -> Result<bool> {
        Ok(record
            .entry_type()
            .is_some_and(|t| PEER_REVIEWED_TYPES.contains(&t.as_str())))
    }
}

/// Published within `window_years` of `current_year`.
///
/// A missing year fails; a malformed year fails with `MalformedField`. A year
/// so far out that its age does not fit an `i32` fails.
pub struct Recent {
    pub current_year: i32,
    pub window_years: i32,
}

impl Criterion for Recent {
    fn name(&self) -> &str {
        "recent"
    }

    fn admits(&mut self, record: &Record) -> Result<bool> {
        Ok(record
            .year()?
            .and_then(|year| self.current_year.checked_sub(year))
            .is_some_and(|age| age <= self.window_years))
    }
}

/// Title mentions at least one term of the relevance vocabulary
/// (case-insensitive substring match).
pub struct Relevant {
    terms: Vec<String>,
}

impl Relevant {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Self {
        Self {
            terms: terms
                .iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

impl Criterion for Relevant {
    fn name(&self) -> &str {
        "relevant"
    }

    fn admits(&mut self, record: &Record) -> Result<bool> {
        let title = record.title().unwrap_or_default().to_lowercase();
        Ok(self.terms.iter().any(|term| title.contains(term.as_str())))
    }
}

/// No language field, or the language is English.
pub struct English;

impl Criterion for English {
    fn name(&self) -> &str {
        "english"
    }

    fn admits(&mut self, record: &Record) -> Result<bool> {
        Ok(record
            .get("language")
            .is_none_or(|lang| lang.trim().eq_ignore_ascii_case("english")))
    }
}

/// Chain-local duplicate guard.
///
/// Uses the same canonical key as corpus-level dedup but keeps its own state,
/// scoped to one filter pass. Only records that reach this criterion are
/// remembered, so its verdict depends on where it sits in the chain.
#[derive(Default)]
pub struct NotDuplicate {
    state: DedupState,
}

impl Criterion for NotDuplicate {
    fn name(&self) -> &str {
        "not_duplicate"
    }

    fn admits(&mut self, record: &Record) -> Result<bool> {
        Ok(self.state.observe(record).is_none())
    }

    fn reset(&mut self) {
        self.state = DedupState::new();
    }
}

/// Has a `url` or a `doi` field.
pub struct Accessible;

impl Criterion for Accessible {
    fn name(&self) -> &str {
        "accessible"
    }

    fn admits(&mut self, record: &Record) -> Result<bool> {
        Ok(record.has("url") || record.has("doi"))
    }
}

/// Not an abstract-only or preliminary entry.
pub struct Complete;

impl Criterion for Complete {
    fn name(&self) -> &str {
        "complete"
    }

    fn admits(&mut self, record: &Record) -> Result<bool> {
        Ok(record
            .entry_type()
            .is_none_or(|t| !INCOMPLETE_TYPES.contains(&t.as_str())))
    }
}

/// Names of the built-in criteria, used to assemble chains from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    PeerReviewed,
    Recent,
    Relevant,
    English,
    NotDuplicate,
    Accessible,
    Complete,
}

impl CriterionKind {
    /// The protocol order used when nothing else is configured.
    pub const STANDARD: [CriterionKind; 7] = [
        CriterionKind::PeerReviewed,
        CriterionKind::Recent,
        CriterionKind::Relevant,
        CriterionKind::English,
        CriterionKind::NotDuplicate,
        CriterionKind::Accessible,
        CriterionKind::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionKind::PeerReviewed => "peer_reviewed",
            CriterionKind::Recent => "recent",
            CriterionKind::Relevant => "relevant",
            CriterionKind::English => "english",
            CriterionKind::NotDuplicate => "not_duplicate",
            CriterionKind::Accessible => "accessible",
            CriterionKind::Complete => "complete",
        }
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CriterionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        CriterionKind::STANDARD
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown criterion `{s}`"))
    }
}
