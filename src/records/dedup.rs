// Corpus-level deduplication.
//
// First-seen wins. Survivors keep their input order. The "seen" sets live in
// an explicit `DedupState` owned by the caller, so repeated or concurrent runs
// never share identity state by accident.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use super::key::{self, CanonicalKey, KeyKind};
use super::Record;

/// The two identity sets consulted during deduplication.
#[derive(Debug, Clone, Default)]
pub struct DedupState {
    seen_dois: HashSet<String>,
    seen_titles: HashSet<String>,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the key as seen. Returns `false` if it had already been seen.
    pub fn insert(&mut self, key: &CanonicalKey) -> bool {
        let set = match key.kind {
            KeyKind::Doi => &mut self.seen_dois,
            KeyKind::Title => &mut self.seen_titles,
        };
        set.insert(key.key.clone())
    }

    /// Resolve the record's key and mark it seen.
    /// Returns `None` for a first occurrence, or the key if it is a duplicate.
    pub fn observe(&mut self, record: &Record) -> Option<CanonicalKey> {
        let key = key::resolve(record);
        if self.insert(&key) {
            None
        } else {
            Some(key)
        }
    }

    /// Number of distinct identities seen so far.
    pub fn len(&self) -> usize {
        self.seen_dois.len() + self.seen_titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of one deduplication pass.
#[derive(Debug, Clone, Serialize)]
pub struct DedupOutcome {
    pub unique: Vec<Record>,
    /// Keys of the dropped records, in the order they were dropped.
    pub duplicates: Vec<CanonicalKey>,
}

impl DedupOutcome {
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }
}

/// Drop every record whose canonical key was already seen, starting from a
/// fresh state.
pub fn dedupe(records: Vec<Record>) -> DedupOutcome {
    let (outcome, _state) = dedupe_with(DedupState::new(), records);
    outcome
}

/// Deduplicate against an existing state and hand the state back, so callers
/// can thread identity across several batches explicitly.
pub fn dedupe_with(mut state: DedupState, records: Vec<Record>) -> (DedupOutcome, DedupState) {
    let before = records.len();
    let mut unique = Vec::with_capacity(before);
    let mut duplicates = Vec::new();

    for record in records {
        match state.observe(&record) {
            None => unique.push(record),
            Some(key) => {
                debug!(key = %key.key, kind = ?key.kind, "Dropping duplicate record");
                duplicates.push(key);
            }
        }
    }

    info!(
        before,
        after = unique.len(),
        duplicates = duplicates.len(),
        "Deduplicated records"
    );

    (DedupOutcome { unique, duplicates }, state)
}

/// Duplicate counts for a consolidation across several export files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateTally {
    pub total: usize,
    pub unique: usize,
    /// Duplicates found in each source, indexed like the input.
    pub per_source: Vec<usize>,
}

impl DuplicateTally {
    pub fn duplicates(&self) -> usize {
        self.total - self.unique
    }
}

/// Consolidate several export files in order, threading one identity state
/// through them. A record duplicating one from an earlier source counts
/// against the later source.
pub fn consolidate_sources(sources: Vec<Vec<Record>>) -> (DedupOutcome, DuplicateTally) {
    let mut state = DedupState::new();
    let mut total = 0;
    let mut per_source = Vec::with_capacity(sources.len());
    let mut merged = DedupOutcome {
        unique: Vec::new(),
        duplicates: Vec::new(),
    };

    for source in sources {
        total += source.len();
        let (outcome, next) = dedupe_with(state, source);
        state = next;
        per_source.push(outcome.duplicate_count());
        merged.unique.extend(outcome.unique);
        merged.duplicates.extend(outcome.duplicates);
    }

    let tally = DuplicateTally {
        total,
        unique: merged.unique.len(),
        per_source,
    };
    (merged, tally)
}
