// Corpus statistics for reporting: keyword occurrences, publication years,
// and frequency ranking.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::warn;

use crate::records::Record;

/// Raw keyword occurrences across records, in first-seen order.
///
/// Records without a `keywords` field contribute nothing.
pub fn keyword_counts(records: &[Record]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for keywords in records.iter().filter_map(Record::keywords) {
        for keyword in keywords {
            *counts.entry(keyword).or_insert(0) += 1;
        }
    }
    counts
}

/// Number of records per publication year. Missing years are skipped
/// silently; malformed ones with a warning.
pub fn year_distribution(records: &[Record]) -> BTreeMap<i32, usize> {
    let mut years = BTreeMap::new();
    for record in records {
        match record.year() {
            Ok(Some(year)) => *years.entry(year).or_insert(0) += 1,
            Ok(None) => {}
            Err(e) => warn!(error = %e, title = record.title().unwrap_or_default(), "Skipping year"),
        }
    }
    years
}

/// Entries with `count >= floor`, most frequent first, first-seen order on
/// ties, at most `limit` of them.
pub fn rank(table: &IndexMap<String, usize>, floor: usize, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = table
        .iter()
        .filter(|&(_, &count)| count >= floor)
        .map(|(k, &count)| (k.clone(), count))
        .collect();
    // Stable sort keeps insertion order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
