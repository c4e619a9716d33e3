// What to do with cluster labels once documents have them.
//
// Labels carry no ordering meaning; the maps below are keyed by label only so
// output is stable within one run.

use std::collections::BTreeMap;

use super::tfidf::FeatureMatrix;
use crate::records::Record;

/// Describe each cluster by the terms with the highest mean TF-IDF weight
/// among its member documents.
///
/// Every label in `0..k` gets an entry, possibly empty. Terms with zero mean
/// weight are left out; ties are broken lexically.
pub fn cluster_terms(
    matrix: &FeatureMatrix,
    labels: &[usize],
    k: usize,
    top_n: usize,
) -> BTreeMap<usize, Vec<String>> {
    let d = matrix.n_terms();
    let mut sums = vec![vec![0.0; d]; k];
    let mut counts = vec![0usize; k];

    for (row, &label) in matrix.rows.iter().zip(labels) {
        if label >= k {
            continue;
        }
        counts[label] += 1;
        for (s, &w) in sums[label].iter_mut().zip(row) {
            *s += w;
        }
    }

    (0..k)
        .map(|label| {
            let mut scored: Vec<(usize, f64)> = sums[label]
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s > 0.0)
                .map(|(j, &s)| (j, s / counts[label].max(1) as f64))
                .collect();
            // Columns are lexically ordered, so index order breaks ties lexically
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            let terms = scored
                .into_iter()
                .take(top_n)
                .map(|(j, _)| matrix.terms[j].clone())
                .collect();
            (label, terms)
        })
        .collect()
}

/// Bucket records by label, keeping input order within each bucket.
/// Every label in `0..k` gets an entry.
pub fn group_by_cluster(records: &[Record], labels: &[usize], k: usize) -> BTreeMap<usize, Vec<Record>> {
    let mut groups: BTreeMap<usize, Vec<Record>> = (0..k).map(|l| (l, Vec::new())).collect();
    for (record, &label) in records.iter().zip(labels) {
        groups.entry(label).or_default().push(record.clone());
    }
    groups
}

/// Records whose abstract mentions `keyword` (case-insensitive), concatenated
/// cluster by cluster in label order.
pub fn trace_by_keyword(records: &[Record], labels: &[usize], keyword: &str, k: usize) -> Vec<Record> {
    let needle = keyword.to_lowercase();
    group_by_cluster(records, labels, k)
        .into_values()
        .flatten()
        .filter(|r| {
            r.abstract_text()
                .is_some_and(|a| a.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_terms_rank_by_mean_weight() {
        let m = FeatureMatrix {
            terms: vec!["alpha".into(), "beta".into(), "gamma".into()],
            rows: vec![
                vec![0.9, 0.1, 0.0],
                vec![0.7, 0.3, 0.0],
                vec![0.0, 0.2, 0.8],
            ],
        };
        let terms = cluster_terms(&m, &[0, 0, 1], 3, 5);
        assert_eq!(terms[&0], vec!["alpha", "beta"]);
        assert_eq!(terms[&1], vec!["gamma", "beta"]);
        assert!(terms[&2].is_empty());
    }

    #[test]
    fn test_cluster_terms_ties_break_lexically() {
        let m = FeatureMatrix {
            terms: vec!["a".into(), "b".into()],
            rows: vec![vec![0.5, 0.5]],
        };
        assert_eq!(cluster_terms(&m, &[0], 1, 1)[&0], vec!["a"]);
    }

    #[test]
    fn test_trace_orders_by_cluster() {
        let records = vec![
            Record::new().with("title", "1").with("abstract", "Security and Privacy in DAOs"),
            Record::new().with("title", "2").with("abstract", "unrelated"),
            Record::new().with("title", "3").with("abstract", "security and privacy again"),
        ];
        let traced = trace_by_keyword(&records, &[1, 0, 0], "security and privacy", 2);
        let titles: Vec<_> = traced.iter().filter_map(|r| r.title()).collect();
        assert_eq!(titles, vec!["3", "1"]);
    }
}
