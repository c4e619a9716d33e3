// Report types produced by a pipeline run.
//
// Everything here is plain data for a sink to render or persist; nothing in
// the core decides how it is displayed.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::clustering::reduce::Point;
use crate::clustering::tfidf::FeatureMatrix;
use crate::filter::Rejection;
use crate::lexicon::normalize::KeywordBucket;
use crate::records::key::CanonicalKey;
use crate::records::Record;

/// Record counts after each major stage, so data loss is auditable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub raw: usize,
    pub deduplicated: usize,
    pub filtered: usize,
    pub clustered: usize,
}

/// Records left out of a derived computation without failing the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    /// Filtered records with no abstract (not clustered, no n-grams)
    pub missing_abstract: usize,
    /// Filtered records with no keywords field
    pub missing_keywords: usize,
    /// Records rejected by a criterion because a field was malformed
    pub malformed_fields: usize,
}

/// The clustering path's products.
#[derive(Debug, Clone, Serialize)]
pub struct Clustering {
    /// Records that had an abstract, in the order they were clustered
    pub documents: Vec<Record>,
    #[serde(skip)]
    pub matrix: FeatureMatrix,
    pub reduced: Vec<Point>,
    /// One label per document
    pub labels: Vec<usize>,
    /// Top terms per label
    pub terms: BTreeMap<usize, Vec<String>>,
    pub k: usize,
}

impl Clustering {
    /// Number of documents per label, every label in `0..k` included.
    pub fn sizes(&self) -> BTreeMap<usize, usize> {
        let mut sizes: BTreeMap<usize, usize> = (0..self.k).map(|l| (l, 0)).collect();
        for &label in &self.labels {
            *sizes.entry(label).or_insert(0) += 1;
        }
        sizes
    }
}

/// Keyword, n-gram and year summaries of a record set.
#[derive(Debug, Clone, Serialize)]
pub struct LexicalSummary {
    /// Merged keyword counts, keyed by bucket representative
    pub keywords: IndexMap<String, usize>,
    pub keyword_buckets: Vec<KeywordBucket>,
    /// N-grams at or above the frequency floor, most frequent first
    pub ngrams: IndexMap<String, usize>,
    pub years: BTreeMap<i32, usize>,
    pub missing_keywords: usize,
    pub missing_abstract: usize,
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub counts: StageCounts,
    pub skips: SkipCounts,
    pub duplicates: Vec<CanonicalKey>,
    pub rejections_by_criterion: IndexMap<String, usize>,
    #[serde(skip)]
    pub rejected: Vec<Rejection>,
    /// Records that passed dedup and every criterion
    pub records: Vec<Record>,
    pub clustering: Clustering,
    pub summary: LexicalSummary,
}
