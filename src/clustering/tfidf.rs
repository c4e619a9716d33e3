// TF-IDF feature extraction over abstracts.
//
// Each abstract is one document. Terms are word tokens of two or more
// characters that survive stopword removal. The vocabulary keeps the
// `vocabulary_cap` terms with the highest corpus-wide count (ties broken
// lexically) and is then ordered lexically, so column indices are stable for a
// given corpus.
//
// Weights use the smoothed IDF `ln((1 + n) / (1 + df)) + 1` on raw term counts,
// and every document row is L2-normalized.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::info;

use super::traits::FeatureExtractor;
use crate::error::{CoreError, Result};
use crate::text;

/// Documents × terms weight matrix with its vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    /// Vocabulary, in column order
    pub terms: Vec<String>,
    /// One row per document, `terms.len()` columns each
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Column index of a term, if it made it into the vocabulary.
    pub fn column(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }
}

/// TF-IDF extractor with a bounded vocabulary.
pub struct TfIdfExtractor {
    /// Maximum number of terms kept
    pub vocabulary_cap: usize,
    stopwords: HashSet<String>,
}

impl TfIdfExtractor {
    pub fn new(vocabulary_cap: usize, stopwords: HashSet<String>) -> Self {
        Self {
            vocabulary_cap,
            stopwords,
        }
    }
}

impl FeatureExtractor for TfIdfExtractor {
    fn extract(&self, documents: &[String]) -> Result<FeatureMatrix> {
        if documents.is_empty() {
            return Err(CoreError::EmptyCorpus {
                stage: "feature extraction",
            });
        }

        let doc_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for token in text::content_tokens(doc, &self.stopwords) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        // Corpus-wide count and document frequency per term
        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for counts in &doc_counts {
            for (term, &count) in counts {
                *corpus_counts.entry(term.as_str()).or_insert(0) += count;
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if corpus_counts.is_empty() {
            return Err(CoreError::EmptyVocabulary {
                documents: documents.len(),
            });
        }

        let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.vocabulary_cap);

        let mut terms: Vec<String> = ranked.iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();

        let n = documents.len() as f64;
        let idf: Vec<f64> = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let rows: Vec<Vec<f64>> = doc_counts
            .iter()
            .map(|counts| {
                let mut row: Vec<f64> = terms
                    .iter()
                    .zip(&idf)
                    .map(|(t, w)| counts.get(t).copied().unwrap_or(0) as f64 * w)
                    .collect();
                let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for v in &mut row {
                        *v /= norm;
                    }
                }
                row
            })
            .collect();

        info!(
            documents = rows.len(),
            vocabulary = terms.len(),
            cap = self.vocabulary_cap,
            "Extracted TF-IDF features"
        );

        Ok(FeatureMatrix { terms, rows })
    }
}
