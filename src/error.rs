// Error taxonomy for the consolidation and clustering engine.
//
// Record-level problems (a malformed year) are recovered by the caller: the
// offending record fails only the computation that needed the field. Corpus-
// level problems (no documents, impossible k) abort the run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A stage that needs documents received none.
    #[error("{stage}: no eligible documents in the corpus")]
    EmptyCorpus { stage: &'static str },

    /// Documents exist but none of them carries a term after stopword removal.
    #[error("feature extraction: {documents} documents produced an empty vocabulary")]
    EmptyVocabulary { documents: usize },

    /// `k` is zero or exceeds the number of vectors to partition.
    #[error("invalid cluster count {k}: must be between 1 and {available}")]
    InvalidClusterCount { k: usize, available: usize },

    /// A field expected to be numeric could not be parsed.
    #[error("malformed field `{field}`: {value:?} is not a valid number")]
    MalformedField { field: String, value: String },

    /// The numeric backend rejected a computation.
    #[error("{stage}: {reason}")]
    Numerical { stage: &'static str, reason: String },

    /// Similarity thresholds live in [0, 1].
    #[error("similarity threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}
