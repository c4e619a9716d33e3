// End-to-end review pipeline.
//
// raw -> dedup -> inclusion criteria -> {TF-IDF -> PCA -> k-means}
//                                    -> {keyword merge, n-grams, years}
//
// Every stage consumes its whole input before the next begins. Each stage is
// also callable on its own so the binary can stop after any of them.

pub mod report;
pub mod stages;

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::records::Record;
use crate::text;
use report::{PipelineReport, SkipCounts, StageCounts};

/// Word lists handed to the core by external providers.
#[derive(Debug, Clone, Default)]
pub struct Vocabularies {
    pub stopwords: HashSet<String>,
    /// Exact keyword -> canonical keyword overrides
    pub aliases: IndexMap<String, String>,
}

impl Vocabularies {
    /// English stopwords and no aliases.
    pub fn english() -> Self {
        Self {
            stopwords: text::english_stopwords(),
            aliases: IndexMap::new(),
        }
    }
}

/// Run every stage over one corpus.
///
/// Record-level problems are counted and skipped; a corpus with nothing to
/// cluster, or a `k` larger than the clusterable documents, aborts the run.
pub fn run(records: Vec<Record>, config: &Config, vocab: &Vocabularies) -> Result<PipelineReport> {
    let raw = records.len();

    let dedup = stages::consolidate(records, config);
    let deduplicated = dedup.unique.len();

    let screened = stages::screen(dedup.unique, config);
    let filtered = screened.kept.len();

    let clustering = stages::cluster(&screened.kept, config, vocab)?;
    let summary = stages::summarize(&screened.kept, config, vocab)?;

    let counts = StageCounts {
        raw,
        deduplicated,
        filtered,
        clustered: clustering.labels.len(),
    };
    info!(
        raw = counts.raw,
        deduplicated = counts.deduplicated,
        filtered = counts.filtered,
        clustered = counts.clustered,
        "Pipeline complete"
    );

    Ok(PipelineReport {
        counts,
        skips: SkipCounts {
            missing_abstract: summary.missing_abstract,
            missing_keywords: summary.missing_keywords,
            malformed_fields: screened.malformed_count(),
        },
        duplicates: dedup.duplicates,
        rejections_by_criterion: screened.rejections_by_criterion(),
        rejected: screened.rejected,
        records: screened.kept,
        clustering,
        summary,
    })
}
