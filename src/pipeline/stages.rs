// Individual pipeline stages, each configured from `Config`.

use tracing::{info, warn};

use super::report::{Clustering, LexicalSummary};
use super::Vocabularies;
use crate::clustering::assign;
use crate::clustering::kmeans::KMeans;
use crate::clustering::reduce::PcaReducer;
use crate::clustering::tfidf::TfIdfExtractor;
use crate::clustering::traits::{FeatureExtractor, Partitioner, Reducer};
use crate::config::Config;
use crate::error::Result;
use crate::filter::{FilterChain, FilterOutcome};
use crate::lexicon::ngrams::count_ngrams;
use crate::lexicon::normalize::KeywordNormalizer;
use crate::lexicon::stats;
use crate::records::dedup::{self, DedupOutcome};
use crate::records::Record;
use crate::text;

/// Corpus-level dedup, or a pass-through when it is switched off.
pub fn consolidate(records: Vec<Record>, config: &Config) -> DedupOutcome {
    if config.corpus_dedup {
        dedup::dedupe(records)
    } else {
        info!(records = records.len(), "Corpus-level dedup disabled");
        DedupOutcome {
            unique: records,
            duplicates: Vec::new(),
        }
    }
}

/// Apply the configured inclusion criteria.
pub fn screen(records: Vec<Record>, config: &Config) -> FilterOutcome {
    FilterChain::from_config(config).apply(records)
}

/// Cluster the records that have an abstract with the default
/// TF-IDF -> PCA -> k-means stack.
pub fn cluster(records: &[Record], config: &Config, vocab: &Vocabularies) -> Result<Clustering> {
    let extractor = TfIdfExtractor::new(config.vocabulary_cap, vocab.stopwords.clone());
    let reducer = PcaReducer::default();
    let partitioner = KMeans {
        restarts: config.kmeans_restarts,
        max_iter: config.kmeans_max_iter,
        ..KMeans::default()
    };
    cluster_with(&extractor, &reducer, &partitioner, records, config)
}

/// Cluster with caller-chosen stages.
pub fn cluster_with(
    extractor: &dyn FeatureExtractor,
    reducer: &dyn Reducer,
    partitioner: &dyn Partitioner,
    records: &[Record],
    config: &Config,
) -> Result<Clustering> {
    let documents: Vec<Record> = records
        .iter()
        .filter(|r| r.abstract_text().is_some())
        .cloned()
        .collect();
    let skipped = records.len() - documents.len();
    if skipped > 0 {
        warn!(skipped, "Records without an abstract are left out of clustering");
    }

    let abstracts: Vec<String> = documents
        .iter()
        .filter_map(|r| r.abstract_text().map(str::to_string))
        .collect();

    let matrix = extractor.extract(&abstracts)?;
    let reduced = reducer.reduce(&matrix)?;
    let labels = partitioner.partition(&reduced, config.clusters, config.seed)?;
    let terms = assign::cluster_terms(&matrix, &labels, config.clusters, config.cluster_terms);

    Ok(Clustering {
        documents,
        matrix,
        reduced,
        labels,
        terms,
        k: config.clusters,
    })
}

/// Merged keyword table, n-gram table and year distribution.
pub fn summarize(records: &[Record], config: &Config, vocab: &Vocabularies) -> Result<LexicalSummary> {
    let normalizer = KeywordNormalizer::new(config.similarity_threshold)?
        .with_similarity(config.similarity)
        .with_aliases(vocab.aliases.clone());
    let raw_keywords = stats::keyword_counts(records);
    let keyword_buckets = normalizer.buckets(&raw_keywords);
    let keywords = keyword_buckets
        .iter()
        .map(|b| (b.representative.clone(), b.count))
        .collect();

    let cleaned: Vec<String> = records
        .iter()
        .filter_map(Record::abstract_text)
        .map(|a| text::clean_text(a, &vocab.stopwords))
        .collect();
    let table = count_ngrams(&cleaned, config.ngram_min, config.ngram_max);
    let ngrams = stats::rank(&table, config.frequency_floor, usize::MAX)
        .into_iter()
        .collect();

    Ok(LexicalSummary {
        keywords,
        keyword_buckets,
        ngrams,
        years: stats::year_distribution(records),
        missing_keywords: records.iter().filter(|r| r.keywords().is_none()).count(),
        missing_abstract: records.len() - cleaned.len(),
    })
}
