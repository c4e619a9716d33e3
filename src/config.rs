use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};

use crate::filter::criteria::CriterionKind;
use crate::lexicon::normalize::Similarity;

/// Central configuration for one pipeline run.
///
/// Every field has a default matching the usual review protocol; `load()`
/// overrides them from `BIBSIFT_*` environment variables. The binary loads a
/// `.env` file first via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of TF-IDF terms kept (default 1000)
    pub vocabulary_cap: usize,
    /// Number of clusters k (default 10)
    pub clusters: usize,
    /// Seed for centroid initialization (default 0)
    pub seed: u64,
    /// Independent k-means runs; the lowest-inertia run wins (default 10)
    pub kmeans_restarts: usize,
    /// Iteration cap per k-means run (default 300)
    pub kmeans_max_iter: usize,
    /// How many top terms describe each cluster (default 20)
    pub cluster_terms: usize,
    /// Keyword merge threshold in [0, 1] (default 0.8)
    pub similarity_threshold: f64,
    /// String similarity used for keyword merging (default normalized Levenshtein)
    pub similarity: Similarity,
    /// Minimum count for a keyword or n-gram to be ranked (default 5)
    pub frequency_floor: usize,
    /// Shortest n-gram length (default 1)
    pub ngram_min: usize,
    /// Longest n-gram length (default 3)
    pub ngram_max: usize,
    /// Recency window in years (default 10)
    pub recency_years: i32,
    /// Fixed "current year" for the recency criterion; the local year when unset
    pub current_year: Option<i32>,
    /// Title terms that make a record relevant
    pub relevance_terms: Vec<String>,
    /// Inclusion criteria, in evaluation order
    pub criteria: Vec<CriterionKind>,
    /// Run corpus-level dedup before the filter chain (default true)
    pub corpus_dedup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vocabulary_cap: 1000,
            clusters: 10,
            seed: 0,
            kmeans_restarts: 10,
            kmeans_max_iter: 300,
            cluster_terms: 20,
            similarity_threshold: 0.8,
            similarity: Similarity::Levenshtein,
            frequency_floor: 5,
            ngram_min: 1,
            ngram_max: 3,
            recency_years: 10,
            current_year: None,
            relevance_terms: ["web3", "dao", "blockchain", "decentralized"]
                .into_iter()
                .map(String::from)
                .collect(),
            criteria: CriterionKind::STANDARD.to_vec(),
            corpus_dedup: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults.
    ///
    /// Unset variables keep their default; a set but unparsable variable is an
    /// error naming the variable.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            vocabulary_cap: parse_var("BIBSIFT_VOCABULARY_CAP")?.unwrap_or(defaults.vocabulary_cap),
            clusters: parse_var("BIBSIFT_CLUSTERS")?.unwrap_or(defaults.clusters),
            seed: parse_var("BIBSIFT_SEED")?.unwrap_or(defaults.seed),
            kmeans_restarts: parse_var("BIBSIFT_KMEANS_RESTARTS")?
                .unwrap_or(defaults.kmeans_restarts),
            kmeans_max_iter: parse_var("BIBSIFT_KMEANS_MAX_ITER")?
                .unwrap_or(defaults.kmeans_max_iter),
            cluster_terms: parse_var("BIBSIFT_CLUSTER_TERMS")?.unwrap_or(defaults.cluster_terms),
            similarity_threshold: parse_var("BIBSIFT_SIMILARITY_THRESHOLD")?
                .unwrap_or(defaults.similarity_threshold),
            similarity: parse_var("BIBSIFT_SIMILARITY")?.unwrap_or(defaults.similarity),
            frequency_floor: parse_var("BIBSIFT_FREQUENCY_FLOOR")?
                .unwrap_or(defaults.frequency_floor),
            ngram_min: parse_var("BIBSIFT_NGRAM_MIN")?.unwrap_or(defaults.ngram_min),
            ngram_max: parse_var("BIBSIFT_NGRAM_MAX")?.unwrap_or(defaults.ngram_max),
            recency_years: parse_var("BIBSIFT_RECENCY_YEARS")?.unwrap_or(defaults.recency_years),
            current_year: parse_var("BIBSIFT_CURRENT_YEAR")?.or(defaults.current_year),
            relevance_terms: match env::var("BIBSIFT_RELEVANCE_TERMS") {
                Ok(raw) => split_list(&raw),
                Err(_) => defaults.relevance_terms,
            },
            criteria: match env::var("BIBSIFT_CRITERIA") {
                Ok(raw) => split_list(&raw)
                    .iter()
                    .map(|name| name.parse::<CriterionKind>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(anyhow::Error::msg)
                    .context("Invalid BIBSIFT_CRITERIA")?,
                Err(_) => defaults.criteria,
            },
            corpus_dedup: parse_var("BIBSIFT_CORPUS_DEDUP")?.unwrap_or(defaults.corpus_dedup),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could honor.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            anyhow::bail!(
                "Similarity threshold must be within [0, 1], got {}",
                self.similarity_threshold
            );
        }
        if self.clusters == 0 {
            anyhow::bail!("Cluster count must be at least 1");
        }
        if self.vocabulary_cap == 0 {
            anyhow::bail!("Vocabulary cap must be at least 1");
        }
        if self.ngram_min == 0 || self.ngram_min > self.ngram_max {
            anyhow::bail!(
                "N-gram range {}..={} is empty or starts at zero",
                self.ngram_min,
                self.ngram_max
            );
        }
        Ok(())
    }

    /// The year recency is measured against.
    pub fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(|| Local::now().year())
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {name}={raw:?}: {e}")),
        Err(_) => Ok(None),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.vocabulary_cap, 1000);
        assert_eq!(config.clusters, 10);
        assert_eq!(config.frequency_floor, 5);
        assert_eq!((config.ngram_min, config.ngram_max), (1, 3));
        assert_eq!(config.criteria.len(), 7);
    }

    #[test]
    fn test_validate_rejects_bad_threshold_and_range() {
        let config = Config {
            similarity_threshold: 1.2,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            ngram_min: 3,
            ngram_max: 2,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_criteria_list_is_allowed() {
        let config = Config {
            criteria: vec![],
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_current_year() {
        let config = Config {
            current_year: Some(2024),
            ..Config::default()
        };
        assert_eq!(config.current_year(), 2024);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, ,b ,c"), vec!["a", "b", "c"]);
    }
}
