// Keyword normalization: fold near-duplicate keyword strings into buckets.
//
// The merge is greedy and order-sensitive. Keywords are visited in the source
// map's insertion order; each one joins the FIRST existing bucket whose
// representative scores at or above the threshold, otherwise it founds a new
// bucket and becomes its representative. Reordering the input can change
// bucket membership. Cost is quadratic in the number of distinct keywords.
//
// An optional alias table (exact string -> canonical string) is applied before
// any similarity comparison.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, Result};

/// String similarity measures, all scaled to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Similarity {
    /// 1 - levenshtein / max(len)
    Levenshtein,
    /// Like Levenshtein but transpositions count as one edit
    DamerauLevenshtein,
    JaroWinkler,
    /// Bigram overlap
    SorensenDice,
}

impl Similarity {
    pub fn score(&self, a: &str, b: &str) -> f64 {
        match self {
            Similarity::Levenshtein => strsim::normalized_levenshtein(a, b),
            Similarity::DamerauLevenshtein => strsim::normalized_damerau_levenshtein(a, b),
            Similarity::JaroWinkler => strsim::jaro_winkler(a, b),
            Similarity::SorensenDice => strsim::sorensen_dice(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Similarity::Levenshtein => "levenshtein",
            Similarity::DamerauLevenshtein => "damerau_levenshtein",
            Similarity::JaroWinkler => "jaro_winkler",
            Similarity::SorensenDice => "sorensen_dice",
        }
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Similarity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "levenshtein" => Ok(Similarity::Levenshtein),
            "damerau_levenshtein" => Ok(Similarity::DamerauLevenshtein),
            "jaro_winkler" => Ok(Similarity::JaroWinkler),
            "sorensen_dice" => Ok(Similarity::SorensenDice),
            other => Err(format!("unknown similarity measure `{other}`")),
        }
    }
}

/// One merged keyword group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordBucket {
    /// First keyword that founded the bucket
    pub representative: String,
    pub count: usize,
    /// Every keyword folded in, representative first
    pub members: Vec<String>,
}

pub struct KeywordNormalizer {
    threshold: f64,
    similarity: Similarity,
    aliases: IndexMap<String, String>,
}

impl KeywordNormalizer {
    /// A normalizer merging at `threshold` (inclusive) with normalized
    /// Levenshtein similarity and no aliases.
    pub fn new(threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CoreError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            similarity: Similarity::Levenshtein,
            aliases: IndexMap::new(),
        })
    }

    pub fn with_similarity(mut self, similarity: Similarity) -> Self {
        self.similarity = similarity;
        self
    }

    /// Exact-match overrides applied before similarity merging.
    pub fn with_aliases(mut self, aliases: IndexMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Merge keyword counts into buckets keyed by representative.
    pub fn merge(&self, counts: &IndexMap<String, usize>) -> IndexMap<String, usize> {
        self.buckets(counts)
            .into_iter()
            .map(|b| (b.representative, b.count))
            .collect()
    }

    /// Same merge as `merge`, keeping bucket membership.
    pub fn buckets(&self, counts: &IndexMap<String, usize>) -> Vec<KeywordBucket> {
        let aliased = self.apply_aliases(counts);
        let mut buckets: Vec<KeywordBucket> = Vec::new();

        for (keyword, count) in aliased {
            let home = buckets
                .iter_mut()
                .find(|b| self.similarity.score(&b.representative, &keyword) >= self.threshold);
            match home {
                Some(bucket) => {
                    bucket.count += count;
                    if !bucket.members.contains(&keyword) {
                        bucket.members.push(keyword);
                    }
                }
                None => buckets.push(KeywordBucket {
                    representative: keyword.clone(),
                    count,
                    members: vec![keyword],
                }),
            }
        }

        info!(
            distinct = counts.len(),
            buckets = buckets.len(),
            threshold = self.threshold,
            similarity = %self.similarity,
            "Merged near-duplicate keywords"
        );
        buckets
    }

    fn apply_aliases(&self, counts: &IndexMap<String, usize>) -> IndexMap<String, usize> {
        let mut out: IndexMap<String, usize> = IndexMap::with_capacity(counts.len());
        for (keyword, &count) in counts {
            let canonical = self.aliases.get(keyword).unwrap_or(keyword);
            *out.entry(canonical.clone()).or_insert(0) += count;
        }
        out
    }
}
