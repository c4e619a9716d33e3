// Swap-ready seams of the clustering path.
//
// Each stage is a trait so an alternative (a different weighting, a different
// projection, a different partitioner) can replace one step without touching
// the pipeline. Implementations must be deterministic for identical input.

use super::reduce::Point;
use super::tfidf::FeatureMatrix;
use crate::error::Result;

/// Turn free-text documents into weighted term vectors.
pub trait FeatureExtractor {
    fn extract(&self, documents: &[String]) -> Result<FeatureMatrix>;
}

/// Project term vectors into the low-dimensional clustering space.
pub trait Reducer {
    fn reduce(&self, matrix: &FeatureMatrix) -> Result<Vec<Point>>;
}

/// Assign each point a label in `0..k`.
pub trait Partitioner {
    fn partition(&self, points: &[Point], k: usize, seed: u64) -> Result<Vec<usize>>;
}
