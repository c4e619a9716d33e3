// K-means partitioning on linfa-clustering (k-means++ seeding, Lloyd
// iterations).
//
// All randomness comes from one `Xoshiro256Plus` seeded with the caller's
// seed, so identical (points, k, seed) always yield identical labels. linfa
// draws every restart from that generator and keeps the lowest-inertia run.

use std::collections::HashSet;

use linfa::dataset::AsTargets;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::{KMeans as LloydKMeans, KMeansInit};
use ndarray::{Array2, Axis};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::Serialize;
use tracing::{debug, info};

use super::reduce::Point;
use super::traits::Partitioner;
use crate::error::{CoreError, Result};

/// Outcome of a k-means fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
}

pub struct KMeans {
    /// Independent seeded runs (at least one is always made)
    pub restarts: usize,
    /// Iteration cap per run
    pub max_iter: usize,
    /// Centroid movement below which a run has converged
    pub tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            restarts: 10,
            max_iter: 300,
            tolerance: 1e-8,
        }
    }
}

impl Partitioner for KMeans {
    fn partition(&self, points: &[Point], k: usize, seed: u64) -> Result<Vec<usize>> {
        Ok(self.fit(points, k, seed)?.labels)
    }
}

impl KMeans {
    /// Fit `k` centroids to `points` of any (uniform) dimension.
    pub fn fit<P: AsRef<[f64]>>(&self, points: &[P], k: usize, seed: u64) -> Result<KMeansFit> {
        let n = points.len();
        if n == 0 {
            return Err(CoreError::EmptyCorpus {
                stage: "partitioning",
            });
        }
        if k == 0 || k > n {
            return Err(CoreError::InvalidClusterCount { k, available: n });
        }

        let dims = points[0].as_ref().len();
        let flat: Vec<f64> = points.iter().flat_map(|p| p.as_ref().iter().copied()).collect();
        let records = Array2::from_shape_vec((n, dims), flat).map_err(|e| numerical(e.to_string()))?;

        // k-means++ needs k distinct points to draw from
        let distinct = count_distinct(&records);
        let init = if distinct < k {
            debug!(distinct, k, "Fewer distinct points than clusters, seeding at random");
            KMeansInit::Random
        } else {
            KMeansInit::KMeansPlusPlus
        };

        let dataset = DatasetBase::from(records);
        let model = LloydKMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(seed))
            .n_runs(self.restarts.max(1))
            .max_n_iterations(self.max_iter.max(1) as u64)
            .tolerance(self.tolerance)
            .init_method(init)
            .fit(&dataset)
            .map_err(|e| numerical(e.to_string()))?;

        let predictions = model.predict(&dataset);
        let labels: Vec<usize> = predictions.as_targets().iter().copied().collect();

        let centroids = model.centroids();
        let inertia = dataset
            .records()
            .axis_iter(Axis(0))
            .zip(&labels)
            .map(|(row, &label)| {
                row.iter()
                    .zip(centroids.row(label).iter())
                    .map(|(x, c)| (x - c) * (x - c))
                    .sum::<f64>()
            })
            .sum();

        info!(points = n, k, seed, inertia, "Partitioned documents");
        Ok(KMeansFit {
            labels,
            centroids: centroids.rows().into_iter().map(|r| r.to_vec()).collect(),
            inertia,
        })
    }
}

fn numerical(reason: String) -> CoreError {
    CoreError::Numerical {
        stage: "partitioning",
        reason,
    }
}

fn count_distinct(records: &Array2<f64>) -> usize {
    records
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|x| x.to_bits()).collect::<Vec<u64>>())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Point> {
        vec![
            [1.0, 2.0],
            [1.5, 1.8],
            [1.0, 0.6],
            [8.0, 8.0],
            [9.0, 11.0],
            [8.5, 9.0],
        ]
    }

    #[test]
    fn test_separates_two_blobs() {
        let labels = KMeans::default().partition(&blobs(), 2, 0).unwrap();
        assert_eq!(labels.len(), 6);
        assert!(labels.iter().all(|&l| l < 2));
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_same_seed_same_labels() {
        let km = KMeans::default();
        let a = km.fit(&blobs(), 3, 42).unwrap();
        let b = km.fit(&blobs(), 3, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_k_equal_to_n_gives_each_point_its_own_cluster() {
        let fit = KMeans::default().fit(&blobs(), 6, 7).unwrap();
        let mut labels = fit.labels.clone();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 6);
        assert!(fit.inertia.abs() < 1e-12);
    }

    #[test]
    fn test_coincident_points_still_get_k_centroids() {
        let points = vec![[0.0, 0.0]; 4];
        let fit = KMeans::default().fit(&points, 3, 1).unwrap();
        assert_eq!(fit.centroids.len(), 3);
        assert!(fit.labels.iter().all(|&l| l == fit.labels[0]));
        assert!(fit.inertia.abs() < 1e-12);
    }

    #[test]
    fn test_fewer_distinct_points_than_clusters() {
        let points = vec![[0.0, 0.0], [0.0, 0.0], [5.0, 5.0], [5.0, 5.0]];
        let fit = KMeans::default().fit(&points, 3, 3).unwrap();
        assert_eq!(fit.labels.len(), 4);
        assert!(fit.labels.iter().all(|&l| l < 3));
    }

    #[test]
    fn test_invalid_k() {
        let km = KMeans::default();
        assert_eq!(
            km.partition(&blobs(), 7, 0),
            Err(CoreError::InvalidClusterCount { k: 7, available: 6 })
        );
        assert_eq!(
            km.partition(&blobs(), 0, 0),
            Err(CoreError::InvalidClusterCount { k: 0, available: 6 })
        );
        assert!(matches!(
            km.partition(&[], 1, 0),
            Err(CoreError::EmptyCorpus { .. })
        ));
    }
}
