// Principal component projection to two dimensions.
//
// The centered term matrix is decomposed with a dense symmetric
// eigensolver, on the smaller of the Gram matrix `XXᵀ` and the scatter
// matrix `XᵀX`. Each axis gets a sign convention (largest-magnitude loading
// positive), so the same matrix always projects to the same coordinates.
// Components without variance are zero-padded.

use linfa_linalg::eigh::{EigSort, Eigh};
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use super::tfidf::FeatureMatrix;
use super::traits::Reducer;
use crate::error::{CoreError, Result};

/// Number of output components.
pub const REDUCED_DIMS: usize = 2;

/// A document in the reduced space.
pub type Point = [f64; REDUCED_DIMS];

/// Deterministic two-component PCA.
pub struct PcaReducer {
    /// Eigenvalues at or below this fraction of the total variance count as zero
    pub rel_tol: f64,
}

impl Default for PcaReducer {
    fn default() -> Self {
        Self { rel_tol: 1e-12 }
    }
}

impl Reducer for PcaReducer {
    fn reduce(&self, matrix: &FeatureMatrix) -> Result<Vec<Point>> {
        let n = matrix.n_documents();
        if n == 0 {
            return Err(CoreError::EmptyCorpus {
                stage: "dimensionality reduction",
            });
        }
        let d = matrix.n_terms();
        let mut points = vec![[0.0; REDUCED_DIMS]; n];
        if d == 0 {
            return Ok(points);
        }

        let x = to_array(matrix)?;
        let mean = x.mean_axis(Axis(0)).ok_or(CoreError::EmptyCorpus {
            stage: "dimensionality reduction",
        })?;
        let centered = &x - &mean;

        for (c, axis) in self.principal_axes(&centered)?.into_iter().enumerate() {
            let scores = centered.dot(&axis);
            for (point, score) in points.iter_mut().zip(scores.iter()) {
                point[c] = *score;
            }
        }
        Ok(points)
    }
}

impl PcaReducer {
    /// Unit loading vectors of the leading components, at most `REDUCED_DIMS`,
    /// stopping at the first one that carries no variance.
    fn principal_axes(&self, centered: &Array2<f64>) -> Result<Vec<Array1<f64>>> {
        let (n, d) = centered.dim();
        let gram_side = n <= d;
        let square = if gram_side {
            centered.dot(&centered.t())
        } else {
            centered.t().dot(centered)
        };

        let (values, vectors) = square
            .eigh()
            .map_err(|e| CoreError::Numerical {
                stage: "dimensionality reduction",
                reason: e.to_string(),
            })?
            .sort_eig_desc();

        let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
        let mut axes = Vec::with_capacity(REDUCED_DIMS);
        for c in 0..REDUCED_DIMS.min(values.len()) {
            if total <= 0.0 || values[c] <= self.rel_tol * total {
                debug!(component = c, "No remaining variance, padding with zeros");
                break;
            }
            let mut axis = if gram_side {
                // Right singular vector recovered from the left one
                centered.t().dot(&vectors.column(c))
            } else {
                vectors.column(c).to_owned()
            };
            let norm = axis.dot(&axis).sqrt();
            if norm <= 0.0 {
                break;
            }
            axis /= norm;
            fix_sign(&mut axis);
            axes.push(axis);
        }
        debug!(
            components = axes.len(),
            total_variance = total / n as f64,
            "Projected onto principal axes"
        );
        Ok(axes)
    }
}

fn to_array(matrix: &FeatureMatrix) -> Result<Array2<f64>> {
    let shape = (matrix.n_documents(), matrix.n_terms());
    let flat: Vec<f64> = matrix.rows.iter().flatten().copied().collect();
    Array2::from_shape_vec(shape, flat).map_err(|e| CoreError::Numerical {
        stage: "dimensionality reduction",
        reason: e.to_string(),
    })
}

/// Make the largest-magnitude loading positive; the first one wins a tie.
fn fix_sign(axis: &mut Array1<f64>) {
    let mut pivot: f64 = 0.0;
    for &x in axis.iter() {
        if x.abs() > pivot.abs() {
            pivot = x;
        }
    }
    if pivot < 0.0 {
        axis.mapv_inplace(|x| -x);
    }
}
