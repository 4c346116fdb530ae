//! markov::distribution: state distributions and limit recovery.
//!
//! Purpose
//! -------
//! Validate probability vectors over the `n` states of a generator, build
//! the limit matrix whose rows all equal a distribution, and recover the
//! limiting (stationary) distribution of a transition matrix.
//!
//! Key behaviors
//! -------------
//! - [`StateDistribution::new`] enforces finiteness, non-negativity, and a
//!   unit sum within [`DISTRIBUTION_SUM_TOL`].
//! - [`recover_distribution`] solves `πP = π` through the transpose: an
//!   eigenvalue of `Pᵀ` must lie within [`UNIT_EIGEN_TOL`] of 1, and the
//!   matching eigenvector is taken as the right-singular vector of
//!   `Pᵀ − I` with the smallest singular value.
//!
//! Invariants & assumptions
//! ------------------------
//! - Recovered vectors are normalized to sum one. Entries below
//!   `-RECOVERY_NEG_TOL` are an error; smaller negatives are rounding noise,
//!   clamped to zero before renormalizing.
use crate::markov::{
    errors::{MarkovError, MarkovResult},
    generator::to_dmatrix,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Tolerance on `|Σ π_i − 1|` accepted by [`StateDistribution::new`].
pub const DISTRIBUTION_SUM_TOL: f64 = 1e-6;

/// Maximum distance `|λ − 1|` for an eigenvalue of `Pᵀ` to count as unit.
pub const UNIT_EIGEN_TOL: f64 = 1e-8;

/// Largest negative entry tolerated (and clamped) in a recovered vector.
pub const RECOVERY_NEG_TOL: f64 = 1e-8;

/// Probability vector over the states of a generator.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDistribution {
    probs: Array1<f64>,
}

impl StateDistribution {
    /// Construct a validated distribution.
    ///
    /// # Errors
    /// - [`MarkovError::NonFiniteProbability`] / [`MarkovError::NegativeProbability`]
    ///   for the first offending entry.
    /// - [`MarkovError::DistributionSumNotOne`] when `|Σ π_i − 1| > DISTRIBUTION_SUM_TOL`.
    pub fn new(probs: Array1<f64>) -> MarkovResult<Self> {
        for (index, &value) in probs.iter().enumerate() {
            if !value.is_finite() {
                return Err(MarkovError::NonFiniteProbability { index, value });
            }
            if value < 0.0 {
                return Err(MarkovError::NegativeProbability { index, value });
            }
        }
        let sum = probs.sum();
        if (sum - 1.0).abs() > DISTRIBUTION_SUM_TOL {
            return Err(MarkovError::DistributionSumNotOne { sum });
        }
        Ok(Self { probs })
    }

    /// Uniform distribution over `n` states.
    pub fn uniform(n: usize) -> Self {
        Self { probs: Array1::from_elem(n, 1.0 / n as f64) }
    }

    pub fn probs(&self) -> &Array1<f64> {
        &self.probs
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Check that this distribution covers exactly `n_states` states.
    ///
    /// # Errors
    /// [`MarkovError::DistributionLengthMismatch`] otherwise.
    pub fn check_states(&self, n_states: usize) -> MarkovResult<()> {
        if self.len() != n_states {
            return Err(MarkovError::DistributionLengthMismatch {
                expected: n_states,
                actual: self.len(),
            });
        }
        Ok(())
    }

    /// `n×n` matrix whose every row equals this distribution.
    pub fn limit_matrix(&self) -> Array2<f64> {
        let n = self.len();
        Array2::from_shape_fn((n, n), |(_, j)| self.probs[j])
    }
}

/// Recover the limiting distribution `π` of a transition matrix `P`.
///
/// Parameters
/// ----------
/// - `p`: square transition matrix (typically `exp(Q·t)`).
///
/// Returns
/// -------
/// The left eigenvector of `P` for eigenvalue 1, normalized to a
/// [`StateDistribution`].
///
/// Errors
/// ------
/// - [`MarkovError::NoUnitEigenvalue`] with the smallest `|λ − 1|` found when
///   no eigenvalue is within [`UNIT_EIGEN_TOL`].
/// - [`MarkovError::InvalidRecoveredDistribution`] when an entry is below
///   `-RECOVERY_NEG_TOL`, or (with `index` equal to the vector length and
///   `value` the sum) when the eigenvector sums to zero or a non-finite value.
/// - [`MarkovError::DecompositionFailed`] if the SVD yields no `Vᵀ`.
pub fn recover_distribution(p: &Array2<f64>) -> MarkovResult<StateDistribution> {
    let pt = to_dmatrix(p).transpose();
    let n = pt.nrows();

    let closest = pt
        .complex_eigenvalues()
        .iter()
        .map(|l| (l.re - 1.0).hypot(l.im))
        .fold(f64::INFINITY, f64::min);
    if !(closest <= UNIT_EIGEN_TOL) {
        return Err(MarkovError::NoUnitEigenvalue { closest });
    }

    let shifted = pt - DMatrix::<f64>::identity(n, n);
    let svd = shifted.svd(false, true);
    let v_t = svd.v_t.ok_or(MarkovError::DecompositionFailed { routine: "svd" })?;
    let null_row = svd
        .singular_values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (k, &s)| if s < best.1 { (k, s) } else { best })
        .0;
    let v = Array1::from_iter(v_t.row(null_row).iter().copied());

    let sum = v.sum();
    if !sum.is_finite() || sum.abs() < f64::EPSILON {
        return Err(MarkovError::InvalidRecoveredDistribution { index: n, value: sum });
    }
    let mut probs = v / sum;
    for (index, value) in probs.iter_mut().enumerate() {
        if *value < -RECOVERY_NEG_TOL {
            return Err(MarkovError::InvalidRecoveredDistribution { index, value: *value });
        }
        *value = value.max(0.0);
    }
    let total = probs.sum();
    probs /= total;
    StateDistribution::new(probs)
}
