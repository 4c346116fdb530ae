//! markov::dlc: "diagonal largest in column" checks on transition matrices.
//!
//! Purpose
//! -------
//! Decide whether a transition matrix violates DLC, i.e. whether some column
//! has a diagonal entry that does not strictly exceed every other entry of
//! that column, and expose the continuous relaxation ([`col_delta`]) used by
//! the boundary estimator.
//!
//! Key behaviors
//! -------------
//! - [`col_delta`] returns `min_j (P[j][j] − max_{i≠j} P[i][j])`; it is
//!   positive exactly when `P` satisfies DLC.
//! - [`violates_dlc_with`] treats a candidate that is numerically equal to
//!   its limit matrix as **not** violating, and otherwise flags columns whose
//!   margin is `≤ tie` (strict violations and numerical ties alike).
//! - [`violates_at_boundary`] is the check applied to a boundary estimate:
//!   the estimate only drives the margin to within `boundary` of zero, so a
//!   margin `≤ boundary` already marks a sympathetic matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Candidate and limit are square with the same shape; callers build both
//!   from the same generator.
//! - Results are invariant under a permutation applied to both rows and
//!   columns of candidate and limit.
use crate::markov::errors::{MarkovError, MarkovResult};
use ndarray::Array2;

/// Default margin under which a boundary estimate counts as a tie.
pub const DEFAULT_BOUNDARY_TOL: f64 = 1e-6;

/// Tolerances for [`violates_dlc_with`] and [`violates_at_boundary`].
///
/// - `tie`: a column margin `≤ tie` counts as a violation.
/// - `limit`: a candidate within `limit` (max-abs) of the limit matrix is
///   treated as converged and never reported.
/// - `boundary`: at an estimated boundary time, a margin `≤ boundary` counts
///   as a violation. Must cover the estimator's crossing tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DlcTolerances {
    pub tie: f64,
    pub limit: f64,
    pub boundary: f64,
}

impl DlcTolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// [`MarkovError::InvalidDlcTolerance`] if any value is non-finite or
    /// negative.
    pub fn new(tie: f64, limit: f64, boundary: f64) -> MarkovResult<Self> {
        for (name, value) in [("tie", tie), ("limit", limit), ("boundary", boundary)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MarkovError::InvalidDlcTolerance { name, value });
            }
        }
        Ok(Self { tie, limit, boundary })
    }
}

impl Default for DlcTolerances {
    fn default() -> Self {
        Self { tie: 1e-9, limit: 1e-6, boundary: DEFAULT_BOUNDARY_TOL }
    }
}

/// Smallest per-column margin `P[j][j] − max_{i≠j} P[i][j]`.
///
/// Returns `+∞` for matrices with fewer than two rows.
pub fn col_delta(p: &Array2<f64>) -> f64 {
    let n = p.ncols();
    (0..n)
        .map(|j| {
            let off_max = p
                .column(j)
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != j)
                .map(|(_, &x)| x)
                .fold(f64::NEG_INFINITY, f64::max);
            p[[j, j]] - off_max
        })
        .fold(f64::INFINITY, f64::min)
}

/// `true` if every column margin exceeds `tie`.
pub fn is_dlc(p: &Array2<f64>, tie: f64) -> bool {
    col_delta(p) > tie
}

/// [`violates_dlc_with`] using [`DlcTolerances::default`].
pub fn violates_dlc(candidate: &Array2<f64>, limit: &Array2<f64>) -> bool {
    violates_dlc_with(candidate, limit, &DlcTolerances::default())
}

/// Decide whether `candidate` violates DLC relative to its limit matrix.
///
/// Returns `false` when `max |candidate − limit| ≤ tols.limit`; otherwise
/// `true` iff some column margin is `≤ tols.tie`.
pub fn violates_dlc_with(
    candidate: &Array2<f64>, limit: &Array2<f64>, tols: &DlcTolerances,
) -> bool {
    if near_limit(candidate, limit, tols.limit) {
        return false;
    }
    !is_dlc(candidate, tols.tie)
}

/// Decide whether a matrix at an estimated boundary time is sympathetic or
/// already past the boundary.
///
/// Returns `false` when `max |candidate − limit| ≤ tols.limit`; otherwise
/// `true` iff `col_delta(candidate) ≤ max(tols.tie, tols.boundary)`.
pub fn violates_at_boundary(
    candidate: &Array2<f64>, limit: &Array2<f64>, tols: &DlcTolerances,
) -> bool {
    if near_limit(candidate, limit, tols.limit) {
        return false;
    }
    col_delta(candidate) <= tols.tie.max(tols.boundary)
}

fn near_limit(candidate: &Array2<f64>, limit: &Array2<f64>, tol: f64) -> bool {
    let distance = candidate
        .iter()
        .zip(limit.iter())
        .map(|(c, l)| (c - l).abs())
        .fold(0.0, f64::max);
    distance <= tol
}
