//! projection::chainsaw: scanning a branch's time domain for DLC violations.
//!
//! Purpose
//! -------
//! When the boundary estimate at `tau` shows a violation, walk a fixed time
//! grid from a start time to the domain's upper bound and report every
//! maximal run of violating grid points as an interval, converted to ENS.
//!
//! Key behaviors
//! -------------
//! - Grid: `t_k = start + k·step` for `k = 0..n` with
//!   `n = ceil((upper − start)/step)`; a `1e-9` guard keeps floating error
//!   from adding a point past `upper`.
//! - A single open marker tracks the current interval. The first violating
//!   point opens it; the first non-violating point after a violation closes
//!   it at the previous grid time; an interval still open at the end of the
//!   grid closes at `upper`.
//! - Interval endpoints are mapped through `expected_subs` with the same
//!   generator and root distribution.
//!
//! Invariants & assumptions
//! ------------------------
//! - Intervals are disjoint and returned in increasing ENS order.
//! - `start ≥ upper` yields no intervals; a grid larger than
//!   `ScanOptions::max_points` fails before any matrix is evaluated.
use crate::{
    markov::{
        distribution::StateDistribution,
        dlc::{DlcTolerances, violates_dlc_with},
        generator::Generator,
        model_kind::ModelKind,
        substitutions::expected_subs,
    },
    projection::{
        errors::{ProjectionError, ProjectionResult},
        options::ScanOptions,
    },
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Guard subtracted from the grid-size ratio before rounding up.
const GRID_GUARD: f64 = 1e-9;

/// Closed ENS interval over which DLC is violated.
///
/// Serialized as a two-element array `[ens_start, ens_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct ChainsawInterval {
    pub ens_start: f64,
    pub ens_end: f64,
}

impl From<ChainsawInterval> for [f64; 2] {
    fn from(interval: ChainsawInterval) -> Self {
        [interval.ens_start, interval.ens_end]
    }
}

impl From<[f64; 2]> for ChainsawInterval {
    fn from([ens_start, ens_end]: [f64; 2]) -> Self {
        Self { ens_start, ens_end }
    }
}

/// Number of grid points between `start` and `upper`.
fn grid_len(start: f64, scan: &ScanOptions) -> f64 {
    ((scan.upper - start) / scan.step - GRID_GUARD).ceil().max(0.0)
}

/// Scan `[start, upper]` and return the violating intervals in ENS units.
///
/// Parameters
/// ----------
/// - `generator`: generator whose transition matrices are scanned.
/// - `root_distribution`: distribution at the start of the branch; used as
///   the limit for stationary kinds and as `p0` for the ENS conversion.
/// - `start_time`: first grid time, finite and `≥ 0`.
/// - `model_kind`: selects a fixed or recovered limit per grid point.
/// - `scan`: grid bounds and budget.
/// - `dlc`: tolerances of the violation predicate.
///
/// Errors
/// ------
/// - [`ProjectionError::InvalidSearchStart`] for a negative or non-finite start.
/// - [`ProjectionError::ScanBudgetExceeded`] when the grid exceeds `scan.max_points`.
/// - [`ProjectionError::Markov`] for mismatched distributions or a failed
///   limit recovery at some grid point.
pub fn search(
    generator: &Generator, root_distribution: &StateDistribution, start_time: f64,
    model_kind: ModelKind, scan: &ScanOptions, dlc: &DlcTolerances,
) -> ProjectionResult<Vec<ChainsawInterval>> {
    if !start_time.is_finite() || start_time < 0.0 {
        return Err(ProjectionError::InvalidSearchStart { start: start_time });
    }
    root_distribution.check_states(generator.n_states())?;
    if start_time >= scan.upper {
        return Ok(Vec::new());
    }

    let points = grid_len(start_time, scan);
    if points > scan.max_points as f64 {
        return Err(ProjectionError::ScanBudgetExceeded {
            points: points as usize,
            max_points: scan.max_points,
        });
    }
    let points = points as usize;
    debug!(start = start_time, upper = scan.upper, points, "chainsaw scan");

    let mut bounds: Vec<(f64, f64)> = Vec::new();
    let mut open: Option<f64> = None;
    for k in 0..points {
        let t = start_time + k as f64 * scan.step;
        let p = generator.transition_matrix(t)?;
        let limit = model_kind.resolve_limit(&p, root_distribution)?;
        if violates_dlc_with(&p, &limit.limit_matrix(), dlc) {
            if open.is_none() {
                open = Some(t);
            }
        } else if let Some(begin) = open.take() {
            bounds.push((begin, t - scan.step));
        }
    }
    if let Some(begin) = open {
        bounds.push((begin, scan.upper));
    }

    bounds
        .into_iter()
        .map(|(begin, end)| {
            Ok(ChainsawInterval {
                ens_start: expected_subs(generator, root_distribution, begin)?,
                ens_end: expected_subs(generator, root_distribution, end)?,
            })
        })
        .collect()
}
