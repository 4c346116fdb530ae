//! projection::edge: boundary projection of a single branch.
//!
//! Purpose
//! -------
//! Combine the boundary estimator, the DLC predicate, the ENS integrator and
//! the chainsaw search into the per-edge operation: estimate `tau`, check the
//! transition matrix at `tau`, and, when it violates DLC, scan the branch's
//! time domain for every violating interval.
//!
//! Key behaviors
//! -------------
//! - At `tau` the matrix is checked with the boundary tie band: a margin
//!   within `DlcTolerances::boundary` of zero (the precision of the estimate)
//!   is a sympathetic matrix and counts as a violation unless the matrix has
//!   already reached its limit. No violation means no record (`Ok(None)`).
//! - A violation yields an [`EdgeProjection`] whose chainsaws are searched
//!   with the *uncalibrated* generator, starting where [`SearchStart`]
//!   places it.
//! - Errors from any stage propagate as [`ProjectionError`]; the projector
//!   keeps no state between calls.
//!
//! [`SearchStart`]: crate::projection::options::SearchStart
use crate::{
    markov::{
        distribution::StateDistribution, dlc::violates_at_boundary, generator::Generator,
        model_kind::ModelKind, substitutions::expected_subs,
    },
    projection::{
        chainsaw::{ChainsawInterval, search},
        errors::{ProjectionError, ProjectionResult},
        estimator::{BoundaryEstimator, MinColDeltaEstimator},
        options::ProjectionOptions,
    },
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Projection record of one edge whose transition matrix violates DLC at `tau`.
///
/// Serialized as `{"edge_name", "tau", "ENS", "delta_col", "chainsaws"}` with
/// each chainsaw a `[start, end]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeProjection {
    pub edge_name: String,
    pub tau: f64,
    #[serde(rename = "ENS")]
    pub ens: f64,
    pub delta_col: f64,
    pub chainsaws: Vec<ChainsawInterval>,
}

/// Per-edge projector parameterized by its boundary estimator.
#[derive(Debug, Clone)]
pub struct EdgeProjector<E: BoundaryEstimator = MinColDeltaEstimator> {
    estimator: E,
    opts: ProjectionOptions,
}

impl EdgeProjector<MinColDeltaEstimator> {
    /// Projector using [`MinColDeltaEstimator`] configured by `opts.estimator`.
    pub fn from_options(opts: ProjectionOptions) -> Self {
        let estimator = MinColDeltaEstimator::new(opts.estimator.clone());
        Self { estimator, opts }
    }
}

impl Default for EdgeProjector<MinColDeltaEstimator> {
    fn default() -> Self {
        Self::from_options(ProjectionOptions::default())
    }
}

impl<E: BoundaryEstimator> EdgeProjector<E> {
    pub fn new(estimator: E, opts: ProjectionOptions) -> Self {
        Self { estimator, opts }
    }

    pub fn options(&self) -> &ProjectionOptions {
        &self.opts
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Project one edge.
    ///
    /// Parameters
    /// ----------
    /// - `q`: calibrated generator of the edge.
    /// - `root_distribution`: state distribution at the parent node.
    /// - `model_kind`: fixed (root) or recovered limiting distribution.
    /// - `edge_name`: label copied into the record.
    /// - `uncalibrated_q`: generator scanned for chainsaw intervals.
    /// - `branch_length`: finite, `≥ 0`; scales the scan start under
    ///   `SearchStart::ScaledByBranchLength`.
    ///
    /// Returns
    /// -------
    /// `Ok(None)` when `P(tau)` satisfies DLC (or equals its limit),
    /// `Ok(Some(record))` otherwise.
    ///
    /// Errors
    /// ------
    /// - [`ProjectionError::InvalidBranchLength`] for a negative or non-finite
    ///   branch length.
    /// - Any estimator, Markov, or scan error.
    pub fn project_edge(
        &self, q: &Generator, root_distribution: &StateDistribution, model_kind: ModelKind,
        edge_name: &str, uncalibrated_q: &Generator, branch_length: f64,
    ) -> ProjectionResult<Option<EdgeProjection>> {
        if !branch_length.is_finite() || branch_length < 0.0 {
            return Err(ProjectionError::InvalidBranchLength {
                edge_name: edge_name.to_string(),
                length: branch_length,
            });
        }
        root_distribution.check_states(q.n_states())?;

        let fit = self.estimator.fit(q)?;
        let ens = expected_subs(q, root_distribution, fit.tau)?;
        let p = fit.fitted_q.transition_matrix(fit.tau)?;
        let limit = model_kind.resolve_limit(&p, root_distribution)?;
        if !violates_at_boundary(&p, &limit.limit_matrix(), &self.opts.dlc) {
            debug!(edge = edge_name, tau = fit.tau, delta = fit.delta, "edge satisfies DLC");
            return Ok(None);
        }

        let start = self.opts.search_start.resolve(fit.tau, branch_length);
        let chainsaws = search(
            uncalibrated_q,
            root_distribution,
            start,
            model_kind,
            &self.opts.scan,
            &self.opts.dlc,
        )?;
        debug!(
            edge = edge_name,
            tau = fit.tau,
            delta = fit.delta,
            intervals = chainsaws.len(),
            "edge violates DLC"
        );
        Ok(Some(EdgeProjection {
            edge_name: edge_name.to_string(),
            tau: fit.tau,
            ens,
            delta_col: fit.delta,
            chainsaws,
        }))
    }
}
