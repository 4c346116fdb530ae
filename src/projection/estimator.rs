//! projection::estimator: locating the DLC boundary in time.
//!
//! Purpose
//! -------
//! Estimate `tau`, the smallest elapsed time at which the transition matrix
//! of a generator becomes marginal for DLC, i.e. where the column delta
//! `col_delta(exp(Q·t))` first reaches zero.
//!
//! Key behaviors
//! -------------
//! - [`BoundaryEstimator`] is the seam the projectors depend on; any
//!   estimator (including fixed-`tau` stubs) can drive them.
//! - [`MinColDeltaEstimator`] first walks forward from `t = 0` on a grid of
//!   `bracket_step / max exit rate` until `col_delta` turns negative, then
//!   refines the root inside that bracket with argmin's Brent solver. The
//!   estimate is therefore the first crossing, never a later one.
//! - Without a bracket (no sign change up to the horizon, e.g. a margin that
//!   only decays towards zero) it minimizes `col_delta²` over
//!   `t = softplus(θ)` with L-BFGS, once per entry of the restart ladder. The
//!   first converged run with `|col_delta| ≤ crossing_tol` wins; otherwise the
//!   converged run with the smallest `|col_delta|` is returned (ties favor
//!   the smaller `tau`).
//!
//! Invariants & assumptions
//! ------------------------
//! - The estimator never invents a `tau`: when neither the bracket nor any
//!   restart yields an estimate it returns
//!   [`ProjectionError::EstimationFailed`] listing every attempt's status.
//! - `fitted_q` is the input generator with its diagonal recomputed from the
//!   off-diagonal rates; `tau` and `delta` refer to that generator.
//! - Estimation is deterministic for identical inputs and options.
use crate::{
    markov::{dlc::col_delta, generator::Generator},
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{Cost, Objective, OptimOutcome, Theta, minimize},
        numerical_stability::{safe_softplus, safe_softplus_inv},
    },
    projection::{
        errors::{ProjectionError, ProjectionResult},
        options::EstimatorOptions,
    },
};
use argmin::{
    core::{CostFunction, Executor, State},
    solver::brent::BrentRoot,
};
use ndarray::array;
use tracing::debug;

/// Time tolerance of the Brent refinement inside a bracket.
const ROOT_TIME_TOL: f64 = 1e-12;

/// Iteration cap of the Brent refinement.
const ROOT_MAX_ITERS: u64 = 200;

/// Result of a boundary estimation.
///
/// - `tau`: estimated boundary time.
/// - `delta`: `col_delta(exp(fitted_q · tau))`.
/// - `fitted_q`: generator the estimate refers to.
/// - `bracket`: `(lo, hi)` with `col_delta(lo) > 0 > col_delta(hi)` when
///   `tau` was refined inside a bracket.
/// - `outcome`: optimizer diagnostics of the accepted L-BFGS run, `None` for
///   bracketed estimates and for estimators that do not run the minimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct MinColDeltaFit {
    pub tau: f64,
    pub delta: f64,
    pub fitted_q: Generator,
    pub bracket: Option<(f64, f64)>,
    pub outcome: Option<OptimOutcome>,
}

/// Estimates the DLC boundary time of a generator.
pub trait BoundaryEstimator: Sync {
    fn fit(&self, q: &Generator) -> ProjectionResult<MinColDeltaFit>;
}

/// Cost `c(θ) = col_delta(exp(Q · softplus(θ)))²` over a one-element `θ`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColDeltaObjective;

impl Objective for ColDeltaObjective {
    type Data = Generator;

    fn value(&self, theta: &Theta, q: &Generator) -> OptResult<Cost> {
        let t = safe_softplus(theta[0]);
        let p = q
            .transition_matrix(t)
            .map_err(|err| OptError::ObjectiveFailed { text: err.to_string() })?;
        let delta = col_delta(&p);
        Ok(delta * delta)
    }

    fn check(&self, theta: &Theta, _q: &Generator) -> OptResult<()> {
        if theta.len() != 1 {
            return Err(OptError::ObjectiveFailed {
                text: format!("expected a single time parameter; got {}", theta.len()),
            });
        }
        Ok(())
    }
}

/// `t ↦ col_delta(exp(Q·t))` as a scalar root-finding problem.
struct ColDeltaCurve<'a> {
    q: &'a Generator,
}

impl CostFunction for ColDeltaCurve<'_> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, t: &f64) -> Result<f64, argmin::core::Error> {
        Ok(col_delta(&self.q.transition_matrix(*t)?))
    }
}

/// First-crossing boundary estimator with an L-BFGS restart ladder fallback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MinColDeltaEstimator {
    opts: EstimatorOptions,
}

impl MinColDeltaEstimator {
    pub fn new(opts: EstimatorOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &EstimatorOptions {
        &self.opts
    }

    /// Walk `t = k · h` forward from zero, `h = bracket_step / max exit
    /// rate`, and return the first `(lo, hi)` with `col_delta(lo) > 0` and
    /// `col_delta(hi) < -crossing_tol`.
    ///
    /// Returns `Ok(None)` for generators without transitions and when the
    /// margin never turns negative up to `bracket_horizon / max exit rate`.
    fn first_sign_change(&self, q: &Generator) -> ProjectionResult<Option<(f64, f64)>> {
        let rate = q.exit_rates().fold(0.0_f64, |m, &r| m.max(r));
        if rate <= 0.0 {
            return Ok(None);
        }
        let h = self.opts.bracket_step / rate;
        let steps = (self.opts.bracket_horizon / self.opts.bracket_step).ceil() as usize;
        let mut last_positive = 0.0;
        for k in 1..=steps {
            let t = k as f64 * h;
            let delta = col_delta(&q.transition_matrix(t)?);
            if delta > 0.0 {
                last_positive = t;
            } else if delta < -self.opts.crossing_tol {
                return Ok(Some((last_positive, t)));
            }
        }
        Ok(None)
    }

    /// Locate the root of `col_delta` inside `[lo, hi]` with Brent's method.
    fn refine(&self, lo: f64, hi: f64, fitted_q: &Generator) -> ProjectionResult<MinColDeltaFit> {
        let solver = BrentRoot::new(lo, hi, ROOT_TIME_TOL);
        let result = Executor::new(ColDeltaCurve { q: fitted_q }, solver)
            .configure(|state| state.param(0.5 * (lo + hi)).max_iters(ROOT_MAX_ITERS))
            .run()
            .map_err(OptError::from)?;
        let state = result.state();
        let tau = state
            .get_best_param()
            .or_else(|| state.get_param())
            .copied()
            .ok_or(OptError::MissingThetaHat)?;
        let delta = col_delta(&fitted_q.transition_matrix(tau)?);
        debug!(lo, hi, tau, delta, iterations = state.get_iter(), "boundary bracket refined");
        Ok(MinColDeltaFit {
            tau,
            delta,
            fitted_q: fitted_q.clone(),
            bracket: Some((lo, hi)),
            outcome: None,
        })
    }

    fn run_from(&self, start: f64, fitted_q: &Generator) -> ProjectionResult<MinColDeltaFit> {
        let theta0 = array![safe_softplus_inv(start)];
        let outcome = minimize(&ColDeltaObjective, theta0, fitted_q, &self.opts.minimizer)?;
        let tau = safe_softplus(outcome.theta_hat[0]);
        let delta = col_delta(&fitted_q.transition_matrix(tau)?);
        Ok(MinColDeltaFit {
            tau,
            delta,
            fitted_q: fitted_q.clone(),
            bracket: None,
            outcome: Some(outcome),
        })
    }
}

impl BoundaryEstimator for MinColDeltaEstimator {
    /// Bracket and refine the first crossing, falling back to the restart
    /// ladder when no crossing is bracketed.
    ///
    /// # Errors
    /// - [`ProjectionError::EstimationFailed`] when the bracket does not
    ///   yield a root and no restart converges; the status lists each
    ///   attempt with its termination status or error.
    /// - [`ProjectionError::Markov`] if `P(t)` cannot be evaluated on the
    ///   bracketing grid.
    fn fit(&self, q: &Generator) -> ProjectionResult<MinColDeltaFit> {
        let fitted_q = q.rebalanced();
        let mut statuses = Vec::with_capacity(self.opts.initial_times.len() + 1);

        if let Some((lo, hi)) = self.first_sign_change(&fitted_q)? {
            match self.refine(lo, hi, &fitted_q) {
                Ok(fit) if fit.delta.abs() <= self.opts.crossing_tol => return Ok(fit),
                Ok(fit) => statuses.push(format!(
                    "bracket [{lo}, {hi}]: |delta| = {} at tau = {}",
                    fit.delta.abs(),
                    fit.tau
                )),
                Err(err) => statuses.push(format!("bracket [{lo}, {hi}]: {err}")),
            }
        }

        let mut best: Option<MinColDeltaFit> = None;

        for &start in &self.opts.initial_times {
            let fit = match self.run_from(start, &fitted_q) {
                Ok(fit) => fit,
                Err(err) => {
                    debug!(start, error = %err, "boundary restart failed");
                    statuses.push(format!("start {start}: {err}"));
                    continue;
                }
            };
            let (converged, status) = match &fit.outcome {
                Some(outcome) => (outcome.converged, outcome.status.clone()),
                None => (false, "no outcome".to_string()),
            };
            debug!(start, tau = fit.tau, delta = fit.delta, converged, "boundary restart");
            if !converged {
                statuses.push(format!("start {start}: {status}"));
                continue;
            }
            if fit.delta.abs() <= self.opts.crossing_tol {
                return Ok(fit);
            }
            best = match best {
                Some(current) if !is_better(&fit, &current) => Some(current),
                _ => Some(fit),
            };
        }

        best.ok_or_else(|| ProjectionError::EstimationFailed { status: statuses.join("; ") })
    }
}

/// Smaller `|delta|` wins; equal `|delta|` falls back to the smaller `tau`.
fn is_better(candidate: &MinColDeltaFit, current: &MinColDeltaFit) -> bool {
    let (a, b) = (candidate.delta.abs(), current.delta.abs());
    a < b || (a == b && candidate.tau < current.tau)
}
