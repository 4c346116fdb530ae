//! High-level entry point for minimizing a user-provided `Objective`.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the objective in an `ArgMinAdapter`, and delegates the run
//! to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, MinimizerOptions, Objective},
        validation::validate_theta,
    },
};

/// Minimize a cost `c(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Rejects non-finite starting points, then validates the initial guess
///   via `f.check(theta0, data)`.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`.
/// - Calls `run_lbfgs`, which configures the executor (initial params,
///   max iters, time budget, optional observers) and returns an
///   `OptimOutcome`.
///
/// # Errors
/// - [`OptError::InvalidThetaInput`](crate::optimization::errors::OptError::InvalidThetaInput)
///   for a non-finite `theta0`.
/// - Propagates any error from `f.check`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search failures).
///
/// # Example
/// ```
/// use ndarray::array;
/// use rust_phylo_limits::optimization::errors::OptResult;
/// use rust_phylo_limits::optimization::minimizer::{
///     minimize, MinimizerOptions, Objective, Theta,
/// };
///
/// struct Bowl;
/// impl Objective for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = minimize(&Bowl, array![0.3, -0.2], &(), &MinimizerOptions::default())?;
/// assert!(out.value < 1e-8);
/// # Ok::<(), rust_phylo_limits::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MinimizerOptions,
) -> OptResult<OptimOutcome> {
    validate_theta(&theta0)?;
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        minimizer::{Cost, Grad, Tolerances},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end minimization of smooth bowls with both line searches.
    // - The finite-difference path when no gradient is implemented.
    // - Early rejection of invalid starting points.
    // - `max_iter` caps reported as not converged.
    // -------------------------------------------------------------------------

    struct ShiftedBowl;

    impl Objective for ShiftedBowl {
        type Data = (f64, f64);

        fn value(&self, theta: &Theta, center: &(f64, f64)) -> OptResult<Cost> {
            Ok((theta[0] - center.0).powi(2) + 2.0 * (theta[1] - center.1).powi(2))
        }

        fn check(&self, theta: &Theta, _: &(f64, f64)) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ObjectiveFailed { text: "expected two parameters".into() });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, center: &(f64, f64)) -> OptResult<Grad> {
            Ok(array![2.0 * (theta[0] - center.0), 4.0 * (theta[1] - center.1)])
        }
    }

    struct NoGradBowl;

    impl Objective for NoGradBowl {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            Ok((theta[0] - 0.75).powi(2))
        }

        fn check(&self, _theta: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches find the minimizer of a shifted quadratic.
    //
    // Given
    // -----
    // - `c(θ) = (θ₀ - 1)² + 2(θ₁ + 2)²` with analytic gradient, start at 0.
    //
    // Expect
    // ------
    // - `θ̂ ≈ (1, -2)`, cost ≈ 0, `converged == true`.
    fn minimize_finds_bowl_minimum_with_both_line_searches() {
        for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let opts = MinimizerOptions { line_searcher: searcher, ..Default::default() };

            // Act
            let out = minimize(&ShiftedBowl, array![0.0, 0.0], &(1.0, -2.0), &opts)
                .expect("minimization should succeed");

            // Assert
            assert!(out.converged, "status: {}", out.status);
            assert_abs_diff_eq!(out.theta_hat[0], 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(out.theta_hat[1], -2.0, epsilon = 1e-5);
            assert_abs_diff_eq!(out.value, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Objectives without a gradient are minimized via finite differences.
    //
    // Given
    // -----
    // - `c(θ) = (θ - 0.75)²`, no analytic gradient, start at `-3`.
    //
    // Expect
    // ------
    // - `θ̂ ≈ 0.75`.
    fn minimize_uses_finite_differences_without_gradient() {
        let tols = Tolerances::new(Some(1e-10), None, Some(200)).expect("valid tolerances");
        let opts = MinimizerOptions { tols, ..Default::default() };

        let out = minimize(&NoGradBowl, array![-3.0], &(), &opts).expect("FD run should succeed");

        assert_abs_diff_eq!(out.theta_hat[0], 0.75, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Invalid starting points never reach the solver.
    //
    // Given
    // -----
    // - A NaN start, then a start of the wrong dimension.
    //
    // Expect
    // ------
    // - `InvalidThetaInput`, then the objective's own `check` error.
    fn minimize_rejects_invalid_starts() {
        let opts = MinimizerOptions::default();

        let nan = minimize(&ShiftedBowl, array![f64::NAN, 0.0], &(0.0, 0.0), &opts);
        let short = minimize(&ShiftedBowl, array![0.0], &(0.0, 0.0), &opts);

        assert!(matches!(nan, Err(OptError::InvalidThetaInput { index: 0, .. })));
        assert!(matches!(short, Err(OptError::ObjectiveFailed { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Stopping on `max_iter` is reported as not converged.
    //
    // Given
    // -----
    // - A single allowed iteration and no gradient or cost tolerance.
    //
    // Expect
    // ------
    // - `converged == false` and at most one iteration.
    fn minimize_reports_iteration_cap_as_not_converged() {
        let tols = Tolerances::new(None, None, Some(1)).expect("valid tolerances");
        let opts = MinimizerOptions { tols, ..Default::default() };

        let out = minimize(&ShiftedBowl, array![10.0, 10.0], &(1.0, -2.0), &opts)
            .expect("capped run still returns an outcome");

        assert!(!out.converged);
        assert!(out.iterations <= 1);
    }
}
