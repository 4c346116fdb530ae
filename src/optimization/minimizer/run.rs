//! Execution helper that runs an `argmin` solver on a cost-minimization
//! problem and returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        Grad, MinimizerOptions, Objective, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin_math::ArgminL2Norm;
use tracing::debug;

/// Run an `argmin` optimization for a cost-minimization problem.
///
/// This is the shared runner used by both line-search variants. It wires up:
/// - the user objective via [`ArgMinAdapter`],
/// - the chosen `Solver` (L-BFGS with Hager–Zhang or More–Thuente),
/// - the initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters` and wall-clock `timeout`,
///
/// then executes the solver and converts the result into [`OptimOutcome`].
///
/// # Type Parameters
/// - `F`: the objective type implementing [`Objective`].
/// - `S`: any `argmin` solver whose `Problem` is `ArgMinAdapter<'a, F>` and
///   whose `IterState` matches `Theta`, `Grad`, and `f64`.
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always`.
///
/// # Returns
/// An [`OptimOutcome`] with the best parameter, the best cost `c(θ̂)`,
/// termination status, iteration count, evaluation counters, and the norm
/// of the last gradient if one is available.
///
/// # Errors
/// - Propagates any `argmin` runtime error (objective failures, line-search
///   failures, observer failures) through `From<argmin::core::Error>`.
/// - Propagates validation errors raised while building [`OptimOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MinimizerOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: Objective,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }
    if let Some(budget) = opts.time_budget {
        optimizer = optimizer.timeout(budget);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: Objective,
{
    let c0 = problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    debug!(cost = c0, grad_norm = ?g0n, "lbfgs initial state");
    Ok(())
}
