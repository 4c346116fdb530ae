//! minimizer: argmin-powered L-BFGS minimization of scalar costs.
//!
//! Purpose
//! -------
//! Provide a small, Argmin-backed layer for **minimizing** a scalar cost
//! `c(θ)` over an unconstrained parameter vector. Callers implement a single
//! trait, [`Objective`], and invoke [`minimize`] to run L-BFGS with a
//! configurable line search, tolerances, iteration cap, wall-clock budget,
//! and finite-difference gradient fallback.
//!
//! Key behaviors
//! -------------
//! - Bridge user objectives into Argmin via [`adapter::ArgMinAdapter`],
//!   which rejects non-finite costs and differentiates numerically when no
//!   analytic gradient exists.
//! - Expose a single entrypoint [`minimize`] that:
//!   - rejects non-finite starts and calls [`Objective::check`],
//!   - selects an L-BFGS solver via [`builders`] based on
//!     [`LineSearcher`],
//!   - executes the solver via [`run::run_lbfgs`], and
//!   - normalizes results into an [`OptimOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The reported `value` is the best cost `c(θ̂)` seen by the solver, never
//!   a sign-flipped quantity.
//! - [`OptimOutcome::converged`] is `true` only when the solver stopped on
//!   its own convergence criteria. Iteration caps and timeouts produce an
//!   outcome with `converged == false` rather than an error.
//! - [`Objective::value`] must report invalid inputs as [`OptError`]
//!   values, not panics.
//!
//! Downstream usage
//! ----------------
//! - The projection layer implements [`Objective`] for the squared column
//!   delta of `expm(Q·softplus(θ))` and calls [`minimize`] once per restart.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover adapter gradients, solver construction,
//!   option validation, and end-to-end minimization of toy bowls.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{LineSearcher, MinimizerOptions, Objective, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{LineSearcher, MinimizerOptions, Objective, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
