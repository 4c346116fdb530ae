//! optimization: L-BFGS minimizer, positive-time transforms, and errors.
//!
//! Purpose
//! -------
//! Provide the numerical optimization layer used to locate divergence
//! boundaries: an Argmin-backed cost minimizer, guarded transforms between
//! unconstrained and positive parameters, and a single error surface.
//!
//! Key behaviors
//! -------------
//! - `minimizer`: minimize a scalar cost `c(θ)` with L-BFGS, finite-difference
//!   gradients, iteration caps, and an optional wall-clock budget.
//! - `numerical_stability`: `safe_softplus` / `safe_softplus_inv` for mapping
//!   ℝ ↔ (0, ∞) without overflow.
//! - `errors`: normalize configuration issues, numerical failures, and backend
//!   solver errors into `OptError` with the alias `OptResult<T>`.
//!
//! Conventions
//! -----------
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - Logging is limited to `tracing::debug!` in the runner (when verbose)
//!   and the optional `obs_slog` observer.
//!
//! Downstream usage
//! ----------------
//! - `projection::estimator` implements `Objective` and calls `minimize`
//!   over the restart ladder; its `OptError`s are wrapped into
//!   `ProjectionError`.

pub mod errors;
pub mod minimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_phylo_limits::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::minimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
