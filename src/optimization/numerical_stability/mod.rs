//! numerical_stability: guarded scalar transforms for the optimizer.
//!
//! Purpose
//! -------
//! Keep the transforms that map unconstrained optimizer coordinates to
//! strictly positive model quantities in one place, so the boundary
//! estimator can run L-BFGS on ℝ while every evaluated time stays in
//! `(0, ∞)`.
//!
//! Conventions
//! -----------
//! - Pure `f64` functions; no allocation, logging, or I/O.
//! - Input validation (finiteness, positivity) is done by callers.

pub mod transformations;

pub use self::transformations::{SOFTPLUS_LINEAR_CUTOFF, safe_softplus, safe_softplus_inv};

pub mod prelude {
    pub use super::transformations::{safe_softplus, safe_softplus_inv};
}
