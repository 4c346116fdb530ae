//! rust_phylo_limits: DLC boundary projection for phylogenetic substitution
//! models.
//!
//! Purpose
//! -------
//! Analyze a fitted continuous-time Markov substitution model attached to a
//! phylogenetic tree and decide, per branch, whether its transition matrices
//! violate "diagonal largest in column" (DLC), either at the model's own time
//! scale or further along the branch's time domain.
//!
//! Key behaviors
//! -------------
//! - `markov`: validated generators, `P(t) = exp(Q·t)`, state distributions,
//!   limiting-distribution recovery, the DLC predicate, and the expected
//!   number of substitutions (ENS).
//! - `optimization`: an argmin-backed L-BFGS minimizer with finite-difference
//!   gradients, used to estimate the boundary time `tau`.
//! - `projection`: the boundary estimator, the chainsaw interval search, the
//!   per-edge projector, and the tree driver.
//!
//! Invariants & assumptions
//! ------------------------
//! - Generator rows sum to zero; `P(t)` is row-stochastic for every `t ≥ 0`.
//! - ENS is non-decreasing in time; chainsaw intervals are disjoint and
//!   ascending in ENS.
//! - The fitted model is assumed structurally identifiable.
//!
//! Conventions
//! -----------
//! - Matrices are `ndarray::Array2<f64>` with `Q[[i, j]]` the rate from `i`
//!   to `j`.
//! - Each layer has its own error enum (`MarkovError`, `OptError`,
//!   `ProjectionError`) with `From` conversions upward.
//! - Logging uses `tracing`; the optional `obs_slog` feature attaches argmin's
//!   slog observer to verbose optimizer runs.
//!
//! Downstream usage
//! ----------------
//! - Build a `TreeProjector` (or `EdgeProjector`) from `ProjectionOptions`,
//!   hand it per-edge generators, root distributions, a `ParentLookup`, and
//!   `BranchLengths`, and serialize the `EdgeProjection` records with serde.
//! - Tree parsing, model fitting, and result presentation stay with the
//!   caller.
//!
//! Testing notes
//! -------------
//! - Unit tests in each module compare against closed forms (Jukes–Cantor,
//!   F81, and a 4-state cyclic generator with oscillating DLC violations).
//! - `tests/integration_projection.rs` drives the full tree projection.

pub mod markov;
pub mod optimization;
pub mod projection;

pub mod prelude {
    pub use crate::markov::{
        DlcTolerances, Generator, MarkovError, MarkovResult, ModelKind, StateDistribution,
    };
    pub use crate::projection::prelude::*;
}
