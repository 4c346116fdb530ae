//! projection: per-edge DLC boundary projection and the tree driver.
//!
//! Purpose
//! -------
//! Determine, for each edge of a fitted tree, whether the substitution
//! model's transition matrix violates DLC at its estimated boundary time
//! `tau`, and if so report every ENS interval of the branch's time domain
//! over which the violation holds.
//!
//! Key behaviors
//! -------------
//! - [`estimator`]: `BoundaryEstimator` seam and the L-BFGS
//!   `MinColDeltaEstimator` with its restart ladder.
//! - [`chainsaw`]: fixed-grid scan producing `ChainsawInterval`s in ENS.
//! - [`edge`]: `EdgeProjector::project_edge`, the per-edge pipeline.
//! - [`tree`]: `TreeProjector::project` over all edges, sequential or rayon.
//! - [`options`] and [`errors`]: configuration and the error surface.
//!
//! Invariants & assumptions
//! ------------------------
//! - Data flows downward only: tree → edge → {estimator, predicate, scan} →
//!   Markov primitives. No component keeps state across edges.
//! - Identical inputs give identical records; nothing here is randomized.
//!
//! Conventions
//! -----------
//! - "No violation" is `Ok(None)`, never an error.
//! - Engine events are emitted with `tracing` (`debug!` per restart, scan
//!   and edge; `warn!` per failed edge). No subscriber is installed here.

pub mod chainsaw;
pub mod edge;
pub mod errors;
pub mod estimator;
pub mod options;
pub mod tree;

pub use self::chainsaw::{ChainsawInterval, search};
pub use self::edge::{EdgeProjection, EdgeProjector};
pub use self::errors::{ProjectionError, ProjectionResult};
pub use self::estimator::{BoundaryEstimator, MinColDeltaEstimator, MinColDeltaFit};
pub use self::options::{EstimatorOptions, ProjectionOptions, ScanOptions, SearchStart};
pub use self::tree::{BranchLengths, EdgeFailure, ParentLookup, ProjectionReport, TreeProjector};

pub mod prelude {
    pub use super::edge::{EdgeProjection, EdgeProjector};
    pub use super::errors::{ProjectionError, ProjectionResult};
    pub use super::options::{ProjectionOptions, SearchStart};
    pub use super::tree::{ProjectionReport, TreeProjector};
}
