//! projection::tree: driving the edge projector over a whole tree.
//!
//! Purpose
//! -------
//! For every edge of a fitted tree, look up its parent's root distribution,
//! branch length and uncalibrated generator, run the edge projector, and
//! collect the records of violating edges.
//!
//! Key behaviors
//! -------------
//! - Edges are independent: a failure on one edge becomes an [`EdgeFailure`]
//!   in the report and never stops the others.
//! - Records and failures keep the caller's edge order.
//! - With `ProjectionOptions::parallel` the edges are mapped with rayon's
//!   `par_iter`; the indexed collect keeps the sequential order, so both
//!   paths return identical reports.
//!
//! Invariants & assumptions
//! ------------------------
//! - The fitted model is assumed structurally identifiable; this is not
//!   checked here.
//! - Tree topology and branch lengths come from collaborators through
//!   [`ParentLookup`] and [`BranchLengths`]; no tree parsing happens here.
use crate::{
    markov::{distribution::StateDistribution, generator::Generator, model_kind::ModelKind},
    projection::{
        edge::{EdgeProjection, EdgeProjector},
        errors::{ProjectionError, ProjectionResult},
        estimator::{BoundaryEstimator, MinColDeltaEstimator},
        options::ProjectionOptions,
    },
};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Parent lookup for tree nodes.
pub trait ParentLookup {
    fn parent_of(&self, node: &str) -> Option<&str>;
}

impl ParentLookup for HashMap<String, String> {
    fn parent_of(&self, node: &str) -> Option<&str> {
        self.get(node).map(String::as_str)
    }
}

/// Branch lengths keyed by edge (child node) name.
pub trait BranchLengths {
    fn length(&self, edge: &str) -> Option<f64>;
}

impl BranchLengths for HashMap<String, f64> {
    fn length(&self, edge: &str) -> Option<f64> {
        self.get(edge).copied()
    }
}

/// An edge whose projection failed, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFailure {
    pub edge_name: String,
    pub error: ProjectionError,
}

/// Outcome of projecting a tree.
///
/// - `records`: edges that violate DLC at `tau`, in caller order.
/// - `failures`: edges that could not be projected, in caller order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionReport {
    pub records: Vec<EdgeProjection>,
    pub failures: Vec<EdgeFailure>,
}

impl ProjectionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Tree-level driver around an [`EdgeProjector`].
#[derive(Debug, Clone)]
pub struct TreeProjector<E: BoundaryEstimator = MinColDeltaEstimator> {
    projector: EdgeProjector<E>,
}

impl TreeProjector<MinColDeltaEstimator> {
    pub fn from_options(opts: ProjectionOptions) -> Self {
        Self { projector: EdgeProjector::from_options(opts) }
    }
}

impl Default for TreeProjector<MinColDeltaEstimator> {
    fn default() -> Self {
        Self::from_options(ProjectionOptions::default())
    }
}

impl<E: BoundaryEstimator> TreeProjector<E> {
    pub fn new(projector: EdgeProjector<E>) -> Self {
        Self { projector }
    }

    pub fn projector(&self) -> &EdgeProjector<E> {
        &self.projector
    }

    /// Project every edge of `per_edge_generators`.
    ///
    /// Parameters
    /// ----------
    /// - `per_edge_generators`: `(edge name, calibrated generator)` pairs in
    ///   the order records should be reported.
    /// - `root_distributions`: state distribution per *parent* node.
    /// - `tree`: parent lookup for edge (child) names.
    /// - `model_kind`: fixed or recovered limiting distribution.
    /// - `uncalibrated`: uncalibrated generator per edge name.
    /// - `lengths`: branch length per edge name.
    ///
    /// Returns
    /// -------
    /// A [`ProjectionReport`]; never fails as a whole.
    pub fn project<T, L>(
        &self, per_edge_generators: &[(String, Generator)],
        root_distributions: &HashMap<String, StateDistribution>, tree: &T, model_kind: ModelKind,
        uncalibrated: &HashMap<String, Generator>, lengths: &L,
    ) -> ProjectionReport
    where
        T: ParentLookup + Sync + ?Sized,
        L: BranchLengths + Sync + ?Sized,
    {
        let run = |(edge_name, q): &(String, Generator)| {
            let outcome = self.project_one(
                edge_name,
                q,
                root_distributions,
                tree,
                model_kind,
                uncalibrated,
                lengths,
            );
            (edge_name.clone(), outcome)
        };
        let outcomes: Vec<(String, ProjectionResult<Option<EdgeProjection>>)> =
            if self.projector.options().parallel {
                per_edge_generators.par_iter().map(run).collect()
            } else {
                per_edge_generators.iter().map(run).collect()
            };

        let mut report = ProjectionReport::default();
        for (edge_name, outcome) in outcomes {
            match outcome {
                Ok(Some(record)) => report.records.push(record),
                Ok(None) => {}
                Err(error) => {
                    warn!(edge = %edge_name, error = %error, "edge projection failed");
                    report.failures.push(EdgeFailure { edge_name, error });
                }
            }
        }
        debug!(
            edges = per_edge_generators.len(),
            records = report.records.len(),
            failures = report.failures.len(),
            "tree projection finished"
        );
        report
    }

    #[allow(clippy::too_many_arguments)]
    fn project_one<T, L>(
        &self, edge_name: &str, q: &Generator,
        root_distributions: &HashMap<String, StateDistribution>, tree: &T, model_kind: ModelKind,
        uncalibrated: &HashMap<String, Generator>, lengths: &L,
    ) -> ProjectionResult<Option<EdgeProjection>>
    where
        T: ParentLookup + ?Sized,
        L: BranchLengths + ?Sized,
    {
        let parent = tree
            .parent_of(edge_name)
            .ok_or_else(|| ProjectionError::MissingParent { edge_name: edge_name.to_string() })?;
        let root = root_distributions.get(parent).ok_or_else(|| {
            ProjectionError::MissingRootDistribution {
                edge_name: edge_name.to_string(),
                parent: parent.to_string(),
            }
        })?;
        let branch_length = lengths.length(edge_name).ok_or_else(|| {
            ProjectionError::MissingBranchLength { edge_name: edge_name.to_string() }
        })?;
        let uncalibrated_q = uncalibrated.get(edge_name).ok_or_else(|| {
            ProjectionError::MissingUncalibratedGenerator { edge_name: edge_name.to_string() }
        })?;
        self.projector.project_edge(q, root, model_kind, edge_name, uncalibrated_q, branch_length)
    }
}
