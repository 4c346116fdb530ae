//! Errors for the projection engine (options, estimation, scanning, and the
//! per-edge collaborator lookups of the tree driver).
//!
//! [`ProjectionError`] wraps the lower layers' errors ([`MarkovError`],
//! [`OptError`]) through `From` so `?` works across layers, and adds the
//! engine's own failure modes.
use crate::{markov::errors::MarkovError, optimization::errors::OptError};
use std::fmt;

/// Result alias for projection operations that may produce [`ProjectionError`].
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Unified error type for the projection engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    // ---- Wrapped layers ----
    /// Generator, distribution, time, or recovery failure.
    Markov(MarkovError),

    /// Optimizer configuration or backend failure.
    Optimization(OptError),

    // ---- Options validation ----
    /// Scan grid options are invalid.
    InvalidScanOptions { reason: &'static str },

    /// Estimator options are invalid.
    InvalidEstimatorOptions { reason: &'static str },

    /// Scan start must be finite and ≥ 0.
    InvalidSearchStart { start: f64 },

    /// Branch length must be finite and ≥ 0.
    InvalidBranchLength { edge_name: String, length: f64 },

    // ---- Estimation / scanning ----
    /// No restart of the boundary estimator converged.
    EstimationFailed { status: String },

    /// The scan grid would exceed its point budget.
    ScanBudgetExceeded { points: usize, max_points: usize },

    // ---- Tree collaborators ----
    /// Edge has no parent in the tree.
    MissingParent { edge_name: String },

    /// Parent node has no root distribution.
    MissingRootDistribution { edge_name: String, parent: String },

    /// Edge has no branch length.
    MissingBranchLength { edge_name: String },

    /// Edge has no uncalibrated generator.
    MissingUncalibratedGenerator { edge_name: String },
}

impl std::error::Error for ProjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectionError::Markov(err) => Some(err),
            ProjectionError::Optimization(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // ---- Wrapped layers ----
            ProjectionError::Markov(err) => write!(f, "Markov error: {err}"),
            ProjectionError::Optimization(err) => write!(f, "Optimization error: {err}"),
            // ---- Options validation ----
            ProjectionError::InvalidScanOptions { reason } => {
                write!(f, "Invalid scan options: {reason}")
            }
            ProjectionError::InvalidEstimatorOptions { reason } => {
                write!(f, "Invalid estimator options: {reason}")
            }
            ProjectionError::InvalidSearchStart { start } => {
                write!(f, "Scan start must be finite and >= 0; got: {start}")
            }
            ProjectionError::InvalidBranchLength { edge_name, length } => {
                write!(f, "Branch length of '{edge_name}' must be finite and >= 0; got: {length}")
            }
            // ---- Estimation / scanning ----
            ProjectionError::EstimationFailed { status } => {
                write!(f, "Boundary estimation failed: {status}")
            }
            ProjectionError::ScanBudgetExceeded { points, max_points } => {
                write!(f, "Scan grid needs {points} points; budget is {max_points}")
            }
            // ---- Tree collaborators ----
            ProjectionError::MissingParent { edge_name } => {
                write!(f, "Edge '{edge_name}' has no parent in the tree.")
            }
            ProjectionError::MissingRootDistribution { edge_name, parent } => {
                write!(f, "No root distribution for parent '{parent}' of edge '{edge_name}'.")
            }
            ProjectionError::MissingBranchLength { edge_name } => {
                write!(f, "Edge '{edge_name}' has no branch length.")
            }
            ProjectionError::MissingUncalibratedGenerator { edge_name } => {
                write!(f, "Edge '{edge_name}' has no uncalibrated generator.")
            }
        }
    }
}

impl From<MarkovError> for ProjectionError {
    fn from(err: MarkovError) -> Self {
        ProjectionError::Markov(err)
    }
}

impl From<OptError> for ProjectionError {
    fn from(err: OptError) -> Self {
        ProjectionError::Optimization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    // Purpose
    // -------
    // Lower-layer errors convert with `?` and remain reachable via `source`.
    //
    // Given
    // -----
    // - A `MarkovError::InvalidTime` converted with `From`.
    //
    // Expect
    // ------
    // - `ProjectionError::Markov(..)` whose source displays the time error.
    fn markov_errors_wrap_and_expose_source() {
        let err: ProjectionError = MarkovError::InvalidTime { t: -2.0 }.into();

        assert_eq!(err, ProjectionError::Markov(MarkovError::InvalidTime { t: -2.0 }));
        let source = err.source().expect("wrapped error has a source");
        assert!(source.to_string().contains("-2"));
    }

    #[test]
    // Purpose
    // -------
    // Collaborator errors name the edge involved.
    //
    // Given
    // -----
    // - `MissingRootDistribution` for edge `"a"` with parent `"root"`.
    //
    // Expect
    // ------
    // - The message contains both names.
    fn display_names_edge_and_parent() {
        let err = ProjectionError::MissingRootDistribution {
            edge_name: "a".to_string(),
            parent: "root".to_string(),
        };

        let msg = err.to_string();

        assert!(msg.contains("'a'"));
        assert!(msg.contains("'root'"));
    }
}
