//! Errors for the Markov layer (generators, distributions, time arguments,
//! and limiting-distribution recovery).
//!
//! ## Conventions
//! - **Indices are 0-based**; `(row, col)` pairs address generator entries.
//! - Times must be **finite and ≥ 0**.
//! - Decomposition failures from `nalgebra` are reported as
//!   [`MarkovError::DecompositionFailed`] with the routine name.
use std::fmt;

/// Result alias for Markov-layer operations that may produce [`MarkovError`].
pub type MarkovResult<T> = Result<T, MarkovError>;

/// Unified error type for generator, distribution, and recovery operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkovError {
    // ---- Generator validation ----
    /// Generator must be square.
    NonSquareGenerator { rows: usize, cols: usize },

    /// Generator must have at least two states.
    GeneratorTooSmall { n: usize },

    /// A generator entry is NaN/±inf.
    NonFiniteRate { row: usize, col: usize, value: f64 },

    /// An off-diagonal rate is negative.
    NegativeRate { row: usize, col: usize, value: f64 },

    /// A generator row does not sum to zero within tolerance.
    RowSumNotZero { row: usize, sum: f64 },

    // ---- Distribution validation ----
    /// Distribution length does not match the number of states.
    DistributionLengthMismatch { expected: usize, actual: usize },

    /// A probability is NaN/±inf.
    NonFiniteProbability { index: usize, value: f64 },

    /// A probability is negative.
    NegativeProbability { index: usize, value: f64 },

    /// Probabilities do not sum to one within tolerance.
    DistributionSumNotOne { sum: f64 },

    // ---- Tolerances ----
    /// A DLC tolerance is non-finite or negative.
    InvalidDlcTolerance { name: &'static str, value: f64 },

    // ---- Time arguments ----
    /// Elapsed time must be finite and ≥ 0.
    InvalidTime { t: f64 },

    // ---- Recovery ----
    /// No eigenvalue of `Pᵀ` lies within tolerance of 1.
    NoUnitEigenvalue { closest: f64 },

    /// Recovered eigenvector cannot be normalized into a distribution.
    InvalidRecoveredDistribution { index: usize, value: f64 },

    /// A matrix decomposition did not produce the required factors.
    DecompositionFailed { routine: &'static str },
}

impl std::error::Error for MarkovError {}

impl fmt::Display for MarkovError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // ---- Generator validation ----
            MarkovError::NonSquareGenerator { rows, cols } => {
                write!(f, "Generator must be square; got {rows}x{cols}.")
            }
            MarkovError::GeneratorTooSmall { n } => {
                write!(f, "Generator must have at least 2 states; got {n}.")
            }
            MarkovError::NonFiniteRate { row, col, value } => {
                write!(f, "Generator entry ({row}, {col}) is non-finite: {value}")
            }
            MarkovError::NegativeRate { row, col, value } => {
                write!(f, "Off-diagonal rate ({row}, {col}) must be >= 0; got: {value}")
            }
            MarkovError::RowSumNotZero { row, sum } => {
                write!(f, "Generator row {row} must sum to zero; got: {sum}")
            }
            // ---- Distribution validation ----
            MarkovError::DistributionLengthMismatch { expected, actual } => {
                write!(f, "Distribution length mismatch: expected {expected}, got {actual}")
            }
            MarkovError::NonFiniteProbability { index, value } => {
                write!(f, "Probability at index {index} is non-finite: {value}")
            }
            MarkovError::NegativeProbability { index, value } => {
                write!(f, "Probability at index {index} must be >= 0; got: {value}")
            }
            MarkovError::DistributionSumNotOne { sum } => {
                write!(f, "Probabilities must sum to 1; got: {sum}")
            }
            // ---- Tolerances ----
            MarkovError::InvalidDlcTolerance { name, value } => {
                write!(f, "DLC tolerance '{name}' must be finite and >= 0; got: {value}")
            }
            // ---- Time arguments ----
            MarkovError::InvalidTime { t } => {
                write!(f, "Time must be finite and >= 0; got: {t}")
            }
            // ---- Recovery ----
            MarkovError::NoUnitEigenvalue { closest } => {
                write!(f, "Transition matrix has no unit eigenvalue; nearest is {closest} from 1")
            }
            MarkovError::InvalidRecoveredDistribution { index, value } => {
                write!(f, "Recovered limiting distribution is invalid at index {index}: {value}")
            }
            MarkovError::DecompositionFailed { routine } => {
                write!(f, "Matrix decomposition failed in {routine}.")
            }
        }
    }
}

/// Validate an elapsed time argument.
///
/// # Errors
/// Returns [`MarkovError::InvalidTime`] if `t` is NaN, infinite, or negative.
pub fn validate_time(t: f64) -> MarkovResult<()> {
    if !t.is_finite() || t < 0.0 {
        return Err(MarkovError::InvalidTime { t });
    }
    Ok(())
}
