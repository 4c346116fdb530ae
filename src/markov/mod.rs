//! markov: generators, distributions, and DLC primitives.
//!
//! Purpose
//! -------
//! Provide the continuous-time Markov building blocks the projection engine
//! needs: validated generators and their exponentials, probability vectors
//! and limiting-distribution recovery, the DLC predicate, and the expected
//! substitution count.
//!
//! Key behaviors
//! -------------
//! - [`generator::Generator`]: validated `Q` with `P(t) = exp(Q·t)`.
//! - [`distribution`]: `StateDistribution`, limit matrices, and
//!   `recover_distribution` (eigen + SVD on `Pᵀ`).
//! - [`dlc`]: `col_delta`, `violates_dlc`, `DlcTolerances`.
//! - [`substitutions::expected_subs`]: ENS(t) via a closed form or Van Loan.
//! - [`model_kind::ModelKind`]: fixed vs recovered limiting distributions.
//!
//! Conventions
//! -----------
//! - Matrices are `ndarray::Array2<f64>` at the API; `nalgebra` is used
//!   internally for exponentials and decompositions.
//! - Every fallible operation returns [`MarkovResult`]; nothing here logs.
//!
//! Testing notes
//! -------------
//! - Fixtures with closed forms (Jukes–Cantor, F81, the 4-state cycle) are
//!   used throughout so numeric checks compare against exact values.

pub mod distribution;
pub mod dlc;
pub mod errors;
pub mod generator;
pub mod model_kind;
pub mod substitutions;

pub use self::distribution::{StateDistribution, recover_distribution};
pub use self::dlc::{
    DEFAULT_BOUNDARY_TOL, DlcTolerances, col_delta, is_dlc, violates_at_boundary, violates_dlc,
    violates_dlc_with,
};
pub use self::errors::{MarkovError, MarkovResult};
pub use self::generator::Generator;
pub use self::model_kind::ModelKind;
pub use self::substitutions::expected_subs;
