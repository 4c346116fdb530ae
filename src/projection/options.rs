//! Projection options: configuration for estimation, scanning, and driving.
//!
//! Purpose
//! -------
//! Collect every tunable constant of the projection engine in named,
//! validated option structs with documented defaults, so call sites pass
//! explicit configuration instead of relying on literals buried in the scan
//! and estimator code.
//!
//! Key behaviors
//! -------------
//! - [`ScanOptions`]: upper bound, step, and point budget of the chainsaw
//!   time grid.
//! - [`EstimatorOptions`]: bracketing grid, restart ladder, crossing
//!   tolerance, and the L-BFGS configuration used by the boundary estimator.
//! - [`SearchStart`]: where the chainsaw scan starts relative to `tau`.
//! - [`ProjectionOptions`]: the bundle consumed by the edge projector and
//!   tree driver, including the DLC tolerances and the parallel switch.
//!
//! Invariants & assumptions
//! ------------------------
//! - Constructors reject non-finite, non-positive, or unordered values; the
//!   `Default` impls satisfy every check.
//! - The DLC `boundary` tolerance covers the estimator's `crossing_tol`, so
//!   every accepted boundary estimate is judged as a tie at `tau`.
//! - Option structs are plain data (`Clone`, `Send`, `Sync`) and carry no
//!   state between edges.
//!
//! Testing notes
//! -------------
//! - Unit tests check the documented defaults and each validation rule.
use crate::{
    markov::dlc::{DEFAULT_BOUNDARY_TOL, DlcTolerances},
    optimization::minimizer::MinimizerOptions,
    projection::errors::{ProjectionError, ProjectionResult},
};

/// Default upper time bound of the chainsaw scan.
pub const DEFAULT_SCAN_UPPER: f64 = 1000.0;

/// Default grid spacing of the chainsaw scan.
pub const DEFAULT_SCAN_STEP: f64 = 0.1;

/// Default cap on the number of grid points of one scan.
pub const DEFAULT_SCAN_MAX_POINTS: usize = 1_000_000;

/// Default restart ladder of starting times for the boundary estimator.
pub const DEFAULT_INITIAL_TIMES: [f64; 4] = [0.01, 0.1, 1.0, 10.0];

/// Default `|col_delta|` below which an estimate counts as on the boundary.
pub const DEFAULT_CROSSING_TOL: f64 = DEFAULT_BOUNDARY_TOL;

/// Default bracketing step, in units of `1 / max exit rate`.
pub const DEFAULT_BRACKET_STEP: f64 = 0.05;

/// Default bracketing horizon, in units of `1 / max exit rate`.
pub const DEFAULT_BRACKET_HORIZON: f64 = 50.0;

/// ScanOptions: time grid of the chainsaw interval search.
///
/// Fields
/// ------
/// - `upper`: last time of the domain; an interval still open at the end of
///   the grid closes here. Default `1000`.
/// - `step`: grid spacing. Default `0.1`.
/// - `max_points`: largest grid the search will evaluate. Default `1_000_000`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOptions {
    pub upper: f64,
    pub step: f64,
    pub max_points: usize,
}

impl ScanOptions {
    /// Construct validated scan options.
    ///
    /// Errors
    /// ------
    /// - [`ProjectionError::InvalidScanOptions`] if `upper` or `step` is not
    ///   finite and strictly positive, or if `max_points == 0`.
    pub fn new(upper: f64, step: f64, max_points: usize) -> ProjectionResult<Self> {
        if !upper.is_finite() || upper <= 0.0 {
            return Err(ProjectionError::InvalidScanOptions {
                reason: "upper must be finite and > 0.",
            });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(ProjectionError::InvalidScanOptions {
                reason: "step must be finite and > 0.",
            });
        }
        if max_points == 0 {
            return Err(ProjectionError::InvalidScanOptions {
                reason: "max_points must be greater than zero.",
            });
        }
        Ok(Self { upper, step, max_points })
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            upper: DEFAULT_SCAN_UPPER,
            step: DEFAULT_SCAN_STEP,
            max_points: DEFAULT_SCAN_MAX_POINTS,
        }
    }
}

/// EstimatorOptions: configuration of the MinColDelta estimator.
///
/// Fields
/// ------
/// - `initial_times`: strictly ascending, strictly positive starting times;
///   one L-BFGS run is attempted per entry when no crossing is bracketed.
///   Default `[0.01, 0.1, 1, 10]`.
/// - `crossing_tol`: an estimate with `|col_delta| ≤ crossing_tol` is on the
///   boundary and accepted immediately. Default `1e-6`.
/// - `bracket_step`: spacing of the forward scan that brackets the first
///   sign change of `col_delta`, scaled by `1 / max exit rate`. Default
///   `0.05`.
/// - `bracket_horizon`: end of that scan in the same units. Default `50`.
/// - `minimizer`: L-BFGS tolerances, line search, memory, and time budget.
///   Default [`MinimizerOptions::default`].
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorOptions {
    pub initial_times: Vec<f64>,
    pub crossing_tol: f64,
    pub bracket_step: f64,
    pub bracket_horizon: f64,
    pub minimizer: MinimizerOptions,
}

impl EstimatorOptions {
    /// Construct validated estimator options.
    ///
    /// Errors
    /// ------
    /// - [`ProjectionError::InvalidEstimatorOptions`] if the ladder is empty,
    ///   holds a non-finite or non-positive time, or is not strictly
    ///   ascending, if `crossing_tol` is negative or non-finite, or if the
    ///   bracketing step and horizon are not finite with `0 < step ≤ horizon`.
    pub fn new(
        initial_times: Vec<f64>, crossing_tol: f64, bracket_step: f64, bracket_horizon: f64,
        minimizer: MinimizerOptions,
    ) -> ProjectionResult<Self> {
        if initial_times.is_empty() {
            return Err(ProjectionError::InvalidEstimatorOptions {
                reason: "initial_times must not be empty.",
            });
        }
        if initial_times.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(ProjectionError::InvalidEstimatorOptions {
                reason: "initial_times must be finite and > 0.",
            });
        }
        if initial_times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ProjectionError::InvalidEstimatorOptions {
                reason: "initial_times must be strictly ascending.",
            });
        }
        if !crossing_tol.is_finite() || crossing_tol < 0.0 {
            return Err(ProjectionError::InvalidEstimatorOptions {
                reason: "crossing_tol must be finite and >= 0.",
            });
        }
        if !bracket_step.is_finite() || bracket_step <= 0.0 {
            return Err(ProjectionError::InvalidEstimatorOptions {
                reason: "bracket_step must be finite and > 0.",
            });
        }
        if !bracket_horizon.is_finite() || bracket_horizon < bracket_step {
            return Err(ProjectionError::InvalidEstimatorOptions {
                reason: "bracket_horizon must be finite and >= bracket_step.",
            });
        }
        Ok(Self { initial_times, crossing_tol, bracket_step, bracket_horizon, minimizer })
    }
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            initial_times: DEFAULT_INITIAL_TIMES.to_vec(),
            crossing_tol: DEFAULT_CROSSING_TOL,
            bracket_step: DEFAULT_BRACKET_STEP,
            bracket_horizon: DEFAULT_BRACKET_HORIZON,
            minimizer: MinimizerOptions::default(),
        }
    }
}

/// Where the chainsaw scan starts once a violation is found at `tau`.
///
/// - `ScaledByBranchLength` (default): `tau · branch_length`.
/// - `Tau`: `tau` itself, ignoring the branch length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStart {
    #[default]
    ScaledByBranchLength,
    Tau,
}

impl SearchStart {
    /// Resolve the scan start for a given `tau` and branch length.
    pub fn resolve(&self, tau: f64, branch_length: f64) -> f64 {
        match self {
            SearchStart::ScaledByBranchLength => tau * branch_length,
            SearchStart::Tau => tau,
        }
    }
}

/// ProjectionOptions: bundle consumed by the edge projector and tree driver.
///
/// Fields
/// ------
/// - `scan`: [`ScanOptions`] for the chainsaw search.
/// - `estimator`: [`EstimatorOptions`] for the default boundary estimator.
/// - `dlc`: [`DlcTolerances`] shared by the `tau` check and the scan; its
///   `boundary` must be at least `estimator.crossing_tol`.
/// - `search_start`: [`SearchStart`] policy.
/// - `parallel`: map edges with rayon when `true`. Default `false`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionOptions {
    pub scan: ScanOptions,
    pub estimator: EstimatorOptions,
    pub dlc: DlcTolerances,
    pub search_start: SearchStart,
    pub parallel: bool,
}

impl ProjectionOptions {
    /// Bundle already-validated components.
    ///
    /// Errors
    /// ------
    /// - [`ProjectionError::InvalidEstimatorOptions`] if
    ///   `estimator.crossing_tol` exceeds `dlc.boundary`; an accepted boundary
    ///   estimate could then pass the check at `tau` by rounding alone.
    pub fn new(
        scan: ScanOptions, estimator: EstimatorOptions, dlc: DlcTolerances,
        search_start: SearchStart, parallel: bool,
    ) -> ProjectionResult<Self> {
        if estimator.crossing_tol > dlc.boundary {
            return Err(ProjectionError::InvalidEstimatorOptions {
                reason: "crossing_tol must not exceed the DLC boundary tolerance.",
            });
        }
        Ok(Self { scan, estimator, dlc, search_start, parallel })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Documented defaults of every option struct.
    // - Validation rules of `ScanOptions::new`, `EstimatorOptions::new`, and
    //   `ProjectionOptions::new`.
    // - `SearchStart::resolve` for both policies.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults match the documented constants.
    //
    // Given
    // -----
    // - `ProjectionOptions::default()`.
    //
    // Expect
    // ------
    // - Scan `(1000, 0.1, 1e6)`, ladder `[0.01, 0.1, 1, 10]`, crossing `1e-6`
    //   equal to the DLC boundary tolerance, bracket `(0.05, 50)`, scaled
    //   search start, sequential driving.
    fn defaults_match_documented_values() {
        let opts = ProjectionOptions::default();

        assert_eq!(opts.scan, ScanOptions::new(1000.0, 0.1, 1_000_000).expect("valid"));
        assert_eq!(opts.estimator.initial_times, vec![0.01, 0.1, 1.0, 10.0]);
        assert_eq!(opts.estimator.crossing_tol, 1e-6);
        assert_eq!(opts.estimator.crossing_tol, opts.dlc.boundary);
        assert_eq!((opts.estimator.bracket_step, opts.estimator.bracket_horizon), (0.05, 50.0));
        assert_eq!(opts.search_start, SearchStart::ScaledByBranchLength);
        assert_eq!(opts.dlc, DlcTolerances::default());
        assert!(!opts.parallel);
    }

    #[test]
    // Purpose
    // -------
    // Scan options reject degenerate grids.
    //
    // Given
    // -----
    // - `step = 0`, `upper = ∞`, `max_points = 0`.
    //
    // Expect
    // ------
    // - `InvalidScanOptions` for each.
    fn scan_options_reject_degenerate_grids() {
        assert!(matches!(
            ScanOptions::new(10.0, 0.0, 10),
            Err(ProjectionError::InvalidScanOptions { .. })
        ));
        assert!(matches!(
            ScanOptions::new(f64::INFINITY, 0.1, 10),
            Err(ProjectionError::InvalidScanOptions { .. })
        ));
        assert!(matches!(
            ScanOptions::new(10.0, 0.1, 0),
            Err(ProjectionError::InvalidScanOptions { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The restart ladder must be non-empty, positive, and strictly ascending.
    //
    // Given
    // -----
    // - `[]`, `[0.1, -1]`, `[1, 0.1]`, a negative crossing tolerance, and a
    //   bracketing horizon shorter than its step.
    //
    // Expect
    // ------
    // - `InvalidEstimatorOptions` for each.
    fn estimator_options_validate_ladder() {
        let m = MinimizerOptions::default;

        for ladder in [vec![], vec![0.1, -1.0], vec![1.0, 0.1]] {
            assert!(matches!(
                EstimatorOptions::new(ladder, 1e-6, 0.05, 50.0, m()),
                Err(ProjectionError::InvalidEstimatorOptions { .. })
            ));
        }
        assert!(matches!(
            EstimatorOptions::new(vec![1.0], -1.0, 0.05, 50.0, m()),
            Err(ProjectionError::InvalidEstimatorOptions { .. })
        ));
        assert!(matches!(
            EstimatorOptions::new(vec![1.0], 1e-6, 0.5, 0.1, m()),
            Err(ProjectionError::InvalidEstimatorOptions { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The check at `tau` must cover every estimate the estimator accepts.
    //
    // Given
    // -----
    // - `crossing_tol = 1e-5` against the default `boundary = 1e-6`, then
    //   against `boundary = 1e-5`.
    //
    // Expect
    // ------
    // - `InvalidEstimatorOptions` first, `Ok` second.
    fn projection_options_tie_boundary_to_crossing_tol() {
        let estimator =
            EstimatorOptions::new(vec![1.0], 1e-5, 0.05, 50.0, MinimizerOptions::default())
                .expect("valid estimator options");
        let wide = DlcTolerances::new(1e-9, 1e-6, 1e-5).expect("valid tolerances");
        let build = |dlc| {
            ProjectionOptions::new(
                ScanOptions::default(),
                estimator.clone(),
                dlc,
                SearchStart::default(),
                false,
            )
        };

        assert!(matches!(
            build(DlcTolerances::default()),
            Err(ProjectionError::InvalidEstimatorOptions { .. })
        ));
        assert!(build(wide).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Both search-start policies resolve as documented.
    //
    // Given
    // -----
    // - `tau = 1.5`, branch length `2`.
    //
    // Expect
    // ------
    // - `3.0` when scaled, `1.5` for `Tau`.
    fn search_start_resolves_both_policies() {
        assert_eq!(SearchStart::ScaledByBranchLength.resolve(1.5, 2.0), 3.0);
        assert_eq!(SearchStart::Tau.resolve(1.5, 2.0), 1.5);
    }
}
