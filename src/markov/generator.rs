//! markov::generator: validated rate matrices and their exponentials.
//!
//! Purpose
//! -------
//! Represent a continuous-time Markov generator `Q` (an `n×n` rate matrix)
//! and compute transition matrices `P(t) = exp(Q·t)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n ≥ 2`, every entry finite, off-diagonals `≥ 0`, and every row sums
//!   to zero within [`GENERATOR_ROW_SUM_TOL`].
//! - A `Generator` is immutable after construction; "rebalancing" returns a
//!   new value.
//!
//! Conventions
//! -----------
//! - Storage is `ndarray::Array2<f64>` in row-major orientation: `Q[[i, j]]`
//!   is the rate from state `i` to state `j`.
//! - The exponential is delegated to `nalgebra::DMatrix::exp`; conversion
//!   between the two matrix types happens only inside this module and the
//!   other `markov` helpers.
use crate::markov::errors::{MarkovError, MarkovResult, validate_time};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Tolerance on `|Σ_j Q[i][j]|` accepted by [`Generator::new`].
pub const GENERATOR_ROW_SUM_TOL: f64 = 1e-8;

/// Continuous-time Markov generator (rate matrix).
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    rates: Array2<f64>,
}

impl Generator {
    /// Construct a validated generator.
    ///
    /// # Errors
    /// - [`MarkovError::NonSquareGenerator`] / [`MarkovError::GeneratorTooSmall`]
    ///   for malformed shapes.
    /// - [`MarkovError::NonFiniteRate`] for any NaN/±inf entry.
    /// - [`MarkovError::NegativeRate`] for a negative off-diagonal.
    /// - [`MarkovError::RowSumNotZero`] when `|Σ_j Q[i][j]| > GENERATOR_ROW_SUM_TOL`.
    pub fn new(rates: Array2<f64>) -> MarkovResult<Self> {
        let (rows, cols) = rates.dim();
        if rows != cols {
            return Err(MarkovError::NonSquareGenerator { rows, cols });
        }
        if rows < 2 {
            return Err(MarkovError::GeneratorTooSmall { n: rows });
        }
        for ((row, col), &value) in rates.indexed_iter() {
            if !value.is_finite() {
                return Err(MarkovError::NonFiniteRate { row, col, value });
            }
            if row != col && value < 0.0 {
                return Err(MarkovError::NegativeRate { row, col, value });
            }
        }
        for (row, r) in rates.outer_iter().enumerate() {
            let sum = r.sum();
            if sum.abs() > GENERATOR_ROW_SUM_TOL {
                return Err(MarkovError::RowSumNotZero { row, sum });
            }
        }
        Ok(Self { rates })
    }

    /// Number of states `n`.
    pub fn n_states(&self) -> usize {
        self.rates.nrows()
    }

    /// Borrow the rate matrix.
    pub fn rates(&self) -> &Array2<f64> {
        &self.rates
    }

    /// Exit rates `r_i = -Q[i][i]`.
    pub fn exit_rates(&self) -> Array1<f64> {
        self.rates.diag().mapv(|q| -q)
    }

    /// Copy of this generator whose diagonal is recomputed as minus the
    /// off-diagonal row sum, so rows sum to zero exactly (up to rounding).
    pub fn rebalanced(&self) -> Self {
        let mut rates = self.rates.clone();
        for i in 0..rates.nrows() {
            let off_diagonal: f64 =
                rates.row(i).iter().enumerate().filter(|&(j, _)| j != i).map(|(_, &q)| q).sum();
            rates[[i, i]] = -off_diagonal;
        }
        Self { rates }
    }

    /// Transition matrix `P(t) = exp(Q·t)`.
    ///
    /// # Errors
    /// [`MarkovError::InvalidTime`] if `t` is not finite or is negative.
    ///
    /// # Notes
    /// `P(0)` is the identity. Entries may carry rounding noise of order
    /// machine epsilon (including tiny negatives); no clamping is applied.
    pub fn transition_matrix(&self, t: f64) -> MarkovResult<Array2<f64>> {
        validate_time(t)?;
        let scaled = to_dmatrix(&self.rates) * t;
        Ok(from_dmatrix(&scaled.exp()))
    }
}

/// Copy an `ndarray` matrix into an `nalgebra` matrix.
pub(crate) fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = a.dim();
    DMatrix::from_fn(rows, cols, |i, j| a[[i, j]])
}

/// Copy an `nalgebra` matrix into an `ndarray` matrix.
pub(crate) fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation rules of `Generator::new`.
    // - `P(0) = I`, row-stochasticity, and a closed-form Jukes–Cantor check.
    // - `rebalanced` recomputing the diagonal.
    // -------------------------------------------------------------------------

    fn jukes_cantor(mu: f64) -> Generator {
        let a = mu / 3.0;
        Generator::new(array![
            [-mu, a, a, a],
            [a, -mu, a, a],
            [a, a, -mu, a],
            [a, a, a, -mu]
        ])
        .expect("JC generator is valid")
    }

    #[test]
    // Purpose
    // -------
    // Malformed rate matrices are rejected with the matching variant.
    //
    // Given
    // -----
    // - A 2×3 matrix, a 1×1 matrix, a negative off-diagonal, a NaN, and a
    //   row summing to 0.1.
    //
    // Expect
    // ------
    // - `NonSquareGenerator`, `GeneratorTooSmall`, `NegativeRate`,
    //   `NonFiniteRate`, `RowSumNotZero`.
    fn new_rejects_malformed_generators() {
        assert!(matches!(
            Generator::new(Array2::zeros((2, 3))),
            Err(MarkovError::NonSquareGenerator { rows: 2, cols: 3 })
        ));
        assert!(matches!(
            Generator::new(Array2::zeros((1, 1))),
            Err(MarkovError::GeneratorTooSmall { n: 1 })
        ));
        assert!(matches!(
            Generator::new(array![[1.0, -1.0], [1.0, -1.0]]),
            Err(MarkovError::NegativeRate { row: 0, col: 1, .. })
        ));
        assert!(matches!(
            Generator::new(array![[-1.0, 1.0], [f64::NAN, -1.0]]),
            Err(MarkovError::NonFiniteRate { row: 1, col: 0, .. })
        ));
        assert!(matches!(
            Generator::new(array![[-1.0, 1.1], [1.0, -1.0]]),
            Err(MarkovError::RowSumNotZero { row: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `P(0)` is the identity and `P(t)` rows sum to one.
    //
    // Given
    // -----
    // - An asymmetric 3-state generator at `t = 0` and `t = 2.7`.
    //
    // Expect
    // ------
    // - Identity at zero; unit row sums and non-negative entries at 2.7.
    fn transition_matrix_is_identity_at_zero_and_row_stochastic() {
        let q = Generator::new(array![[-0.9, 0.4, 0.5], [0.2, -0.3, 0.1], [1.5, 0.5, -2.0]])
            .expect("valid generator");

        let p0 = q.transition_matrix(0.0).expect("t = 0 is valid");
        let pt = q.transition_matrix(2.7).expect("t = 2.7 is valid");

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(p0[[i, j]], expected, epsilon = 1e-14);
                assert!(pt[[i, j]] > -1e-14);
            }
            assert_abs_diff_eq!(pt.row(i).sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The exponential agrees with the Jukes–Cantor closed form.
    //
    // Given
    // -----
    // - JC with `μ = 1` at `t = 0.6`.
    //
    // Expect
    // ------
    // - `P_ii = 1/4 + 3/4·e^{-4t/3}`, `P_ij = 1/4 - 1/4·e^{-4t/3}`.
    fn transition_matrix_matches_jukes_cantor() {
        let t = 0.6;
        let decay = (-4.0 * t / 3.0_f64).exp();

        let p = jukes_cantor(1.0).transition_matrix(t).expect("valid time");

        assert_abs_diff_eq!(p[[0, 0]], 0.25 + 0.75 * decay, epsilon = 1e-12);
        assert_abs_diff_eq!(p[[2, 1]], 0.25 - 0.25 * decay, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Negative and non-finite times are rejected.
    //
    // Given
    // -----
    // - `t = -0.5` and `t = NaN`.
    //
    // Expect
    // ------
    // - `InvalidTime` for both.
    fn transition_matrix_rejects_invalid_times() {
        let q = jukes_cantor(1.0);

        assert!(matches!(q.transition_matrix(-0.5), Err(MarkovError::InvalidTime { .. })));
        assert!(matches!(q.transition_matrix(f64::NAN), Err(MarkovError::InvalidTime { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `rebalanced` replaces the diagonal with minus the off-diagonal sum.
    //
    // Given
    // -----
    // - A generator whose first row sums to `5e-9` (inside tolerance).
    //
    // Expect
    // ------
    // - Diagonal becomes `-0.3` exactly; exit rates follow.
    fn rebalanced_recomputes_diagonal() {
        let q = Generator::new(array![[-0.299999995, 0.3], [0.7, -0.7]]).expect("within tol");

        let fitted = q.rebalanced();

        assert_eq!(fitted.rates()[[0, 0]], -0.3);
        assert_eq!(fitted.exit_rates(), array![0.3, 0.7]);
        assert_eq!(fitted.n_states(), 2);
    }
}
