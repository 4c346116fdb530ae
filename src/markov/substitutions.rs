//! markov::substitutions: expected number of substitutions along a branch.
//!
//! ENS(t) = ∫₀ᵗ p0 · exp(Q s) · r ds, with exit rates `r_i = −Q[i][i]`.
//!
//! When `p0` is stationary for `Q` (`‖p0 Q‖∞ ≤ STATIONARY_TOL`) the integrand
//! is constant and ENS(t) = t · Σ p0_i r_i. Otherwise the integral is read off
//! the top-right block of the Van Loan exponential
//!
//! ```text
//! exp( [[Q, diag(r)],
//!       [0,       0]] · t )  =  [[exp(Qt), ∫₀ᵗ exp(Qs) ds · diag(r)],
//!                                [0,       I                     ]]
//! ```
use crate::markov::{
    distribution::StateDistribution,
    errors::{MarkovResult, validate_time},
    generator::Generator,
};
use nalgebra::DMatrix;

/// Threshold on `‖p0 Q‖∞` below which the closed form is used.
pub const STATIONARY_TOL: f64 = 1e-10;

/// Expected number of substitutions over elapsed time `t`.
///
/// # Errors
/// - `MarkovError::InvalidTime`
///   if `t` is negative or non-finite.
/// - `MarkovError::DistributionLengthMismatch`
///   if `root_distribution` does not cover the generator's states.
pub fn expected_subs(
    generator: &Generator, root_distribution: &StateDistribution, t: f64,
) -> MarkovResult<f64> {
    validate_time(t)?;
    let n = generator.n_states();
    root_distribution.check_states(n)?;

    let q = generator.rates();
    let p0 = root_distribution.probs();
    let r = generator.exit_rates();

    let drift = p0.dot(q).iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if drift <= STATIONARY_TOL {
        return Ok(t * p0.dot(&r));
    }

    let mut block = DMatrix::<f64>::zeros(2 * n, 2 * n);
    for i in 0..n {
        for j in 0..n {
            block[(i, j)] = q[[i, j]] * t;
        }
        block[(i, n + i)] = r[i] * t;
    }
    let integral = block.exp();

    let mut ens = 0.0;
    for i in 0..n {
        for j in 0..n {
            ens += p0[i] * integral[(i, n + j)];
        }
    }
    Ok(ens)
}
