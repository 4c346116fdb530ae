//! Positive-time reparameterization.
//!
//! The boundary estimator searches over an unconstrained scalar `θ` and maps
//! it to a strictly positive time `t = softplus(θ)`. Both directions are
//! guarded so neither overflows for large inputs nor loses precision for
//! inputs close to zero.
//!
//! # Provided items
//! - [`SOFTPLUS_LINEAR_CUTOFF`]: above this input the softplus is the identity
//!   to `f64` precision.
//! - [`safe_softplus(x)`]: `ln(1 + exp(x))`, mapping ℝ → (0, ∞).
//! - [`safe_softplus_inv(x)`]: `ln(exp(x) - 1)`, mapping (0, ∞) → ℝ.

/// Input above which `ln(1 + exp(x))` and `x` agree to `f64` precision.
pub const SOFTPLUS_LINEAR_CUTOFF: f64 = 20.0;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// # Returns
/// - `x` itself when `x > SOFTPLUS_LINEAR_CUTOFF`, otherwise `ln1p(exp(x))`.
///   The result is strictly positive for every finite `x` above roughly
///   `-745`; below that `exp(x)` underflows and the result is `0.0`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > SOFTPLUS_LINEAR_CUTOFF { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`.
///
/// Solves `softplus(t) = x` for `t = ln(exp(x) - 1)`, using `expm1` for
/// small `x` so that starting times like `0.01` invert without cancellation.
///
/// # Parameters
/// - `x`: a finite, strictly positive time.
///
/// # Returns
/// - `t` such that `safe_softplus(t) ≈ x`. Non-positive `x` yields `NaN` or
///   `-∞`; callers validate positivity before inverting.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > SOFTPLUS_LINEAR_CUTOFF { x } else { x.exp_m1().ln() }
}
