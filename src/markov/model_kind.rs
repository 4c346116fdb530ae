//! markov::model_kind: which limiting distribution a model implies.
//!
//! Stationary models keep the root distribution as their limit. Non-stationary
//! models (general non-reversible "GN" and strand-symmetric "ssGN") converge
//! to a distribution that must be recovered from the transition matrix.
use crate::markov::{
    distribution::{StateDistribution, recover_distribution},
    errors::MarkovResult,
};
use ndarray::Array2;
use std::{fmt, str::FromStr};

/// Model names that imply a non-stationary process.
pub const NON_STATIONARY_MODELS: [&str; 2] = ["GN", "ssGN"];

/// Closed set of model kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelKind {
    #[default]
    Stationary,
    NonStationary,
}

impl ModelKind {
    /// Classify a substitution-model name. Matching is exact (`"GN"`,
    /// `"ssGN"`); any other name is stationary.
    pub fn from_model_name(name: &str) -> Self {
        if NON_STATIONARY_MODELS.contains(&name) {
            ModelKind::NonStationary
        } else {
            ModelKind::Stationary
        }
    }

    /// Limiting distribution to compare `p` against.
    ///
    /// # Errors
    /// Propagates [`recover_distribution`] failures for non-stationary kinds.
    pub fn resolve_limit(
        &self, p: &Array2<f64>, root_distribution: &StateDistribution,
    ) -> MarkovResult<StateDistribution> {
        match self {
            ModelKind::Stationary => Ok(root_distribution.clone()),
            ModelKind::NonStationary => recover_distribution(p),
        }
    }
}

impl FromStr for ModelKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_model_name(s))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Stationary => write!(f, "stationary"),
            ModelKind::NonStationary => write!(f, "non-stationary"),
        }
    }
}
