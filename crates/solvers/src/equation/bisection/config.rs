use thiserror::Error;

/// Configuration for the bisection solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Maximum number of midpoint evaluations.
    pub max_iters: usize,
    /// Absolute bracket-width tolerance.
    pub x_abs_tol: f64,
    /// Bracket-width tolerance relative to the midpoint magnitude.
    pub x_rel_tol: f64,
    /// Residual magnitude accepted as a root.
    pub residual_tol: f64,
}

/// Reasons a bisection [`Config`] is rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_iters must be at least one")]
    MaxIters,

    #[error("x_abs_tol must be finite and non-negative")]
    XAbs,

    #[error("x_rel_tol must be finite and non-negative")]
    XRel,

    #[error("residual_tol must be finite and non-negative")]
    Residual,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            x_abs_tol: 1e-12,
            x_rel_tol: 1e-12,
            residual_tol: 1e-12,
        }
    }
}

impl Config {
    /// Checks that the iteration limit is positive and all tolerances are
    /// finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }
        if !is_tolerance(self.x_abs_tol) {
            return Err(ConfigError::XAbs);
        }
        if !is_tolerance(self.x_rel_tol) {
            return Err(ConfigError::XRel);
        }
        if !is_tolerance(self.residual_tol) {
            return Err(ConfigError::Residual);
        }
        Ok(())
    }
}

fn is_tolerance(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
