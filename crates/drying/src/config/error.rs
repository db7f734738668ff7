use thiserror::Error;

use crate::schedule::ScheduleError;

use super::Axis;

/// Reasons a drying configuration is rejected before any step is taken.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("solute fraction must lie in [0, 1), got {value}")]
    SoluteFraction { value: f64 },

    #[error("vial count must be at least one")]
    NoVials,

    #[error("{axis} bounds must be finite")]
    NonFiniteBounds { axis: Axis },

    #[error("{axis} bounds are inverted: min {min} > max {max}")]
    InvertedBounds { axis: Axis, min: f64, max: f64 },

    #[error("both axes are scheduled; at least one must be optimized")]
    NothingToOptimize,

    #[error("invalid schedule")]
    Schedule(#[from] ScheduleError),
}
