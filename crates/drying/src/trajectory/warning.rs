use std::error::Error as StdError;

use thiserror::Error;

use crate::config::Axis;

/// A non-fatal condition met while optimizing a trajectory.
///
/// Warnings never stop a run on their own; the trajectory computed so far is
/// always returned alongside them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    #[error("{axis} schedule segment {segment} ramps for {required:.1} min but lasts {available:.1}")]
    RampOverrun {
        axis: Axis,
        segment: usize,
        required: f64,
        available: f64,
    },

    #[error("equipment capacity is negative ({capacity:.4} kg/hr) at {pressure} Torr")]
    NegativeCapacity { pressure: f64, capacity: f64 },

    #[error("no sublimation at t = {time:.4} hr")]
    NoSublimation { time: f64 },

    #[error("step optimization failed at t = {time:.4} hr: {reason}")]
    OptimizationFailure { time: f64, reason: String },

    #[error("drying incomplete at t = {time:.4} hr with {dried_fraction:.4} dried")]
    DryingIncomplete { time: f64, dried_fraction: f64 },
}

impl Warning {
    /// Logs the warning as a `tracing` event with its fields attached.
    pub(super) fn log(&self) {
        match self {
            Warning::RampOverrun {
                axis,
                segment,
                required,
                available,
            } => tracing::warn!(%axis, segment, required, available, "{self}"),
            Warning::NegativeCapacity { pressure, capacity } => {
                tracing::warn!(pressure, capacity, "{self}");
            }
            Warning::NoSublimation { time } => tracing::warn!(time, "{self}"),
            Warning::OptimizationFailure { time, reason } => {
                tracing::warn!(
                    time,
                    reason = reason.as_str(),
                    "step optimization failed; using fallback"
                );
            }
            Warning::DryingIncomplete {
                time,
                dried_fraction,
            } => tracing::warn!(time, dried_fraction, "{self}"),
        }
    }
}

/// An error message followed by each of its sources, colon-separated.
pub(super) fn describe(err: &dyn StdError) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}
