use std::fmt;

use serde::Deserialize;

use crate::schedule::ScheduleSpec;

use super::ConfigError;

/// One of the two process variables the dryer can manipulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Chamber pressure [Torr].
    Pressure,
    /// Shelf temperature [°C].
    Temperature,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Pressure => f.write_str("chamber pressure"),
            Axis::Temperature => f.write_str("shelf temperature"),
        }
    }
}

/// Box constraint for an optimized axis.
///
/// A missing `max` leaves the axis unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizationBounds {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl OptimizationBounds {
    #[must_use]
    pub fn new(min: f64, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within the bounds, widened by `tol`.
    #[must_use]
    pub fn contains(&self, value: f64, tol: f64) -> bool {
        value >= self.min - tol && self.max.is_none_or(|max| value <= max + tol)
    }

    fn validate(&self, axis: Axis) -> Result<(), ConfigError> {
        let finite = self.min.is_finite() && self.max.is_none_or(f64::is_finite);
        if !finite {
            return Err(ConfigError::NonFiniteBounds { axis });
        }
        if let Some(max) = self.max
            && max < self.min
        {
            return Err(ConfigError::InvertedBounds {
                axis,
                min: self.min,
                max,
            });
        }
        if axis == Axis::Pressure && self.min <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "pressure.bounds.min",
                value: self.min,
            });
        }
        Ok(())
    }
}

/// How one axis is driven over a run: by a fixed program, or by the optimizer.
///
/// The two representations are mutually exclusive. In a config file the axis
/// is a table with exactly one of the keys `schedule` or `bounds`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSpec {
    /// Held to a ramp-and-hold program.
    Schedule(ScheduleSpec),
    /// Chosen by the optimizer within bounds.
    Bounds(OptimizationBounds),
}

impl AxisSpec {
    /// Returns true if the optimizer chooses this axis.
    #[must_use]
    pub fn is_optimized(&self) -> bool {
        matches!(self, AxisSpec::Bounds(_))
    }

    /// The schedule, if this axis is held.
    #[must_use]
    pub fn schedule(&self) -> Option<&ScheduleSpec> {
        match self {
            AxisSpec::Schedule(schedule) => Some(schedule),
            AxisSpec::Bounds(_) => None,
        }
    }

    /// The bounds, if this axis is optimized.
    #[must_use]
    pub fn bounds(&self) -> Option<OptimizationBounds> {
        match self {
            AxisSpec::Schedule(_) => None,
            AxisSpec::Bounds(bounds) => Some(*bounds),
        }
    }

    /// The per-instant setting of this axis at `time` [hr].
    #[must_use]
    pub fn at(&self, time: f64) -> AxisSetting {
        match self {
            AxisSpec::Schedule(schedule) => AxisSetting::Held(schedule.value(time)),
            AxisSpec::Bounds(bounds) => AxisSetting::Bounded(*bounds),
        }
    }

    /// Smallest and largest values the axis can take over a run.
    ///
    /// An unbounded maximum is reported as `None`.
    #[must_use]
    pub fn range(&self) -> (f64, Option<f64>) {
        match self {
            AxisSpec::Schedule(schedule) => (schedule.min_value(), Some(schedule.max_value())),
            AxisSpec::Bounds(bounds) => (bounds.min, bounds.max),
        }
    }

    pub(super) fn validate(&self, axis: Axis) -> Result<(), ConfigError> {
        match self {
            AxisSpec::Bounds(bounds) => bounds.validate(axis),
            AxisSpec::Schedule(schedule) => {
                if axis == Axis::Pressure && schedule.min_value() <= 0.0 {
                    return Err(ConfigError::NotPositive {
                        field: "pressure.schedule",
                        value: schedule.min_value(),
                    });
                }
                Ok(())
            }
        }
    }
}

/// The state of one axis at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisSetting {
    /// Pinned to a scheduled value.
    Held(f64),
    /// Free within bounds.
    Bounded(OptimizationBounds),
}

impl AxisSetting {
    /// The pinned value, if held.
    #[must_use]
    pub fn held(&self) -> Option<f64> {
        match self {
            AxisSetting::Held(value) => Some(*value),
            AxisSetting::Bounded(_) => None,
        }
    }
}
