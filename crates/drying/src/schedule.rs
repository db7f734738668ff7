//! Ramp-and-hold programs for a held process variable.
//!
//! A schedule starts at an initial value and visits each setpoint in turn.
//! Segment `k` lasts exactly its hold time: the value ramps from wherever
//! segment `k - 1` ended toward setpoint `k` at the ramp rate, then holds. A
//! ramp that cannot finish inside its segment is recorded as a
//! [`RampOverrun`] and the next segment picks up from the partially ramped
//! value, so the program stays continuous.
//!
//! Hold times and ramp rates are given per minute; [`ScheduleSpec::value`]
//! and [`ScheduleSpec::total_time`] work in hours.

mod error;

use ndarray::Array1;
use ninterp::{
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use serde::Deserialize;
use uom::si::{
    f64::Time,
    time::{hour, minute},
};

pub use error::ScheduleError;

/// Raw ramp-and-hold program as supplied by a caller or config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Value at time zero; defaults to the first setpoint.
    #[serde(default)]
    pub initial: Option<f64>,

    /// Ordered target values.
    pub setpoints: Vec<f64>,

    /// Duration of each segment [min], one per setpoint.
    pub hold_times: Vec<f64>,

    /// Ramp rate toward each setpoint [value units/min].
    pub ramp_rate: f64,
}

/// A segment whose ramp needed longer than its hold time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampOverrun {
    /// Zero-based segment index.
    pub segment: usize,

    /// Minutes needed to reach the setpoint.
    pub required: f64,

    /// Minutes the segment actually lasts.
    pub available: f64,

    /// Value reached when the segment ends.
    pub reached: f64,
}

/// An immutable, continuous ramp-and-hold program.
///
/// Constructed once from a [`ScheduleConfig`] and never mutated afterwards.
/// Deserializing a `ScheduleSpec` goes through the same validation.
#[derive(Deserialize)]
#[serde(try_from = "ScheduleConfig")]
pub struct ScheduleSpec {
    times: Vec<f64>,
    values: Vec<f64>,
    interp: Interp1DOwned<f64, Linear>,
    overruns: Vec<RampOverrun>,
}

impl ScheduleSpec {
    /// Builds the breakpoint table for a program.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if the program is malformed: no setpoints,
    /// mismatched lengths, non-finite values, negative holds, a non-positive
    /// ramp rate, or zero total duration.
    pub fn new(config: ScheduleConfig) -> Result<Self, ScheduleError> {
        let ScheduleConfig {
            initial,
            setpoints,
            hold_times,
            ramp_rate,
        } = config;

        let Some(&first) = setpoints.first() else {
            return Err(ScheduleError::NoSetpoints);
        };
        if setpoints.len() != hold_times.len() {
            return Err(ScheduleError::LengthMismatch {
                setpoints: setpoints.len(),
                hold_times: hold_times.len(),
            });
        }
        if !ramp_rate.is_finite() || ramp_rate <= 0.0 {
            return Err(ScheduleError::RampRate { rate: ramp_rate });
        }
        let initial = initial.unwrap_or(first);
        check_finite("initial", &[initial])?;
        check_finite("setpoints", &setpoints)?;
        check_finite("hold_times", &hold_times)?;
        if let Some((index, &minutes)) = hold_times.iter().enumerate().find(|(_, h)| **h < 0.0) {
            return Err(ScheduleError::NegativeHold { index, minutes });
        }

        let mut table = Breakpoints::new(initial);
        let mut overruns = Vec::new();
        let mut start = 0.0;
        let mut value = initial;

        for (segment, (&setpoint, &hold)) in setpoints.iter().zip(&hold_times).enumerate() {
            let end = start + hours(hold);
            let required = (setpoint - value).abs() / ramp_rate;

            if required <= hold {
                table.push(start + hours(required), setpoint);
                table.push(end, setpoint);
                value = setpoint;
            } else {
                let reached = value + (setpoint - value) * hold / required;
                tracing::debug!(
                    segment,
                    required_min = required,
                    hold_min = hold,
                    setpoint,
                    reached,
                    "ramp overruns its hold time; next segment starts from the reached value"
                );
                overruns.push(RampOverrun {
                    segment,
                    required,
                    available: hold,
                    reached,
                });
                table.push(end, reached);
                value = reached;
            }
            start = end;
        }

        let Breakpoints { times, values } = table;
        if times.len() < 2 {
            return Err(ScheduleError::ZeroDuration);
        }

        let interp = Interp1DOwned::new(
            Array1::from(times.clone()),
            Array1::from(values.clone()),
            Linear,
            Extrapolate::Clamp,
        )
        .map_err(|err| ScheduleError::Interpolation {
            reason: err.to_string(),
        })?;

        Ok(Self {
            times,
            values,
            interp,
            overruns,
        })
    }

    /// Returns the scheduled value at `time` [hr].
    ///
    /// Times before zero give the initial value and times past the end give
    /// the final value. A NaN time is treated as time zero.
    #[must_use]
    pub fn value(&self, time: f64) -> f64 {
        if time.is_nan() || time <= 0.0 {
            return self.initial_value();
        }
        if time >= self.total_time() {
            return self.final_value();
        }
        // Inside the breakpoint range with clamped extrapolation this cannot fail.
        self.interp
            .interpolate(&[time])
            .unwrap_or_else(|_| self.final_value())
    }

    /// Total duration of all segments [hr].
    #[must_use]
    pub fn total_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value at time zero.
    #[must_use]
    pub fn initial_value(&self) -> f64 {
        self.values.first().copied().unwrap_or(f64::NAN)
    }

    /// Value held after the schedule ends.
    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(f64::NAN)
    }

    /// Smallest value the schedule ever takes.
    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value the schedule ever takes.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Breakpoint times [hr] and values, strictly increasing in time.
    #[must_use]
    pub fn breakpoints(&self) -> (&[f64], &[f64]) {
        (&self.times, &self.values)
    }

    /// Segments whose ramps did not finish within their hold time.
    #[must_use]
    pub fn overruns(&self) -> &[RampOverrun] {
        &self.overruns
    }
}

impl TryFrom<ScheduleConfig> for ScheduleSpec {
    type Error = ScheduleError;

    fn try_from(config: ScheduleConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl std::fmt::Debug for ScheduleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleSpec")
            .field("times", &self.times)
            .field("values", &self.values)
            .field("overruns", &self.overruns)
            .finish_non_exhaustive()
    }
}

/// Breakpoint table that drops points which would not advance time.
struct Breakpoints {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl Breakpoints {
    fn new(initial: f64) -> Self {
        Self {
            times: vec![0.0],
            values: vec![initial],
        }
    }

    fn push(&mut self, time: f64, value: f64) {
        if self.times.last().is_some_and(|&last| time > last) {
            self.times.push(time);
            self.values.push(value);
        }
    }
}

fn hours(minutes: f64) -> f64 {
    Time::new::<minute>(minutes).get::<hour>()
}

fn check_finite(field: &'static str, values: &[f64]) -> Result<(), ScheduleError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(ScheduleError::NonFinite { field, value }),
        None => Ok(()),
    }
}
