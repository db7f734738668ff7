use thiserror::Error;

/// Reasons a ramp-and-hold program is rejected at construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("schedule has no setpoints")]
    NoSetpoints,

    #[error("{setpoints} setpoints but {hold_times} hold times")]
    LengthMismatch { setpoints: usize, hold_times: usize },

    #[error("{field} contains non-finite value {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("hold time {index} is negative: {minutes} min")]
    NegativeHold { index: usize, minutes: f64 },

    #[error("ramp rate must be positive and finite, got {rate}")]
    RampRate { rate: f64 },

    #[error("schedule has zero total duration")]
    ZeroDuration,

    #[error("breakpoints rejected by interpolator: {reason}")]
    Interpolation { reason: String },
}
