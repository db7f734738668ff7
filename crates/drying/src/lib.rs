//! Primary-drying trajectory optimization for vial freeze-drying.
//!
//! A run chooses chamber pressure, shelf temperature, or both, step by step,
//! so that ice sublimes as fast as the product and the dryer allow:
//!
//! - [`physics`]: the pseudosteady heat and mass balance at the sublimation
//!   front, with the correlations it depends on
//! - [`schedule`]: ramp-and-hold programs for an axis that is not optimized
//! - [`config`]: validated, deserializable run inputs
//! - [`step`]: the constrained optimization of one operating point
//! - [`trajectory`]: the time loop that strings steps into a drying run
//!
//! # Example
//!
//! ```ignore
//! use lyo_drying::{DryingConfig, TrajectoryOptimizer};
//!
//! let config: DryingConfig = toml::from_str(&text)?;
//! let trajectory = TrajectoryOptimizer::new(config)?.run();
//!
//! for record in &trajectory.records {
//!     println!("{:.2} hr: {:.1} mTorr", record.time, record.chamber_pressure);
//! }
//! ```

pub mod config;
pub mod constants;
pub mod physics;
pub mod schedule;
pub mod step;
pub mod trajectory;

pub use config::{AxisSpec, ConfigError, DryingConfig, OptimizationBounds};
pub use schedule::{ScheduleConfig, ScheduleError, ScheduleSpec};
pub use step::{StepError, StepSolution, StepSolver};
pub use trajectory::{
    Action, Event, OutputRecord, Status, Trajectory, TrajectoryOptimizer, Variant, Warning,
};
