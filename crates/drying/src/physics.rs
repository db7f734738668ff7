//! Pseudosteady heat and mass transfer through a drying vial.
//!
//! A frozen plug of height `L0` sits on a temperature-controlled shelf. Heat
//! flows from the shelf through the vial bottom and the remaining ice to the
//! sublimation front; vapor leaves the front through the porous dry layer of
//! thickness `L` into the chamber. At each instant the two flows balance,
//! which fixes the front temperature implicitly because vapor pressure is
//! exponential in temperature.
//!
//! Everything in this module is a pure function of its arguments.

mod correlations;
mod error;
mod front;
mod residuals;

pub use correlations::{
    heat_transfer_coefficient, initial_fill_height, recession_rate, resistance,
    sublimation_temperature, vapor_pressure,
};
pub use error::{DomainError, SolveFailure};
pub use front::{
    DryLayer, FrontConditions, FrontSolve, SublimationRate, bottom_temperature,
    front_temperature_residual, solve_front_from_bottom, solve_front_temperature,
    sublimation_rate,
};
pub use residuals::{OperatingPoint, equality_residuals, inequality_residuals};
