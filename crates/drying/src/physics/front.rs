use lyo_solvers::equation::bisection;

use crate::{
    config::CakeResistance,
    constants::{HEAT_OF_SUBLIMATION, HR_TO_S, ICE_CONDUCTIVITY, KG_TO_G},
};

use super::{DomainError, SolveFailure, resistance, sublimation_temperature, vapor_pressure};

/// Front-temperature root finding works to a tenth of a nanokelvin.
const FRONT_SOLVER: bisection::Config = bisection::Config {
    max_iters: 200,
    x_abs_tol: 1e-10,
    x_rel_tol: 0.0,
    residual_tol: 0.0,
};

/// Thickness state of the drying plug at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DryLayer {
    /// Initial height of the frozen plug [cm].
    pub fill_height: f64,

    /// Current dry-layer thickness [cm].
    pub cake_length: f64,

    /// Dry-layer resistance at `cake_length` [cm²·hr·Torr/g].
    pub resistance: f64,
}

impl DryLayer {
    /// Builds the layer state, evaluating resistance at `cake_length`.
    #[must_use]
    pub fn new(fill_height: f64, cake_length: f64, params: &CakeResistance) -> Self {
        Self {
            fill_height,
            cake_length,
            resistance: resistance(cake_length, params),
        }
    }

    /// Remaining frozen thickness [cm].
    #[must_use]
    pub fn frozen_thickness(&self) -> f64 {
        (self.fill_height - self.cake_length).max(0.0)
    }
}

/// Inputs to the pseudosteady energy balance at the sublimation front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontConditions {
    /// Chamber pressure [Torr].
    pub chamber_pressure: f64,

    /// Shelf temperature [°C].
    pub shelf_temperature: f64,

    /// Vial cross-section [cm²].
    pub vial_area: f64,

    /// Product cross-section [cm²].
    pub product_area: f64,

    /// Vial heat-transfer coefficient [cal/(s·K·cm²)].
    pub heat_transfer_coefficient: f64,

    pub layer: DryLayer,
}

/// Outcome of an implicit front-temperature solve.
///
/// `NoSublimation` is a physical answer, not a failure: the shelf is at or
/// below the frost point, so no front temperature gives a positive flux.
#[derive(Debug)]
pub enum FrontSolve {
    /// The front temperature [°C].
    Converged(f64),
    /// No positive sublimation rate is possible.
    NoSublimation,
    /// The numerical solve failed.
    Failed(SolveFailure),
}

impl FrontSolve {
    /// The converged temperature, if any.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        match self {
            FrontSolve::Converged(t) => Some(*t),
            FrontSolve::NoSublimation | FrontSolve::Failed(_) => None,
        }
    }

    /// Splits numerical failure from the two physical outcomes.
    ///
    /// # Errors
    ///
    /// Returns the [`SolveFailure`] when the solve failed.
    pub fn into_result(self) -> Result<Option<f64>, SolveFailure> {
        match self {
            FrontSolve::Converged(t) => Ok(Some(t)),
            FrontSolve::NoSublimation => Ok(None),
            FrontSolve::Failed(err) => Err(err),
        }
    }
}

/// Per-vial sublimation rate, clamped at zero driving force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SublimationRate {
    /// Positive rate [kg/hr].
    Subliming(f64),
    /// Front vapor pressure does not exceed chamber pressure.
    NoSublimation,
}

impl SublimationRate {
    /// The rate [kg/hr], zero when not subliming.
    #[must_use]
    pub fn kg_per_hr(&self) -> f64 {
        match self {
            SublimationRate::Subliming(rate) => *rate,
            SublimationRate::NoSublimation => 0.0,
        }
    }
}

/// Heat imbalance at the front [cal/s] for a trial front temperature [°C].
///
/// Latent heat consumed by sublimation minus heat delivered from the shelf
/// through the vial bottom. Zero at the pseudosteady front temperature,
/// negative below it, positive above it.
///
/// # Errors
///
/// Returns a [`DomainError`] if the trial temperature is outside the
/// vapor-pressure correlation.
pub fn front_temperature_residual(
    front_temperature: f64,
    conditions: &FrontConditions,
) -> Result<f64, DomainError> {
    let FrontConditions {
        chamber_pressure,
        shelf_temperature,
        vial_area,
        product_area,
        heat_transfer_coefficient,
        layer,
    } = *conditions;

    let front_pressure = vapor_pressure(front_temperature)?;
    let latent = HEAT_OF_SUBLIMATION * (front_pressure - chamber_pressure) * product_area
        / layer.resistance
        / HR_TO_S;
    let bottom =
        front_temperature + latent / product_area / ICE_CONDUCTIVITY * layer.frozen_thickness();

    Ok(latent - heat_transfer_coefficient * vial_area * (shelf_temperature - bottom))
}

/// Solves the energy balance for the front temperature.
///
/// The root is bracketed between the frost point of the chamber and the shelf
/// temperature. A shelf at or below the frost point gives
/// [`FrontSolve::NoSublimation`].
#[must_use]
pub fn solve_front_temperature(conditions: &FrontConditions) -> FrontSolve {
    let frost = match sublimation_temperature(conditions.chamber_pressure) {
        Ok(t) => t,
        Err(err) => return FrontSolve::Failed(err.into()),
    };
    if conditions.shelf_temperature <= frost {
        return FrontSolve::NoSublimation;
    }

    bracketed(
        |t| front_temperature_residual(t, conditions),
        [frost, conditions.shelf_temperature],
    )
}

/// Finds the front temperature whose conduction profile puts the vial bottom
/// at `bottom_temperature` [°C].
///
/// A target at or below the frost point gives [`FrontSolve::NoSublimation`].
#[must_use]
pub fn solve_front_from_bottom(
    bottom_target: f64,
    chamber_pressure: f64,
    layer: &DryLayer,
) -> FrontSolve {
    let frost = match sublimation_temperature(chamber_pressure) {
        Ok(t) => t,
        Err(err) => return FrontSolve::Failed(err.into()),
    };
    if bottom_target <= frost {
        return FrontSolve::NoSublimation;
    }

    bracketed(
        |t| bottom_temperature(t, layer, chamber_pressure).map(|bottom| bottom - bottom_target),
        [frost, bottom_target],
    )
}

fn bracketed<F>(residual: F, bracket: [f64; 2]) -> FrontSolve
where
    F: FnMut(f64) -> Result<f64, DomainError>,
{
    match bisection::solve(residual, bracket, &FRONT_SOLVER) {
        Ok(solution) if solution.is_converged() => FrontSolve::Converged(solution.x),
        Ok(solution) => FrontSolve::Failed(SolveFailure::NotConverged {
            iters: solution.iters,
            residual: solution.residual,
        }),
        Err(err) => FrontSolve::Failed(err.into()),
    }
}

/// Mass-transfer law through the dry layer, per vial.
///
/// # Errors
///
/// Returns a [`DomainError`] if `front_temperature` is outside the
/// vapor-pressure correlation.
pub fn sublimation_rate(
    product_area: f64,
    resistance: f64,
    front_temperature: f64,
    chamber_pressure: f64,
) -> Result<SublimationRate, DomainError> {
    let driving_force = vapor_pressure(front_temperature)? - chamber_pressure;
    if driving_force <= 0.0 {
        return Ok(SublimationRate::NoSublimation);
    }
    Ok(SublimationRate::Subliming(
        product_area / resistance / KG_TO_G * driving_force,
    ))
}

/// Temperature at the vial bottom [°C], from conduction through the
/// remaining frozen thickness.
///
/// # Errors
///
/// Returns a [`DomainError`] if `front_temperature` is outside the
/// vapor-pressure correlation.
pub fn bottom_temperature(
    front_temperature: f64,
    layer: &DryLayer,
    chamber_pressure: f64,
) -> Result<f64, DomainError> {
    let driving_force = vapor_pressure(front_temperature)? - chamber_pressure;
    Ok(front_temperature
        + layer.frozen_thickness() * driving_force * HEAT_OF_SUBLIMATION
            / layer.resistance
            / HR_TO_S
            / ICE_CONDUCTIVITY)
}
