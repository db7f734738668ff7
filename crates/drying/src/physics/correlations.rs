use uom::si::{
    f64::ThermodynamicTemperature,
    thermodynamic_temperature::{degree_celsius, kelvin},
};

use crate::{
    config::{CakeResistance, HeatTransferCoefficients, VialGeometry},
    constants::{
        KG_TO_G, MIN_ABSOLUTE_TEMPERATURE, RHO_ICE, RHO_SOLUTE, RHO_SOLUTION,
        VAPOR_PRESSURE_PREFACTOR, VAPOR_PRESSURE_SCALE,
    },
};

use super::DomainError;

/// Equilibrium vapor pressure of ice at `temperature` [°C], in Torr.
///
/// # Errors
///
/// Returns [`DomainError::Temperature`] for non-finite input or absolute
/// temperatures at or below [`MIN_ABSOLUTE_TEMPERATURE`].
pub fn vapor_pressure(temperature: f64) -> Result<f64, DomainError> {
    let absolute = ThermodynamicTemperature::new::<degree_celsius>(temperature).get::<kelvin>();
    if !absolute.is_finite() || absolute <= MIN_ABSOLUTE_TEMPERATURE {
        return Err(DomainError::Temperature {
            celsius: temperature,
        });
    }
    Ok(VAPOR_PRESSURE_PREFACTOR * (-VAPOR_PRESSURE_SCALE / absolute).exp())
}

/// Temperature [°C] at which ice is in equilibrium with `pressure` [Torr].
///
/// This is the frost point: a sublimation front colder than this cannot lose
/// mass to a chamber held at `pressure`.
///
/// # Errors
///
/// Returns [`DomainError::Pressure`] unless `0 < pressure < 2.698e10`.
pub fn sublimation_temperature(pressure: f64) -> Result<f64, DomainError> {
    if !(pressure > 0.0 && pressure < VAPOR_PRESSURE_PREFACTOR) {
        return Err(DomainError::Pressure { torr: pressure });
    }
    let absolute = -VAPOR_PRESSURE_SCALE / (pressure / VAPOR_PRESSURE_PREFACTOR).ln();
    Ok(ThermodynamicTemperature::new::<kelvin>(absolute).get::<degree_celsius>())
}

/// Dry-layer resistance [cm²·hr·Torr/g] at cake thickness `cake_length` [cm].
#[must_use]
pub fn resistance(cake_length: f64, params: &CakeResistance) -> f64 {
    params.r0 + params.a1 * cake_length / (1.0 + params.a2 * cake_length)
}

/// Vial heat-transfer coefficient [cal/(s·K·cm²)] at chamber pressure [Torr].
#[must_use]
pub fn heat_transfer_coefficient(pressure: f64, params: &HeatTransferCoefficients) -> f64 {
    params.kc + params.kp * pressure / (1.0 + params.kd * pressure)
}

/// Height of the frozen plug before drying starts [cm].
#[must_use]
pub fn initial_fill_height(vial: &VialGeometry, solute_fraction: f64) -> f64 {
    vial.fill_volume / (vial.product_area * RHO_ICE) * ice_volume_factor(solute_fraction)
}

/// Speed at which the dry layer thickens [cm/hr] for a per-vial sublimation
/// rate `mass_rate` [kg/hr].
#[must_use]
pub fn recession_rate(mass_rate: f64, product_area: f64, solute_fraction: f64) -> f64 {
    let ice_fraction = 1.0 - solute_fraction * RHO_SOLUTION / RHO_SOLUTE;
    mass_rate * KG_TO_G / ice_fraction / (product_area * RHO_ICE) * ice_volume_factor(solute_fraction)
}

fn ice_volume_factor(solute_fraction: f64) -> f64 {
    RHO_SOLUTION - solute_fraction * (RHO_SOLUTION - RHO_ICE) / RHO_SOLUTE
}
