use serde::Deserialize;

use super::{ConfigError, require_finite, require_positive};

/// Formulation properties of the frozen product.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductProperties {
    /// Mass fraction of solute in the solution [-].
    pub solute_fraction: f64,

    /// Dry-layer resistance parameters.
    pub resistance: CakeResistance,

    /// Collapse or eutectic temperature the product must stay below [°C].
    pub critical_temperature: f64,
}

impl ProductProperties {
    /// Checks the solute fraction, resistance, and critical temperature.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid property.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = self.solute_fraction;
        if !(0.0..1.0).contains(&c) {
            return Err(ConfigError::SoluteFraction { value: c });
        }
        self.resistance.validate()?;
        require_finite("product.critical_temperature", self.critical_temperature)
    }
}

/// Dry-layer resistance parameters.
///
/// `Rp = r0 + a1·L / (1 + a2·L)` with L in cm and Rp in cm²·hr·Torr/g.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CakeResistance {
    /// Resistance of an infinitesimally thin cake [cm²·hr·Torr/g].
    pub r0: f64,

    /// Linear growth of resistance with thickness [cm·hr·Torr/g].
    pub a1: f64,

    /// Saturation of resistance growth [1/cm].
    pub a2: f64,
}

impl CakeResistance {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("product.resistance.r0", self.r0)?;
        require_finite("product.resistance.a1", self.a1)?;
        require_finite("product.resistance.a2", self.a2)
    }
}
