use serde::Deserialize;

use super::{ConfigError, require_finite};

/// Maximum batch sublimation rate the dryer can condense.
///
/// Capacity is linear in chamber pressure: `intercept + slope·P` [kg/hr] for
/// the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EquipmentCapability {
    /// Capacity extrapolated to zero pressure [kg/hr].
    pub intercept: f64,

    /// Capacity gained per unit chamber pressure [kg/(hr·Torr)].
    pub slope: f64,
}

impl EquipmentCapability {
    /// Batch capacity at chamber pressure `pressure` [kg/hr].
    ///
    /// May be negative for low pressures when the intercept is negative.
    #[must_use]
    pub fn capacity(&self, pressure: f64) -> f64 {
        self.intercept + self.slope * pressure
    }

    /// Per-vial capacity at `pressure` for a batch of `vial_count` vials [kg/hr].
    #[must_use]
    pub fn per_vial(&self, pressure: f64, vial_count: u32) -> f64 {
        self.capacity(pressure) / f64::from(vial_count)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        require_finite("equipment.intercept", self.intercept)?;
        require_finite("equipment.slope", self.slope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn capacity_is_linear_in_pressure() {
        let equipment = EquipmentCapability {
            intercept: -0.182,
            slope: 11.7,
        };

        assert_relative_eq!(equipment.capacity(0.1), 0.988, epsilon = 1e-12);
        assert!(equipment.capacity(0.01) < 0.0);
        assert_relative_eq!(equipment.per_vial(0.1, 398), 0.988 / 398.0, epsilon = 1e-12);
    }
}
