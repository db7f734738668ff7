use serde::Deserialize;

use super::{ConfigError, require_finite, require_positive};

/// Geometry of a single vial and its fill.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VialGeometry {
    /// Outer cross-sectional area of the vial [cm²].
    pub vial_area: f64,

    /// Inner cross-sectional area in contact with the product [cm²].
    pub product_area: f64,

    /// Volume of solution filled into the vial [mL].
    pub fill_volume: f64,
}

impl VialGeometry {
    /// Checks that all dimensions are positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("vial.vial_area", self.vial_area)?;
        require_positive("vial.product_area", self.product_area)?;
        require_positive("vial.fill_volume", self.fill_volume)
    }
}

/// Vial heat-transfer coefficient parameters.
///
/// `Kv = kc + kp·P / (1 + kd·P)` with P in Torr and Kv in cal/(s·K·cm²).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeatTransferCoefficients {
    /// Contact contribution [cal/(s·K·cm²)].
    pub kc: f64,

    /// Gas-conduction contribution [cal/(s·K·cm²·Torr)].
    pub kp: f64,

    /// Saturation parameter [1/Torr].
    pub kd: f64,
}

impl HeatTransferCoefficients {
    /// Checks that the coefficients are finite and give a positive `Kv`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for non-finite or non-positive parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("heat_transfer.kc", self.kc)?;
        require_finite("heat_transfer.kp", self.kp)?;
        require_finite("heat_transfer.kd", self.kd)?;
        if self.kp < 0.0 {
            return Err(ConfigError::Negative {
                field: "heat_transfer.kp",
                value: self.kp,
            });
        }
        if self.kd < 0.0 {
            return Err(ConfigError::Negative {
                field: "heat_transfer.kd",
                value: self.kd,
            });
        }
        Ok(())
    }
}
