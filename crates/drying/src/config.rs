//! Validated inputs for a primary-drying optimization.
//!
//! Every struct here deserializes with `serde` and rejects unknown fields, so
//! a config file can be read in any serde format. Deserialization checks shape
//! and schedules; [`DryingConfig::validate`] checks physical ranges.

mod axis;
mod equipment;
mod error;
mod product;
mod vial;

use serde::Deserialize;

pub use axis::{Axis, AxisSetting, AxisSpec, OptimizationBounds};
pub use equipment::EquipmentCapability;
pub use error::ConfigError;
pub use product::{CakeResistance, ProductProperties};
pub use vial::{HeatTransferCoefficients, VialGeometry};

/// Integration step used when none is configured [hr].
pub const DEFAULT_TIMESTEP: f64 = 0.01;

/// Time budget when no axis is scheduled and none is configured [hr].
pub const DEFAULT_MAX_DRYING_TIME: f64 = 100.0;

/// Everything needed to optimize one primary-drying run.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DryingConfig {
    pub vial: VialGeometry,
    pub product: ProductProperties,
    pub heat_transfer: HeatTransferCoefficients,
    pub equipment: EquipmentCapability,

    /// Number of vials sharing the equipment capacity.
    pub vial_count: u32,

    /// Chamber pressure [Torr], scheduled or optimized.
    pub pressure: AxisSpec,

    /// Shelf temperature [°C], scheduled or optimized.
    pub temperature: AxisSpec,

    /// Integration step [hr]; [`DEFAULT_TIMESTEP`] when absent.
    pub timestep: Option<f64>,

    /// Overall time budget [hr].
    ///
    /// Caps the held schedule's duration when one axis is scheduled, and
    /// replaces it (defaulting to [`DEFAULT_MAX_DRYING_TIME`]) when both axes
    /// are optimized.
    pub max_drying_time: Option<f64>,
}

impl DryingConfig {
    /// Checks physical ranges and that at least one axis is optimized.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vial.validate()?;
        self.product.validate()?;
        self.heat_transfer.validate()?;
        self.equipment.validate()?;
        if self.vial_count == 0 {
            return Err(ConfigError::NoVials);
        }
        self.pressure.validate(Axis::Pressure)?;
        self.temperature.validate(Axis::Temperature)?;
        if !self.pressure.is_optimized() && !self.temperature.is_optimized() {
            return Err(ConfigError::NothingToOptimize);
        }
        if let Some(dt) = self.timestep {
            require_positive("timestep", dt)?;
        }
        if let Some(budget) = self.max_drying_time {
            require_positive("max_drying_time", budget)?;
        }
        Ok(())
    }

    /// The integration step [hr].
    #[must_use]
    pub fn timestep(&self) -> f64 {
        self.timestep.unwrap_or(DEFAULT_TIMESTEP)
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}
