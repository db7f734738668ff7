//! Physical constants for primary drying.
//!
//! The model works in the mixed units of the established lyophilization
//! correlations: °C, Torr, cm, cm², hours, and calories. The two factors here
//! are baked into those correlations; conversions at the edges of the model go
//! through `uom`.

/// Grams per kilogram.
pub const KG_TO_G: f64 = 1000.0;

/// Seconds per hour.
pub const HR_TO_S: f64 = 3600.0;

/// Density of ice [g/mL].
pub const RHO_ICE: f64 = 0.918;

/// Density of the dissolved solute [g/mL].
pub const RHO_SOLUTE: f64 = 1.5;

/// Density of the liquid solution before freezing [g/mL].
pub const RHO_SOLUTION: f64 = 1.0;

/// Heat of sublimation of ice [cal/g].
pub const HEAT_OF_SUBLIMATION: f64 = 678.0;

/// Thermal conductivity of ice [cal/(cm·s·K)].
pub const ICE_CONDUCTIVITY: f64 = 0.0059;

/// Prefactor of the ice vapor-pressure correlation [Torr].
pub const VAPOR_PRESSURE_PREFACTOR: f64 = 2.698e10;

/// Exponent scale of the ice vapor-pressure correlation [K].
pub const VAPOR_PRESSURE_SCALE: f64 = 6144.96;

/// Lowest absolute temperature accepted by the vapor-pressure correlation [K].
///
/// Below this the exponential underflows toward zero and its inverse is lost.
pub const MIN_ABSOLUTE_TEMPERATURE: f64 = 10.0;
