use serde::Serialize;

use crate::{
    config::{EquipmentCapability, HeatTransferCoefficients, VialGeometry},
    constants::{HEAT_OF_SUBLIMATION, HR_TO_S, ICE_CONDUCTIVITY, KG_TO_G},
};

use super::{DomainError, DryLayer, heat_transfer_coefficient, vapor_pressure};

/// The seven coupled unknowns at one instant.
///
/// As a vector the order is `[Pch, dmdt, Tbot, Tsh, Psub, Tsub, Kv]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingPoint {
    /// Chamber pressure [Torr].
    pub chamber_pressure: f64,
    /// Per-vial sublimation rate [kg/hr].
    pub sublimation_rate: f64,
    /// Product temperature at the vial bottom [°C].
    pub bottom_temperature: f64,
    /// Shelf temperature [°C].
    pub shelf_temperature: f64,
    /// Vapor pressure at the sublimation front [Torr].
    pub front_pressure: f64,
    /// Sublimation front temperature [°C].
    pub front_temperature: f64,
    /// Vial heat-transfer coefficient [cal/(s·K·cm²)].
    pub heat_transfer_coefficient: f64,
}

impl OperatingPoint {
    /// Number of unknowns.
    pub const LEN: usize = 7;

    /// The point on which every equality residual vanishes for a given
    /// chamber pressure and front temperature.
    ///
    /// Each remaining unknown follows in closed form: front pressure from the
    /// vapor-pressure correlation, rate from mass transfer, bottom temperature
    /// from conduction, and shelf temperature from the vial heat balance.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if `front_temperature` is outside the
    /// vapor-pressure correlation.
    pub fn resolve(
        chamber_pressure: f64,
        front_temperature: f64,
        layer: &DryLayer,
        vial: &VialGeometry,
        heat_transfer: &HeatTransferCoefficients,
    ) -> Result<Self, DomainError> {
        let front_pressure = vapor_pressure(front_temperature)?;
        let driving_force = front_pressure - chamber_pressure;
        let sublimation_rate = vial.product_area / layer.resistance / KG_TO_G * driving_force;
        let bottom_temperature = front_temperature
            + layer.frozen_thickness() * driving_force * HEAT_OF_SUBLIMATION
                / layer.resistance
                / HR_TO_S
                / ICE_CONDUCTIVITY;
        let kv = heat_transfer_coefficient(chamber_pressure, heat_transfer);
        let shelf_temperature = bottom_temperature
            + sublimation_rate * KG_TO_G / HR_TO_S * HEAT_OF_SUBLIMATION / vial.vial_area / kv;

        Ok(Self {
            chamber_pressure,
            sublimation_rate,
            bottom_temperature,
            shelf_temperature,
            front_pressure,
            front_temperature,
            heat_transfer_coefficient: kv,
        })
    }

    /// Zero-flux state: the plug sits at shelf temperature and nothing sublimes.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if `shelf_temperature` is outside the
    /// vapor-pressure correlation.
    pub fn idle(
        chamber_pressure: f64,
        shelf_temperature: f64,
        heat_transfer: &HeatTransferCoefficients,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            chamber_pressure,
            sublimation_rate: 0.0,
            bottom_temperature: shelf_temperature,
            shelf_temperature,
            front_pressure: vapor_pressure(shelf_temperature)?,
            front_temperature: shelf_temperature,
            heat_transfer_coefficient: heat_transfer_coefficient(chamber_pressure, heat_transfer),
        })
    }

    /// Sublimation driving force `Psub - Pch` [Torr].
    #[must_use]
    pub fn driving_force(&self) -> f64 {
        self.front_pressure - self.chamber_pressure
    }

    /// The unknowns as `[Pch, dmdt, Tbot, Tsh, Psub, Tsub, Kv]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.chamber_pressure,
            self.sublimation_rate,
            self.bottom_temperature,
            self.shelf_temperature,
            self.front_pressure,
            self.front_temperature,
            self.heat_transfer_coefficient,
        ]
    }

    /// Inverse of [`OperatingPoint::to_array`].
    #[must_use]
    pub fn from_array(x: [f64; Self::LEN]) -> Self {
        let [
            chamber_pressure,
            sublimation_rate,
            bottom_temperature,
            shelf_temperature,
            front_pressure,
            front_temperature,
            heat_transfer_coefficient,
        ] = x;
        Self {
            chamber_pressure,
            sublimation_rate,
            bottom_temperature,
            shelf_temperature,
            front_pressure,
            front_temperature,
            heat_transfer_coefficient,
        }
    }
}

/// The four physics equalities, all zero at a consistent point.
///
/// 1. front pressure matches the vapor-pressure correlation [Torr]
/// 2. rate matches mass transfer through the dry layer [kg/hr]
/// 3. shelf-to-bottom heat flow matches conduction through the ice [cal·cm/s]
/// 4. shelf temperature matches the bottom plus the latent-heat drop [K]
///
/// # Errors
///
/// Returns a [`DomainError`] if the front temperature is outside the
/// vapor-pressure correlation.
pub fn equality_residuals(
    point: &OperatingPoint,
    layer: &DryLayer,
    vial: &VialGeometry,
) -> Result<[f64; 4], DomainError> {
    let OperatingPoint {
        chamber_pressure: pch,
        sublimation_rate: dmdt,
        bottom_temperature: tbot,
        shelf_temperature: tsh,
        front_pressure: psub,
        front_temperature: tsub,
        heat_transfer_coefficient: kv,
    } = *point;
    let rp = layer.resistance;

    Ok([
        psub - vapor_pressure(tsub)?,
        dmdt - vial.product_area / rp / KG_TO_G * (psub - pch),
        (tsh - tbot) * vial.vial_area * kv * layer.frozen_thickness()
            - vial.product_area * (tbot - tsub) * ICE_CONDUCTIVITY,
        tsh - dmdt * KG_TO_G / HR_TO_S * HEAT_OF_SUBLIMATION / vial.vial_area / kv - tbot,
    ])
}

/// Equipment-capacity slack [kg/hr] and product-temperature slack [K].
///
/// Both are non-negative at a feasible point.
#[must_use]
pub fn inequality_residuals(
    point: &OperatingPoint,
    critical_temperature: f64,
    equipment: &EquipmentCapability,
    vial_count: u32,
) -> [f64; 2] {
    [
        equipment.capacity(point.chamber_pressure)
            - f64::from(vial_count) * point.sublimation_rate,
        critical_temperature - point.bottom_temperature,
    ]
}
