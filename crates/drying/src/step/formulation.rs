//! The per-step program in its full seven-unknown form.
//!
//! The solver never hands this to a generic NLP; it is used to state the
//! problem and to check whatever the reduced search returns.

use crate::{
    config::{AxisSetting, EquipmentCapability, HeatTransferCoefficients, VialGeometry},
    physics::{
        DomainError, DryLayer, OperatingPoint, equality_residuals, heat_transfer_coefficient,
        inequality_residuals,
    },
};

use super::{Constraint, Flow, StepError, StepSolution};

/// Absolute tolerance for accepting a step's residuals.
pub const VERIFICATION_TOL: f64 = 1e-6;

const PHYSICS: [Constraint; 4] = [
    Constraint::VaporPressure,
    Constraint::MassTransfer,
    Constraint::VialHeatBalance,
    Constraint::ShelfHeatBalance,
];

/// Objective, constraints, and bounds at one `(t, L)`.
///
/// Unknowns are ordered `[Pch, dmdt, Tbot, Tsh, Psub, Tsub, Kv]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formulation {
    pub layer: DryLayer,
    pub vial: VialGeometry,
    pub heat_transfer: HeatTransferCoefficients,
    pub equipment: EquipmentCapability,
    pub vial_count: u32,
    pub critical_temperature: f64,
    pub pressure: AxisSetting,
    pub temperature: AxisSetting,
}

impl Formulation {
    /// `Pch - Psub`, to be minimized.
    #[must_use]
    pub fn objective(&self, x: &[f64; OperatingPoint::LEN]) -> f64 {
        x[0] - x[4]
    }

    /// Equalities that must vanish, tagged by constraint.
    ///
    /// The four physics balances come first, then the heat-transfer
    /// correlation, then one pin per held axis.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the front temperature is outside the
    /// vapor-pressure correlation.
    pub fn equality_residuals(
        &self,
        x: &[f64; OperatingPoint::LEN],
    ) -> Result<Vec<(Constraint, f64)>, DomainError> {
        let point = OperatingPoint::from_array(*x);
        let physics = equality_residuals(&point, &self.layer, &self.vial)?;

        let mut residuals: Vec<_> = PHYSICS.into_iter().zip(physics).collect();
        residuals.push((
            Constraint::HeatTransferCoefficient,
            point.heat_transfer_coefficient
                - heat_transfer_coefficient(point.chamber_pressure, &self.heat_transfer),
        ));
        if let Some(pressure) = self.pressure.held() {
            residuals.push((Constraint::PressurePin, point.chamber_pressure - pressure));
        }
        if let Some(temperature) = self.temperature.held() {
            residuals.push((
                Constraint::TemperaturePin,
                point.shelf_temperature - temperature,
            ));
        }
        Ok(residuals)
    }

    /// Inequalities that must be non-negative: capacity, then critical temperature.
    #[must_use]
    pub fn inequality_residuals(&self, x: &[f64; OperatingPoint::LEN]) -> [(Constraint, f64); 2] {
        let point = OperatingPoint::from_array(*x);
        let [capacity, temperature] = inequality_residuals(
            &point,
            self.critical_temperature,
            &self.equipment,
            self.vial_count,
        );
        [
            (Constraint::EquipmentCapacity, capacity),
            (Constraint::CriticalTemperature, temperature),
        ]
    }

    /// Box bounds per unknown; held axes and dependent unknowns are unbounded.
    #[must_use]
    pub fn bounds(&self) -> [(f64, f64); OperatingPoint::LEN] {
        let free = (f64::NEG_INFINITY, f64::INFINITY);
        let span = |setting: AxisSetting| match setting {
            AxisSetting::Held(_) => free,
            AxisSetting::Bounded(bounds) => (bounds.min, bounds.max.unwrap_or(f64::INFINITY)),
        };

        let mut bounds = [free; OperatingPoint::LEN];
        bounds[0] = span(self.pressure);
        bounds[3] = span(self.temperature);
        bounds
    }

    /// Checks a step solution against every constraint at [`VERIFICATION_TOL`].
    ///
    /// Zero-flux points do not satisfy the mass-transfer balance by
    /// construction, so only the correlation, pins, inequalities, and bounds
    /// are checked for them.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Unverified`] naming the first violated constraint.
    pub fn verify(&self, solution: &StepSolution) -> Result<(), StepError> {
        let x = solution.point.to_array();

        for (constraint, residual) in self.equality_residuals(&x)? {
            let physics = PHYSICS.contains(&constraint);
            if physics && solution.flow == Flow::NoSublimation {
                continue;
            }
            if residual.abs() > VERIFICATION_TOL || !residual.is_finite() {
                return Err(StepError::Unverified {
                    constraint,
                    residual,
                });
            }
        }

        for (constraint, residual) in self.inequality_residuals(&x) {
            if residual < -VERIFICATION_TOL || !residual.is_finite() {
                return Err(StepError::Unverified {
                    constraint,
                    residual,
                });
            }
        }

        let bounds = self.bounds();
        for (index, constraint) in [
            (0, Constraint::PressureBounds),
            (3, Constraint::TemperatureBounds),
        ] {
            let (lo, hi) = bounds[index];
            let value = x[index];
            let excess = (lo - value).max(value - hi);
            if excess > VERIFICATION_TOL {
                return Err(StepError::Unverified {
                    constraint,
                    residual: excess,
                });
            }
        }

        Ok(())
    }
}
