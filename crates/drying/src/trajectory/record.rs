use serde::Serialize;
use uom::si::{
    area::{square_centimeter, square_meter},
    f64::{Area, Pressure},
    pressure::{millitorr, torr},
};

use crate::step::StepSolution;

/// One row of an optimized trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputRecord {
    /// Elapsed time [hr].
    pub time: f64,
    /// Sublimation front temperature [°C].
    pub front_temperature: f64,
    /// Product temperature at the vial bottom [°C].
    pub bottom_temperature: f64,
    /// Shelf temperature [°C].
    pub shelf_temperature: f64,
    /// Chamber pressure [mTorr].
    pub chamber_pressure: f64,
    /// Sublimation flux [kg/(hr·m²)].
    pub sublimation_flux: f64,
    /// Fraction of the fill height dried, in `[0, 1]`.
    pub dried_fraction: f64,
}

impl OutputRecord {
    /// Column names, in [`OutputRecord::to_row`] order.
    pub const COLUMNS: [&'static str; 7] = [
        "time",
        "front_temperature",
        "bottom_temperature",
        "shelf_temperature",
        "chamber_pressure",
        "sublimation_flux",
        "dried_fraction",
    ];

    /// Converts a step solution to output units.
    ///
    /// Zero-flux steps record a flux of exactly zero.
    #[must_use]
    pub fn new(
        time: f64,
        solution: &StepSolution,
        dried_fraction: f64,
        product_area: f64,
    ) -> Self {
        let point = &solution.point;
        let area = Area::new::<square_centimeter>(product_area);
        let sublimation_flux = if solution.is_subliming() {
            point.sublimation_rate / area.get::<square_meter>()
        } else {
            0.0
        };

        Self {
            time,
            front_temperature: point.front_temperature,
            bottom_temperature: point.bottom_temperature,
            shelf_temperature: point.shelf_temperature,
            chamber_pressure: Pressure::new::<torr>(point.chamber_pressure).get::<millitorr>(),
            sublimation_flux,
            dried_fraction,
        }
    }

    #[must_use]
    pub fn to_row(&self) -> [f64; 7] {
        [
            self.time,
            self.front_temperature,
            self.bottom_temperature,
            self.shelf_temperature,
            self.chamber_pressure,
            self.sublimation_flux,
            self.dried_fraction,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        physics::OperatingPoint,
        step::{Flow, StepSolution},
    };

    fn solution(flow: Flow) -> StepSolution {
        StepSolution {
            point: OperatingPoint {
                chamber_pressure: 0.08,
                sublimation_rate: 3.14e-4,
                bottom_temperature: -26.0,
                shelf_temperature: -10.0,
                front_pressure: 0.3,
                front_temperature: -28.0,
                heat_transfer_coefficient: 3.4e-4,
            },
            resistance: 4.6,
            flow,
        }
    }

    #[test]
    fn converts_units() {
        let record = OutputRecord::new(1.5, &solution(Flow::Subliming), 0.25, 3.14);

        assert_relative_eq!(record.chamber_pressure, 80.0, max_relative = 1e-12);
        // 3.14e-4 kg/hr over 3.14e-4 m².
        assert_relative_eq!(record.sublimation_flux, 1.0, epsilon = 1e-12);
        assert_eq!(
            record.to_row(),
            [1.5, -28.0, -26.0, -10.0, record.chamber_pressure, record.sublimation_flux, 0.25]
        );
    }

    #[test]
    fn converts_a_web_interface_setpoint() {
        let mut web = solution(Flow::Subliming);
        web.point.chamber_pressure = 0.15;
        web.point.sublimation_rate = 1.0e-3;

        // 1 g/hr through a 10 cm² product face.
        let record = OutputRecord::new(0.0, &web, 0.0, 10.0);
        assert_relative_eq!(record.chamber_pressure, 150.0, max_relative = 1e-12);
        assert_relative_eq!(record.sublimation_flux, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn zero_flux_steps_record_zero() {
        let record = OutputRecord::new(0.0, &solution(Flow::NoSublimation), 0.0, 3.14);
        assert_eq!(record.sublimation_flux, 0.0);
    }
}
