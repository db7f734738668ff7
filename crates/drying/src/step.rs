//! Constrained optimization of the operating point at one instant.
//!
//! Given the dry-layer thickness and the setting of each axis, a step finds
//! the chamber pressure and shelf temperature that maximize the sublimation
//! driving force subject to the critical product temperature and the
//! equipment capacity.
//!
//! # Method
//!
//! The seven-unknown program ([`Formulation`]) is reduced to a search over
//! chamber pressure. At a fixed pressure the best feasible front temperature
//! is known in closed form or from a single bracketed root solve, so the
//! reduced objective is cheap. When pressure is optimized it is scanned on a
//! coarse grid and refined by golden section inside the winning cell. When no
//! grid point is feasible the refinement still runs, and the winning cell is
//! rescanned a few times before the step is declared infeasible. Every
//! accepted answer is verified against the full formulation.

mod candidate;
mod error;
mod formulation;

use serde::Serialize;

use lyo_solvers::optimization::{golden_section, scan};

use crate::{
    config::{
        AxisSetting, DryingConfig, EquipmentCapability, HeatTransferCoefficients,
        OptimizationBounds, ProductProperties, VialGeometry,
    },
    physics::{
        DomainError, DryLayer, FrontConditions, FrontSolve, OperatingPoint,
        heat_transfer_coefficient, initial_fill_height, solve_front_temperature, vapor_pressure,
    },
};

use candidate::Candidate;

pub use error::{Constraint, StepError};
pub use formulation::{Formulation, VERIFICATION_TOL};

/// Constraint violation below which a candidate counts as feasible.
pub const FEASIBILITY_TOL: f64 = 1e-9;

/// Grid points in the coarse pressure scan.
const PRESSURE_GRID: usize = 24;

/// Rescans of the best cell allowed while no scanned pressure is feasible.
const MAX_ZOOMS: usize = 3;

/// Whether the step's operating point sublimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Flow {
    Subliming,
    /// Front vapor pressure does not exceed chamber pressure.
    NoSublimation,
}

/// The optimized operating point at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepSolution {
    pub point: OperatingPoint,

    /// Dry-layer resistance at this step [cm²·hr·Torr/g].
    pub resistance: f64,

    pub flow: Flow,
}

impl StepSolution {
    #[must_use]
    pub fn is_subliming(&self) -> bool {
        self.flow == Flow::Subliming
    }
}

/// What a step is asked to solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInput {
    /// Current dry-layer thickness [cm].
    pub cake_length: f64,
    pub pressure: AxisSetting,
    pub temperature: AxisSetting,

    /// The last accepted step, used only by [`StepSolver::fallback`].
    pub previous: Option<StepSolution>,
}

/// Per-step optimizer over one product, vial, and dryer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSolver {
    pub vial: VialGeometry,
    pub product: ProductProperties,
    pub heat_transfer: HeatTransferCoefficients,
    pub equipment: EquipmentCapability,
    pub vial_count: u32,
}

impl From<&DryingConfig> for StepSolver {
    fn from(config: &DryingConfig) -> Self {
        Self {
            vial: config.vial,
            product: config.product,
            heat_transfer: config.heat_transfer,
            equipment: config.equipment,
            vial_count: config.vial_count,
        }
    }
}

impl StepSolver {
    /// Initial frozen fill height [cm].
    #[must_use]
    pub fn fill_height(&self) -> f64 {
        initial_fill_height(&self.vial, self.product.solute_fraction)
    }

    /// Dry-layer state at `cake_length` [cm].
    #[must_use]
    pub fn layer(&self, cake_length: f64) -> DryLayer {
        DryLayer::new(self.fill_height(), cake_length, &self.product.resistance)
    }

    /// The full program for `input`.
    #[must_use]
    pub fn formulation(&self, input: &StepInput) -> Formulation {
        Formulation {
            layer: self.layer(input.cake_length),
            vial: self.vial,
            heat_transfer: self.heat_transfer,
            equipment: self.equipment,
            vial_count: self.vial_count,
            critical_temperature: self.product.critical_temperature,
            pressure: input.pressure,
            temperature: input.temperature,
        }
    }

    /// Finds the feasible operating point with the largest driving force.
    ///
    /// Among pressures that tie on the objective, the lowest is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Infeasible`] when no setting within bounds meets
    /// every constraint, [`StepError::Unverified`] when the answer fails the
    /// residual check, and a numerical error when an inner solve fails.
    pub fn solve(&self, input: &StepInput) -> Result<StepSolution, StepError> {
        let layer = self.layer(input.cake_length);

        let candidate = match input.pressure {
            AxisSetting::Held(pressure) => self.candidate(pressure, input.temperature, &layer)?,
            AxisSetting::Bounded(bounds) => {
                self.search_pressure(bounds, input.temperature, &layer)?
            }
        };

        let solution = match candidate {
            Candidate::Feasible(solution) => solution,
            Candidate::Infeasible { violation } => {
                return Err(StepError::Infeasible { violation });
            }
        };

        self.formulation(input).verify(&solution)?;
        Ok(solution)
    }

    /// The physics at a fully specified setting, without any feasibility check.
    ///
    /// # Errors
    ///
    /// Returns an error if the front-temperature solve fails.
    pub fn evaluate(
        &self,
        pressure: f64,
        shelf_temperature: f64,
        cake_length: f64,
    ) -> Result<StepSolution, StepError> {
        self.operating_point(pressure, shelf_temperature, &self.layer(cake_length))
    }

    /// The point used when [`StepSolver::solve`] fails.
    ///
    /// Held axes take their scheduled value. Optimized axes keep the value
    /// from `input.previous`, or sit at their lower bound when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the physics cannot be evaluated at that setting.
    pub fn fallback(&self, input: &StepInput) -> Result<StepSolution, StepError> {
        let retain = |setting: AxisSetting, last: fn(&OperatingPoint) -> f64| match setting {
            AxisSetting::Held(value) => value,
            AxisSetting::Bounded(bounds) => {
                input.previous.map_or(bounds.min, |s| last(&s.point))
            }
        };
        let pressure = retain(input.pressure, |p| p.chamber_pressure);
        let shelf_temperature = retain(input.temperature, |p| p.shelf_temperature);
        self.evaluate(pressure, shelf_temperature, input.cake_length)
    }

    fn search_pressure(
        &self,
        bounds: OptimizationBounds,
        temperature: AxisSetting,
        layer: &DryLayer,
    ) -> Result<Candidate, StepError> {
        // Above the vapor pressure at the critical temperature nothing can
        // sublime without the product exceeding it.
        let upper = match bounds.max {
            Some(max) => max,
            None => vapor_pressure(self.product.critical_temperature)?.max(bounds.min),
        };
        if upper <= bounds.min {
            return self.candidate(bounds.min, temperature, layer);
        }

        let score = |pressure: f64| -> Result<f64, StepError> {
            Ok(self.candidate(pressure, temperature, layer)?.score())
        };

        let mut scan =
            scan::maximize(score, [bounds.min, upper], PRESSURE_GRID).map_err(StepError::Scan)?;
        let mut zooms = 0;

        // Infeasible samples score by how far they miss, so a feasible window
        // narrower than one grid cell is still reached from its neighbors.
        let best = loop {
            let refined = golden_section::maximize(score, scan.bracket, &pressure_refinement())
                .map_err(StepError::Search)?;
            let best = if refined.objective > scan.best.objective {
                refined.point()
            } else {
                scan.best
            };
            if best.objective >= 0.0 || zooms == MAX_ZOOMS {
                break best;
            }
            scan = scan::maximize(score, scan.bracket, PRESSURE_GRID).map_err(StepError::Scan)?;
            zooms += 1;
        };

        if best.objective < 0.0 {
            return Ok(Candidate::Infeasible {
                violation: -best.objective,
            });
        }
        self.candidate(best.x, temperature, layer)
    }

    fn candidate(
        &self,
        pressure: f64,
        temperature: AxisSetting,
        layer: &DryLayer,
    ) -> Result<Candidate, StepError> {
        match temperature {
            AxisSetting::Held(shelf) => self.at_held_shelf(pressure, shelf, layer),
            AxisSetting::Bounded(bounds) => self.at_bounded_shelf(pressure, bounds, layer),
        }
    }

    fn front_at_shelf(
        &self,
        pressure: f64,
        shelf_temperature: f64,
        layer: &DryLayer,
    ) -> FrontSolve {
        solve_front_temperature(&FrontConditions {
            chamber_pressure: pressure,
            shelf_temperature,
            vial_area: self.vial.vial_area,
            product_area: self.vial.product_area,
            heat_transfer_coefficient: heat_transfer_coefficient(pressure, &self.heat_transfer),
            layer: *layer,
        })
    }

    fn operating_point(
        &self,
        pressure: f64,
        shelf_temperature: f64,
        layer: &DryLayer,
    ) -> Result<StepSolution, StepError> {
        match self.front_at_shelf(pressure, shelf_temperature, layer) {
            FrontSolve::Converged(front) => {
                let mut point = self.resolve(pressure, front, layer)?;
                point.shelf_temperature = shelf_temperature;
                Ok(self.solution(point, layer, Flow::Subliming))
            }
            FrontSolve::NoSublimation => {
                let point = OperatingPoint::idle(pressure, shelf_temperature, &self.heat_transfer)?;
                Ok(self.solution(point, layer, Flow::NoSublimation))
            }
            FrontSolve::Failed(err) => Err(err.into()),
        }
    }

    fn resolve(
        &self,
        pressure: f64,
        front_temperature: f64,
        layer: &DryLayer,
    ) -> Result<OperatingPoint, DomainError> {
        OperatingPoint::resolve(
            pressure,
            front_temperature,
            layer,
            &self.vial,
            &self.heat_transfer,
        )
    }

    fn solution(&self, point: OperatingPoint, layer: &DryLayer, flow: Flow) -> StepSolution {
        StepSolution {
            point,
            resistance: layer.resistance,
            flow,
        }
    }
}

fn pressure_refinement() -> golden_section::Config {
    golden_section::Config::new(100, 1e-10, 0.0).unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::config::CakeResistance;

    pub(crate) fn reference_solver() -> StepSolver {
        StepSolver {
            vial: VialGeometry {
                vial_area: 3.8,
                product_area: 3.14,
                fill_volume: 2.0,
            },
            product: ProductProperties {
                solute_fraction: 0.05,
                resistance: CakeResistance {
                    r0: 1.4,
                    a1: 16.0,
                    a2: 0.0,
                },
                critical_temperature: -25.0,
            },
            heat_transfer: HeatTransferCoefficients {
                kc: 2.75e-4,
                kp: 8.93e-4,
                kd: 0.46,
            },
            equipment: EquipmentCapability {
                intercept: 5.0,
                slope: 10.0,
            },
            vial_count: 398,
        }
    }

    pub(crate) fn web_solver() -> StepSolver {
        let mut solver = reference_solver();
        solver.product.critical_temperature = -5.0;
        solver.equipment = EquipmentCapability {
            intercept: -0.182,
            slope: 11.7,
        };
        solver
    }

    fn pressure_bounds(min: f64, max: Option<f64>) -> AxisSetting {
        AxisSetting::Bounded(OptimizationBounds::new(min, max))
    }

    #[test]
    fn pressure_only_holds_critical_temperature() {
        let solver = reference_solver();
        let input = StepInput {
            cake_length: 0.0,
            pressure: pressure_bounds(0.04, Some(0.2)),
            temperature: AxisSetting::Held(20.0),
            previous: None,
        };

        let solution = solver.solve(&input).expect("step should be feasible");

        // Flux rises with pressure until the bottom reaches -25 °C near 0.18 Torr.
        assert!(solution.is_subliming());
        assert_relative_eq!(solution.point.bottom_temperature, -25.0, epsilon = 1e-6);
        assert!((0.15..0.2).contains(&solution.point.chamber_pressure));
        assert_eq!(solution.point.shelf_temperature, 20.0);
    }

    #[test]
    fn cold_shelf_prefers_lowest_pressure() {
        let solver = reference_solver();
        let input = StepInput {
            cake_length: 0.0,
            pressure: pressure_bounds(0.04, Some(0.2)),
            temperature: AxisSetting::Held(-40.0),
            previous: None,
        };

        let solution = solver.solve(&input).expect("step should be feasible");

        // The lower the pressure, the larger the driving force, and the
        // critical temperature cannot bind this cold.
        assert_relative_eq!(solution.point.chamber_pressure, 0.04, epsilon = 1e-8);
        assert!(solution.point.bottom_temperature < -25.0);
    }

    #[test]
    fn temperature_only_runs_shelf_to_its_limit() {
        let solver = web_solver();
        let input = StepInput {
            cake_length: 0.0,
            pressure: AxisSetting::Held(0.15),
            temperature: AxisSetting::Bounded(OptimizationBounds::new(-45.0, Some(120.0))),
            previous: None,
        };

        let solution = solver.solve(&input).expect("step should be feasible");

        assert_relative_eq!(solution.point.shelf_temperature, 120.0, epsilon = 1e-6);
        assert_eq!(solution.point.chamber_pressure, 0.15);
    }

    #[test]
    fn joint_step_beats_either_single_axis() {
        let solver = reference_solver();
        let shelf = OptimizationBounds::new(-40.0, Some(-10.0));

        let joint = solver
            .solve(&StepInput {
                cake_length: 0.1,
                pressure: pressure_bounds(0.04, Some(0.2)),
                temperature: AxisSetting::Bounded(shelf),
                previous: None,
            })
            .expect("joint step should be feasible");
        let pressure_only = solver
            .solve(&StepInput {
                cake_length: 0.1,
                pressure: pressure_bounds(0.04, Some(0.2)),
                temperature: AxisSetting::Held(-10.0),
                previous: None,
            })
            .expect("pressure step should be feasible");

        assert!(
            joint.point.sublimation_rate >= pressure_only.point.sublimation_rate * (1.0 - 1e-9)
        );
    }

    #[test]
    fn unreachable_constraints_are_infeasible() {
        let solver = reference_solver();
        let input = StepInput {
            cake_length: 0.3,
            pressure: pressure_bounds(0.04, Some(0.2)),
            temperature: AxisSetting::Held(40.0),
            previous: None,
        };

        let err = solver.solve(&input).expect_err("a 40 °C shelf cannot be held");
        assert!(matches!(err, StepError::Infeasible { violation } if violation > 0.0));
    }

    #[test]
    fn finds_a_feasible_window_between_grid_points() {
        let solver = web_solver();
        let input = StepInput {
            cake_length: 0.4,
            pressure: pressure_bounds(0.01, None),
            temperature: AxisSetting::Held(110.0),
            previous: None,
        };

        // Feasible only for 0.041..0.137 Torr: capacity binds below, the
        // critical temperature above. The grid samples 0.01 and 0.14.
        let solution = solver.solve(&input).expect("a feasible window exists");

        let point = solution.point;
        assert!((0.13..0.138).contains(&point.chamber_pressure));
        assert!(point.bottom_temperature <= -5.0 + FEASIBILITY_TOL);
        let batch_rate = f64::from(solver.vial_count) * point.sublimation_rate;
        assert!(batch_rate <= solver.equipment.capacity(point.chamber_pressure));
        assert_relative_eq!(point.driving_force(), 2.25, epsilon = 0.01);
    }

    #[test]
    fn held_shelf_steps_match_a_dense_pressure_sweep() {
        let solver = web_solver();
        let critical = solver.product.critical_temperature;
        let upper = vapor_pressure(critical).expect("in domain");

        for cake_length in [0.0, 0.2, 0.4, 0.6] {
            for shelf in [-20.0, 20.0, 60.0, 100.0, 120.0] {
                let mut dense_best: Option<f64> = None;
                for i in 0..=1200 {
                    let pressure = 0.01 + (upper - 0.01) * f64::from(i) / 1200.0;
                    let sample = solver
                        .evaluate(pressure, shelf, cake_length)
                        .expect("should evaluate");
                    let point = sample.point;
                    let batch_rate = f64::from(solver.vial_count) * point.sublimation_rate;
                    let feasible = solver.equipment.capacity(pressure) - batch_rate
                        >= -FEASIBILITY_TOL
                        && point.bottom_temperature <= critical + FEASIBILITY_TOL;
                    if feasible {
                        let force = if sample.is_subliming() {
                            point.driving_force()
                        } else {
                            0.0
                        };
                        dense_best = Some(dense_best.map_or(force, |best| best.max(force)));
                    }
                }

                let Some(dense_best) = dense_best else {
                    continue;
                };
                let solution = solver
                    .solve(&StepInput {
                        cake_length,
                        pressure: pressure_bounds(0.01, None),
                        temperature: AxisSetting::Held(shelf),
                        previous: None,
                    })
                    .unwrap_or_else(|err| panic!("L = {cake_length}, Tsh = {shelf}: {err}"));
                assert!(
                    solution.point.driving_force() >= dense_best - 1e-6,
                    "L = {cake_length}, Tsh = {shelf}: {} < {dense_best}",
                    solution.point.driving_force()
                );
            }
        }
    }

    #[test]
    fn open_pressure_bound_is_capped_at_critical_vapor_pressure() {
        let solver = web_solver();
        let input = StepInput {
            cake_length: 0.0,
            pressure: pressure_bounds(0.05, None),
            temperature: AxisSetting::Bounded(OptimizationBounds::new(-45.0, Some(120.0))),
            previous: None,
        };

        let solution = solver.solve(&input).expect("step should be feasible");
        let cap = vapor_pressure(-5.0).expect("in domain");
        assert!(solution.point.chamber_pressure <= cap);
        assert!(solution.point.chamber_pressure >= 0.05);
    }

    #[test]
    fn degenerate_pressure_bounds_pin_the_pressure() {
        let solver = reference_solver();
        let input = StepInput {
            cake_length: 0.2,
            pressure: pressure_bounds(0.06, Some(0.06)),
            temperature: AxisSetting::Held(-20.0),
            previous: None,
        };

        let solution = solver.solve(&input).expect("step should be feasible");
        assert_eq!(solution.point.chamber_pressure, 0.06);
    }

    #[test]
    fn fallback_uses_previous_or_lower_bound() {
        let solver = reference_solver();
        let input = StepInput {
            cake_length: 0.1,
            pressure: pressure_bounds(0.04, Some(0.2)),
            temperature: AxisSetting::Held(-20.0),
            previous: None,
        };

        let first = solver.fallback(&input).expect("should evaluate");
        assert_eq!(first.point.chamber_pressure, 0.04);
        assert_eq!(first.point.shelf_temperature, -20.0);

        let previous = solver.evaluate(0.11, -30.0, 0.05).expect("should evaluate");
        let retained = solver
            .fallback(&StepInput {
                previous: Some(previous),
                ..input
            })
            .expect("should evaluate");
        assert_eq!(retained.point.chamber_pressure, 0.11);
        assert_eq!(retained.point.shelf_temperature, -20.0);
    }

    #[test]
    fn solutions_pass_their_own_verification() {
        let solver = reference_solver();
        let input = StepInput {
            cake_length: 0.25,
            pressure: pressure_bounds(0.04, Some(0.2)),
            temperature: AxisSetting::Held(-15.0),
            previous: None,
        };

        let solution = solver.solve(&input).expect("step should be feasible");
        let formulation = solver.formulation(&input);
        assert!(formulation.verify(&solution).is_ok());

        let x = solution.point.to_array();
        assert_relative_eq!(
            formulation.objective(&x),
            -solution.point.driving_force(),
            epsilon = 1e-15
        );
        let residuals = formulation.equality_residuals(&x).expect("in domain");
        assert_eq!(residuals.len(), 6);
        assert_eq!(residuals[5].0, Constraint::TemperaturePin);
    }

    #[test]
    fn verification_rejects_a_hot_point() {
        let solver = reference_solver();
        let input = StepInput {
            cake_length: 0.3,
            pressure: AxisSetting::Held(0.2),
            temperature: AxisSetting::Bounded(OptimizationBounds::new(-40.0, Some(60.0))),
            previous: None,
        };

        let hot = solver.evaluate(0.2, 40.0, 0.3).expect("should evaluate");
        let err = solver
            .formulation(&input)
            .verify(&hot)
            .expect_err("bottom is above critical");
        assert!(matches!(
            err,
            StepError::Unverified {
                constraint: Constraint::CriticalTemperature,
                ..
            }
        ));
    }
}
