//! Best operating point at a fixed chamber pressure.
//!
//! At fixed pressure and cake length every quantity of interest rises with the
//! front temperature, so the best feasible point sits at the lowest of the
//! ceilings that the constraints put on it.

use crate::{
    config::OptimizationBounds,
    physics::{
        DryLayer, FrontSolve, OperatingPoint, inequality_residuals, solve_front_from_bottom,
        sublimation_temperature, vapor_pressure,
    },
};

use super::{FEASIBILITY_TOL, Flow, StepError, StepSolution, StepSolver};

/// A scored operating point at one trial pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Candidate {
    Feasible(StepSolution),
    Infeasible { violation: f64 },
}

impl Candidate {
    /// Driving force for feasible points, minus the violation otherwise.
    ///
    /// Every feasible point outscores every infeasible one, and infeasible
    /// points closer to feasibility score higher.
    pub(super) fn score(&self) -> f64 {
        match self {
            Candidate::Feasible(solution) => solution.point.driving_force().max(0.0),
            Candidate::Infeasible { violation } => -violation,
        }
    }
}

impl StepSolver {
    /// Operating point at a held shelf temperature, checked for feasibility.
    pub(super) fn at_held_shelf(
        &self,
        pressure: f64,
        shelf_temperature: f64,
        layer: &DryLayer,
    ) -> Result<Candidate, StepError> {
        let solution = self.operating_point(pressure, shelf_temperature, layer)?;
        Ok(self.classify(solution))
    }

    /// Best operating point when the shelf temperature is free within bounds.
    pub(super) fn at_bounded_shelf(
        &self,
        pressure: f64,
        bounds: OptimizationBounds,
        layer: &DryLayer,
    ) -> Result<Candidate, StepError> {
        let capacity = self.equipment.per_vial(pressure, self.vial_count);
        if capacity < 0.0 {
            return Ok(Candidate::Infeasible {
                violation: -self.equipment.capacity(pressure),
            });
        }

        let frost = sublimation_temperature(pressure)?;

        let critical_temperature = self.product.critical_temperature;
        let critical = if vapor_pressure(critical_temperature)? <= pressure {
            frost
        } else {
            match solve_front_from_bottom(critical_temperature, pressure, layer) {
                FrontSolve::Converged(t) => t,
                FrontSolve::NoSublimation => frost,
                FrontSolve::Failed(err) => return Err(err.into()),
            }
        };

        let max_front_pressure =
            pressure + capacity * 1000.0 * layer.resistance / self.vial.product_area;
        let capped = sublimation_temperature(max_front_pressure)?;

        let mut front = critical.min(capped);

        if let Some(max_shelf) = bounds.max {
            match self.front_at_shelf(pressure, max_shelf, layer) {
                FrontSolve::Converged(t) => front = front.min(t),
                FrontSolve::NoSublimation => {
                    let point = OperatingPoint::idle(pressure, max_shelf, &self.heat_transfer)?;
                    return Ok(self.classify(self.solution(point, layer, Flow::NoSublimation)));
                }
                FrontSolve::Failed(err) => return Err(err.into()),
            }
        }

        let point = self.resolve(pressure, front, layer)?;
        if point.shelf_temperature < bounds.min - FEASIBILITY_TOL {
            return Ok(Candidate::Infeasible {
                violation: bounds.min - point.shelf_temperature,
            });
        }

        let flow = if point.sublimation_rate > 0.0 {
            Flow::Subliming
        } else {
            Flow::NoSublimation
        };
        Ok(self.classify(self.solution(point, layer, flow)))
    }

    fn classify(&self, solution: StepSolution) -> Candidate {
        let [capacity, temperature] = inequality_residuals(
            &solution.point,
            self.product.critical_temperature,
            &self.equipment,
            self.vial_count,
        );
        let violation = (-capacity).max(0.0) + (-temperature).max(0.0);
        if violation > FEASIBILITY_TOL {
            Candidate::Infeasible { violation }
        } else {
            Candidate::Feasible(solution)
        }
    }
}
