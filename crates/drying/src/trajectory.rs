//! Greedy optimization of a whole primary-drying run.
//!
//! The run is stepped forward in time. At each step the operating point is
//! re-optimized from scratch for the current dry-layer thickness, with no
//! lookahead, and the sublimation front is then advanced by explicit Euler.
//!
//! # Record convention
//!
//! Each record describes the state at the start of a step: the time, the
//! dried fraction, and the operating point chosen for the step that follows.
//! The final record of a completed run sits at the exact (fractional) time
//! the front reaches the vial bottom.
//!
//! # Failure handling
//!
//! Nothing short of an invalid config stops a run with an error. A step that
//! cannot be optimized is logged, recorded as a [`Warning`], and replaced by
//! the physics at the previous step's setting. Running out of time returns
//! the partial trajectory with [`Status::IncompleteTimedOut`].

mod cake;
mod event;
mod outcome;
mod record;
mod warning;

use lyo_solvers::Observer;

use crate::{
    config::{Axis, ConfigError, DEFAULT_MAX_DRYING_TIME, DryingConfig},
    physics::recession_rate,
    schedule::ScheduleSpec,
    step::{StepInput, StepSolution, StepSolver},
};

pub use cake::{Advance, CakeState};
pub use event::{Action, Event};
pub use outcome::{Status, Trajectory, Variant};
pub use record::OutputRecord;
pub use warning::Warning;

use warning::describe;

/// Runs the step-by-step optimization for one validated configuration.
#[derive(Debug)]
pub struct TrajectoryOptimizer {
    config: DryingConfig,
    solver: StepSolver,
    variant: Variant,
    fill_height: f64,
    budget: f64,
}

impl TrajectoryOptimizer {
    /// Validates `config` and prepares a run.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: DryingConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let variant = match (config.pressure.is_optimized(), config.temperature.is_optimized()) {
            (true, true) => Variant::Joint,
            (true, false) => Variant::PressureOnly,
            (false, true) => Variant::TemperatureOnly,
            (false, false) => return Err(ConfigError::NothingToOptimize),
        };

        let held = config
            .pressure
            .schedule()
            .or(config.temperature.schedule())
            .map(ScheduleSpec::total_time);
        let budget = match (held, config.max_drying_time) {
            (Some(total), Some(cap)) => total.min(cap),
            (Some(total), None) => total,
            (None, cap) => cap.unwrap_or(DEFAULT_MAX_DRYING_TIME),
        };

        let solver = StepSolver::from(&config);
        let fill_height = solver.fill_height();

        Ok(Self {
            config,
            solver,
            variant,
            fill_height,
            budget,
        })
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Initial frozen fill height [cm].
    #[must_use]
    pub fn fill_height(&self) -> f64 {
        self.fill_height
    }

    /// Time after which an unfinished run stops [hr].
    #[must_use]
    pub fn time_budget(&self) -> f64 {
        self.budget
    }

    #[must_use]
    pub fn config(&self) -> &DryingConfig {
        &self.config
    }

    #[must_use]
    pub fn solver(&self) -> &StepSolver {
        &self.solver
    }

    /// Runs to completion, time-out, or an unrecoverable step.
    #[must_use]
    pub fn run(&self) -> Trajectory {
        self.run_observed(&mut ())
    }

    /// Runs like [`TrajectoryOptimizer::run`], reporting each record.
    ///
    /// The observer receives an [`Event`] after every record and may return
    /// [`Action::StopEarly`] to end the run there.
    pub fn run_observed<O>(&self, observer: &mut O) -> Trajectory
    where
        O: Observer<Event, Action>,
    {
        tracing::debug!(
            variant = ?self.variant,
            budget = self.budget,
            fill_height = self.fill_height,
            "starting trajectory optimization"
        );

        let mut warnings = Vec::new();
        for warning in self.preflight() {
            push(&mut warnings, warning);
        }

        let mut records = Vec::new();
        let mut cake = CakeState::new(self.fill_height);
        let mut time = 0.0;
        let mut previous: Option<StepSolution> = None;
        let mut idle = false;
        let dt = self.config.timestep();

        let status = loop {
            let input = StepInput {
                cake_length: cake.length(),
                pressure: self.config.pressure.at(time),
                temperature: self.config.temperature.at(time),
                previous,
            };

            let solution = match self.solver.solve(&input) {
                Ok(solution) => solution,
                Err(err) => {
                    push(
                        &mut warnings,
                        Warning::OptimizationFailure {
                            time,
                            reason: describe(&err),
                        },
                    );
                    match self.solver.fallback(&input) {
                        Ok(solution) => solution,
                        Err(err) => {
                            tracing::debug!(time, error = %err, "fallback step failed");
                            break Status::IncompleteInfeasible;
                        }
                    }
                }
            };

            if solution.is_subliming() {
                idle = false;
            } else if !idle {
                idle = true;
                push(&mut warnings, Warning::NoSublimation { time });
            }

            let step = records.len();
            let record = OutputRecord::new(
                time,
                &solution,
                cake.dried_fraction(),
                self.config.vial.product_area,
            );
            records.push(record);
            previous = Some(solution);

            tracing::trace!(
                step,
                time,
                cake_length = cake.length(),
                pressure = solution.point.chamber_pressure,
                shelf_temperature = solution.point.shelf_temperature,
                "step recorded"
            );

            let event = Event {
                step,
                record,
                solution,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                break Status::StoppedByObserver;
            }

            if cake.is_dry() {
                break Status::Complete;
            }

            let rate = if solution.is_subliming() {
                recession_rate(
                    solution.point.sublimation_rate,
                    self.config.vial.product_area,
                    self.config.product.solute_fraction,
                )
            } else {
                0.0
            };

            match cake.advance(rate, dt) {
                Advance::Dried { elapsed } => time += elapsed,
                Advance::Stepped => {
                    time += dt;
                    if time >= self.budget {
                        push(
                            &mut warnings,
                            Warning::DryingIncomplete {
                                time,
                                dried_fraction: cake.dried_fraction(),
                            },
                        );
                        break Status::IncompleteTimedOut;
                    }
                }
            }
        };

        tracing::debug!(
            ?status,
            records = records.len(),
            time,
            dried_fraction = cake.dried_fraction(),
            warnings = warnings.len(),
            "trajectory optimization finished"
        );

        Trajectory {
            variant: self.variant,
            status,
            records,
            warnings,
        }
    }

    /// Warnings known before the first step.
    fn preflight(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();

        let axes = [
            (Axis::Pressure, &self.config.pressure),
            (Axis::Temperature, &self.config.temperature),
        ];
        for (axis, spec) in axes {
            let Some(schedule) = spec.schedule() else {
                continue;
            };
            warnings.extend(schedule.overruns().iter().map(|overrun| {
                Warning::RampOverrun {
                    axis,
                    segment: overrun.segment,
                    required: overrun.required,
                    available: overrun.available,
                }
            }));
        }

        let equipment = &self.config.equipment;
        let (low, high) = self.config.pressure.range();
        if let Some(pressure) = std::iter::once(low)
            .chain(high)
            .find(|&pressure| equipment.capacity(pressure) < 0.0)
        {
            warnings.push(Warning::NegativeCapacity {
                pressure,
                capacity: equipment.capacity(pressure),
            });
        }

        warnings
    }
}

fn push(warnings: &mut Vec<Warning>, warning: Warning) {
    warning.log();
    warnings.push(warning);
}
