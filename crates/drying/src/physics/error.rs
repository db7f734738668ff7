use thiserror::Error;

use lyo_solvers::equation::bisection;

/// An input outside the range where a correlation is defined.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("temperature {celsius} °C is outside the vapor-pressure correlation")]
    Temperature { celsius: f64 },

    #[error("pressure {torr} Torr is outside the vapor-pressure correlation")]
    Pressure { torr: f64 },
}

/// Why an implicit front-temperature solve did not produce a value.
#[derive(Debug, Error)]
pub enum SolveFailure {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("root finder failed")]
    RootFinder(#[from] bisection::Error),

    #[error("root finder stopped after {iters} iterations with residual {residual}")]
    NotConverged { iters: usize, residual: f64 },
}
