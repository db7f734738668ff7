use std::fmt;

use thiserror::Error;

use lyo_solvers::optimization::{golden_section, scan};

use crate::physics::{DomainError, SolveFailure};

/// A named constraint of the per-step program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    VaporPressure,
    MassTransfer,
    VialHeatBalance,
    ShelfHeatBalance,
    HeatTransferCoefficient,
    PressurePin,
    TemperaturePin,
    EquipmentCapacity,
    CriticalTemperature,
    PressureBounds,
    TemperatureBounds,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Constraint::VaporPressure => "vapor-pressure equilibrium",
            Constraint::MassTransfer => "mass transfer",
            Constraint::VialHeatBalance => "vial heat balance",
            Constraint::ShelfHeatBalance => "shelf heat balance",
            Constraint::HeatTransferCoefficient => "heat-transfer coefficient",
            Constraint::PressurePin => "scheduled chamber pressure",
            Constraint::TemperaturePin => "scheduled shelf temperature",
            Constraint::EquipmentCapacity => "equipment capacity",
            Constraint::CriticalTemperature => "critical product temperature",
            Constraint::PressureBounds => "chamber pressure bounds",
            Constraint::TemperatureBounds => "shelf temperature bounds",
        };
        f.write_str(name)
    }
}

/// Why a step could not produce a feasible operating point.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("no feasible operating point (best candidate violates constraints by {violation:e})")]
    Infeasible { violation: f64 },

    #[error("front temperature solve failed")]
    Front(#[from] SolveFailure),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("pressure scan failed")]
    Scan(#[source] scan::Error),

    #[error("pressure refinement failed")]
    Search(#[source] golden_section::Error),

    #[error("{constraint} violated by {residual:e}")]
    Unverified {
        constraint: Constraint,
        residual: f64,
    },
}
