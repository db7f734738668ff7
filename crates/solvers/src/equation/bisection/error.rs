use std::error::Error as StdError;

use thiserror::Error;

use super::ConfigError;

/// Errors that can occur during bisection solving.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bracket has zero width: left and right are both {value}")]
    ZeroWidthBracket { value: f64 },

    #[error("bracket contains non-finite value: {value}")]
    NonFiniteBracket { value: f64 },

    #[error("no root in bracket: f({left})={left_residual}, f({right})={right_residual}")]
    NoBracket {
        left: f64,
        right: f64,
        left_residual: f64,
        right_residual: f64,
    },

    #[error("invalid config")]
    InvalidConfig(#[from] ConfigError),

    #[error("residual evaluation failed at x = {x}")]
    Residual {
        x: f64,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("non-finite residual {residual} at x = {x}")]
    NonFiniteResidual { x: f64, residual: f64 },
}

impl Error {
    pub(super) fn residual<E: StdError + Send + Sync + 'static>(x: f64, err: E) -> Self {
        Self::Residual {
            x,
            source: Box::new(err),
        }
    }
}
