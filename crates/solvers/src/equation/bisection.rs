//! Bisection on a sign-changing bracket.
//!
//! The residual is evaluated at both endpoints. If either is already within
//! `residual_tol` it is returned immediately; otherwise the endpoints must have
//! opposite signs. Each iteration halves the bracket, keeping the half whose
//! endpoints still disagree in sign, until the bracket width or the residual
//! meets its tolerance.

mod config;
mod error;
mod solution;

use std::error::Error as StdError;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use solution::{Solution, Status};

/// Finds a root of `residual` inside `bracket`.
///
/// The bracket endpoints may be given in either order.
///
/// # Errors
///
/// Returns an error if the config or bracket is invalid, if the endpoint
/// residuals share a sign, or if the residual fails or is non-finite at any
/// evaluated point.
pub fn solve<F, E>(mut residual: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    config.validate()?;

    let (mut left, mut right) = validate_bracket(bracket)?;

    let mut eval = |x: f64| -> Result<f64, Error> {
        let value = residual(x).map_err(|err| Error::residual(x, err))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::NonFiniteResidual { x, residual: value })
        }
    };

    let mut left_residual = eval(left)?;
    if left_residual.abs() <= config.residual_tol {
        return Ok(converged(left, left_residual, 0));
    }

    let right_residual = eval(right)?;
    if right_residual.abs() <= config.residual_tol {
        return Ok(converged(right, right_residual, 0));
    }

    if left_residual.signum() == right_residual.signum() {
        return Err(Error::NoBracket {
            left,
            right,
            left_residual,
            right_residual,
        });
    }

    let (mut best_x, mut best_residual) = if left_residual.abs() <= right_residual.abs() {
        (left, left_residual)
    } else {
        (right, right_residual)
    };

    for iter in 1..=config.max_iters {
        let mid = 0.5 * (left + right);
        let mid_residual = eval(mid)?;

        let x_converged = (right - left).abs() <= config.x_abs_tol + config.x_rel_tol * mid.abs();
        if x_converged || mid_residual.abs() <= config.residual_tol {
            return Ok(converged(mid, mid_residual, iter));
        }

        if mid_residual.abs() < best_residual.abs() {
            best_x = mid;
            best_residual = mid_residual;
        }

        if left_residual.signum() == mid_residual.signum() {
            left = mid;
            left_residual = mid_residual;
        } else {
            right = mid;
        }
    }

    Ok(Solution {
        status: Status::MaxIters,
        x: best_x,
        residual: best_residual,
        iters: config.max_iters,
    })
}

fn converged(x: f64, residual: f64, iters: usize) -> Solution {
    Solution {
        status: Status::Converged,
        x,
        residual,
        iters,
    }
}

/// Validates bracket values and returns them in normalized (left < right) order.
fn validate_bracket(bracket: [f64; 2]) -> Result<(f64, f64), Error> {
    let [left, right] = bracket;

    if !left.is_finite() {
        return Err(Error::NonFiniteBracket { value: left });
    }

    if !right.is_finite() {
        return Err(Error::NonFiniteBracket { value: right });
    }

    #[allow(clippy::float_cmp)]
    if left == right {
        return Err(Error::ZeroWidthBracket { value: left });
    }

    if left < right {
        Ok((left, right))
    } else {
        Ok((right, left))
    }
}
