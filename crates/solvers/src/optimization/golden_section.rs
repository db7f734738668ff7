//! Golden section search for single-variable optimization.
//!
//! # Algorithm
//!
//! Golden section search finds the minimum (or maximum) of a unimodal function
//! on a bounded interval. It maintains two interior points positioned by the
//! golden ratio, compares their objectives, and shrinks the bracket toward the
//! better point. Each iteration reuses one interior point, so every shrink
//! costs a single new evaluation.
//!
//! # When to Use
//!
//! - The objective is unimodal on the bracket, or a coarse [`scan`] has
//!   already isolated a cell that contains a single optimum
//! - Derivatives are unavailable, as with objectives that are themselves the
//!   result of an inner root solve
//!
//! # Limitations
//!
//! - **Unimodal assumption**: may settle on a local optimum if several exist
//! - **Ties go left**: when both interior points score equally the bracket
//!   shrinks toward the left bound, so flat objectives resolve to the smaller x
//!
//! [`scan`]: crate::optimization::scan

mod bracket;
mod config;
mod error;
mod point;
mod search;
mod solution;


use std::error::Error as StdError;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use point::Point;
pub use solution::{Solution, Status};

use search::{Goal, search};

/// Finds the minimum of `objective` inside `bracket`.
///
/// # Errors
///
/// Returns an error if the bracket is non-finite, or if the objective fails or
/// returns a non-finite value at any evaluated point.
pub fn minimize<F, E>(objective: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    search(objective, bracket, config, Goal::Minimize)
}

/// Finds the maximum of `objective` inside `bracket`.
///
/// # Errors
///
/// Returns an error if the bracket is non-finite, or if the objective fails or
/// returns a non-finite value at any evaluated point.
pub fn maximize<F, E>(objective: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    search(objective, bracket, config, Goal::Maximize)
}
