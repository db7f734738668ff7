//! Root finding for scalar residual functions.
//!
//! A residual is any `FnMut(f64) -> Result<f64, E>`; the solvers here drive it
//! toward zero on a caller-supplied interval.
//!
//! # Solvers
//!
//! - [`bisection`]: guaranteed convergence on a sign-changing bracket

pub mod bisection;
