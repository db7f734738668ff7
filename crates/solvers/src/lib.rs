//! Bracketed scalar numerics for primary-drying models.
//!
//! Every solve in the drying model reduces to a one-dimensional search on a
//! known interval:
//!
//! - [`equation::bisection`] finds the sublimation-front temperature that
//!   closes an energy balance.
//! - [`optimization::scan`] and [`optimization::golden_section`] locate the
//!   chamber pressure with the largest feasible sublimation driving force.
//!
//! Callers that want to watch a long-running computation implement
//! [`Observer`].

mod observe;

pub mod equation;
pub mod optimization;

pub use observe::Observer;
