//! Maximizing or minimizing a scalar objective over an interval.
//!
//! # Solvers
//!
//! - [`scan`]: uniform sampling that finds the best grid point and the cell
//!   around it
//! - [`golden_section`]: derivative-free refinement of a unimodal objective
//!   on a bracket
//!
//! The two are meant to be chained: a coarse scan tolerates objectives that
//! are only piecewise unimodal, and golden section then converges inside the
//! winning cell.

pub mod golden_section;
pub mod scan;
