use super::Point;

/// Indicates whether the solver converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the configured tolerances.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,
}

/// The result of a golden section search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Best estimate of the optimum x.
    pub x: f64,

    /// Objective value at the reported x.
    pub objective: f64,

    /// Iteration count when the solver finished.
    pub iters: usize,
}

impl Solution {
    pub(super) fn new(status: Status, best: Point, iters: usize) -> Self {
        Self {
            status,
            x: best.x,
            objective: best.objective,
            iters,
        }
    }

    /// Returns the optimum as a [`Point`].
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.objective)
    }
}
