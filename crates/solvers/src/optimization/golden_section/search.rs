use std::error::Error as StdError;

use super::{Config, Error, Point, Solution, Status, bracket::GoldenBracket};

/// Whether smaller or larger objective values are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Goal {
    Minimize,
    Maximize,
}

impl Goal {
    /// Maps an objective onto a scale where smaller is always better.
    fn score(self, objective: f64) -> f64 {
        match self {
            Goal::Minimize => objective,
            Goal::Maximize => -objective,
        }
    }

    /// Returns true if `a` is at least as good as `b`.
    fn prefers(self, a: Point, b: Point) -> bool {
        self.score(a.objective) <= self.score(b.objective)
    }

    /// Returns `candidate` only if it strictly improves on `best`.
    fn better(self, best: Point, candidate: Point) -> Point {
        if self.score(candidate.objective) < self.score(best.objective) {
            candidate
        } else {
            best
        }
    }
}

/// Core golden section search shared by minimization and maximization.
pub(super) fn search<F, E>(
    mut objective: F,
    bracket: [f64; 2],
    config: &Config,
    goal: Goal,
) -> Result<Solution, Error>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    if let Some(&value) = bracket.iter().find(|value| !value.is_finite()) {
        return Err(Error::NonFiniteBracket { value });
    }

    let mut eval = |x: f64| -> Result<Point, Error> {
        let value = objective(x).map_err(|err| Error::Objective {
            x,
            source: Box::new(err),
        })?;
        if value.is_finite() {
            Ok(Point::new(x, value))
        } else {
            Err(Error::NonFiniteObjective {
                x,
                objective: value,
            })
        }
    };

    let mut bracket = GoldenBracket::new(bracket);
    let mut left = eval(bracket.inner_left)?;
    let mut right = eval(bracket.inner_right)?;
    let mut best = goal.better(left, right);

    for iter in 1..=config.max_iters() {
        if bracket.is_converged(config.x_abs_tol(), config.x_rel_tol()) {
            return Ok(Solution::new(Status::Converged, best, iter - 1));
        }

        if goal.prefers(left, right) {
            bracket.shrink_right();
            right = left;
            left = eval(bracket.inner_left)?;
            best = goal.better(best, left);
        } else {
            bracket.shrink_left();
            left = right;
            right = eval(bracket.inner_right)?;
            best = goal.better(best, right);
        }
    }

    let status = if bracket.is_converged(config.x_abs_tol(), config.x_rel_tol()) {
        Status::Converged
    } else {
        Status::MaxIters
    };
    Ok(Solution::new(status, best, config.max_iters()))
}
