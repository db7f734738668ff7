//! Uniform grid scan for bracketing a maximum.
//!
//! The objective is sampled at `points` evenly spaced values across the range,
//! endpoints included. The best sample and its neighbors define the bracket
//! handed on to a local refinement such as [`golden_section`].
//!
//! Ties keep the earliest sample, so a flat objective resolves to the lower
//! end of the range.
//!
//! [`golden_section`]: crate::optimization::golden_section

use std::error::Error as StdError;

use thiserror::Error;

use super::golden_section::Point;

/// Errors that can occur during a scan.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a scan needs at least two points, got {points}")]
    TooFewPoints { points: usize },

    #[error("range contains non-finite value: {value}")]
    NonFiniteRange { value: f64 },

    #[error("objective evaluation failed at x = {x}")]
    Objective {
        x: f64,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("non-finite objective {objective} at x = {x}")]
    NonFiniteObjective { x: f64, objective: f64 },
}

/// The best sample of a scan and the cell around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scan {
    /// The sample with the largest objective.
    pub best: Point,

    /// Index of `best` within the grid.
    pub index: usize,

    /// Neighboring grid values around `best`, clipped to the range.
    pub bracket: [f64; 2],
}

/// Samples `objective` on a uniform grid and returns its largest value.
///
/// # Errors
///
/// Returns an error if fewer than two points are requested, the range is
/// non-finite, or the objective fails or is non-finite at any sample.
pub fn maximize<F, E>(mut objective: F, range: [f64; 2], points: usize) -> Result<Scan, Error>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    if points < 2 {
        return Err(Error::TooFewPoints { points });
    }
    if let Some(&value) = range.iter().find(|value| !value.is_finite()) {
        return Err(Error::NonFiniteRange { value });
    }

    let grid = grid(range, points);
    let mut best: Option<(usize, Point)> = None;

    for (index, &x) in grid.iter().enumerate() {
        let value = objective(x).map_err(|err| Error::Objective {
            x,
            source: Box::new(err),
        })?;
        if !value.is_finite() {
            return Err(Error::NonFiniteObjective {
                x,
                objective: value,
            });
        }

        if best.is_none_or(|(_, point)| value > point.objective) {
            best = Some((index, Point::new(x, value)));
        }
    }

    // At least two samples were taken, so `best` is set.
    let (index, best) = best.ok_or(Error::TooFewPoints { points })?;
    let bracket = [grid[index.saturating_sub(1)], grid[(index + 1).min(points - 1)]];

    Ok(Scan {
        best,
        index,
        bracket,
    })
}

/// Evenly spaced values from `range[0]` to exactly `range[1]`.
fn grid(range: [f64; 2], points: usize) -> Vec<f64> {
    let [start, end] = range;
    let last = points - 1;
    #[allow(clippy::cast_precision_loss)]
    let step = (end - start) / last as f64;

    (0..points)
        .map(|i| {
            if i == last {
                end
            } else {
                #[allow(clippy::cast_precision_loss)]
                let offset = step * i as f64;
                start + offset
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    fn ok(value: f64) -> Result<f64, Infallible> {
        Ok(value)
    }

    #[test]
    fn grid_includes_both_ends() {
        let values = grid([0.04, 0.20], 5);

        assert_eq!(values.len(), 5);
        assert_relative_eq!(values[0], 0.04);
        assert_relative_eq!(values[2], 0.12);
        assert_eq!(values[4], 0.20);
    }

    #[test]
    fn brackets_interior_peak() {
        let scan = maximize(|x| ok(-(x - 0.33).powi(2)), [0.0, 1.0], 11).expect("should scan");

        assert_eq!(scan.index, 3);
        assert_relative_eq!(scan.best.x, 0.3);
        assert_relative_eq!(scan.bracket[0], 0.2);
        assert_relative_eq!(scan.bracket[1], 0.4);
    }

    #[test]
    fn bracket_is_clipped_at_range_ends() {
        let scan = maximize(|x| ok(x), [1.0, 2.0], 4).expect("should scan");

        assert_eq!(scan.index, 3);
        assert_relative_eq!(scan.bracket[0], 1.0 + 2.0 / 3.0);
        assert_relative_eq!(scan.bracket[1], 2.0);
    }

    #[test]
    fn ties_keep_the_first_sample() {
        let scan = maximize(|_| ok(0.0), [0.05, 0.5], 10).expect("should scan");

        assert_eq!(scan.index, 0);
        assert_relative_eq!(scan.best.x, 0.05);
    }

    #[test]
    fn rejects_bad_requests() {
        assert!(matches!(
            maximize(|x| ok(x), [0.0, 1.0], 1),
            Err(Error::TooFewPoints { points: 1 })
        ));
        assert!(matches!(
            maximize(|x| ok(x), [f64::NAN, 1.0], 5),
            Err(Error::NonFiniteRange { .. })
        ));
        assert!(matches!(
            maximize(|x| ok(1.0 / (x - 0.5)), [0.0, 1.0], 3),
            Err(Error::NonFiniteObjective { .. })
        ));
    }
}
