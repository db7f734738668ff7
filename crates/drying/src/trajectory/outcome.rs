use ndarray::Array2;

use super::{OutputRecord, Warning};

/// Which axes the optimizer chooses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Chamber pressure is optimized; shelf temperature follows a schedule.
    PressureOnly,
    /// Shelf temperature is optimized; chamber pressure follows a schedule.
    TemperatureOnly,
    /// Both axes are optimized.
    Joint,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The front reached the vial bottom.
    Complete,
    /// The time budget ran out first.
    IncompleteTimedOut,
    /// A step could not be evaluated even at the fallback setting.
    IncompleteInfeasible,
    /// An observer asked to stop.
    StoppedByObserver,
}

/// The result of a run: records in time order plus any warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub variant: Variant,
    pub status: Status,
    pub records: Vec<OutputRecord>,
    pub warnings: Vec<Warning>,
}

impl Trajectory {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }

    /// Time at which drying finished [hr], if it did.
    #[must_use]
    pub fn drying_time(&self) -> Option<f64> {
        if self.is_complete() {
            self.records.last().map(|record| record.time)
        } else {
            None
        }
    }

    /// Dried fraction of the last record, zero for an empty trajectory.
    #[must_use]
    pub fn final_fraction(&self) -> f64 {
        self.records.last().map_or(0.0, |record| record.dried_fraction)
    }

    #[must_use]
    pub fn max_bottom_temperature(&self) -> Option<f64> {
        self.max_of(|record| record.bottom_temperature)
    }

    #[must_use]
    pub fn max_shelf_temperature(&self) -> Option<f64> {
        self.max_of(|record| record.shelf_temperature)
    }

    /// Records as an `N × 7` array, columns in [`OutputRecord::COLUMNS`] order.
    #[must_use]
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.records.len(), OutputRecord::COLUMNS.len()), |(i, j)| {
            self.records[i].to_row()[j]
        })
    }

    fn max_of(&self, field: impl Fn(&OutputRecord) -> f64) -> Option<f64> {
        self.records.iter().map(field).reduce(f64::max)
    }
}
