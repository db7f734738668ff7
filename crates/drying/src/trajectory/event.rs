use crate::step::StepSolution;

use super::OutputRecord;

/// Emitted after each record is appended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Zero-based record index.
    pub step: usize,
    pub record: OutputRecord,
    /// The operating point behind the record, fallback or optimized.
    pub solution: StepSolution,
}

/// Control actions an observer may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current record and return the trajectory so far.
    StopEarly,
}
