//! Cycles accumulated since the last regeneration.

use tracing::warn;

use crate::domain::cycles::{CycleReading, ReadingWithPartial};
use crate::domain::foundation::Timestamp;
use crate::domain::regeneration::Regeneration;

/// Exclusive lower bound of the readings that count toward a total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cutoff {
    /// No regeneration: every reading counts.
    Everything,
    /// Readings positioned after the regeneration's baseline reading.
    AfterReading(CycleReading),
    /// Readings stopped after the regeneration started.
    AfterTime(Timestamp),
}

impl Cutoff {
    /// Resolves the cutoff for a tool's last regeneration.
    ///
    /// `timeline` must hold the tool's readings; the baseline reading is
    /// looked up there. A regeneration started before any reading existed,
    /// or whose baseline row has since been deleted, falls back to its
    /// start time.
    pub fn for_regeneration(regeneration: Option<&Regeneration>, timeline: &[CycleReading]) -> Self {
        let Some(regeneration) = regeneration else {
            return Cutoff::Everything;
        };

        match regeneration.baseline_reading() {
            Some(baseline_id) => match timeline.iter().find(|r| r.id() == baseline_id) {
                Some(baseline) => Cutoff::AfterReading(baseline.clone()),
                None => {
                    warn!(
                        regeneration_id = %regeneration.id(),
                        baseline_reading = %baseline_id,
                        "Baseline reading missing, falling back to regeneration start"
                    );
                    Cutoff::AfterTime(*regeneration.start())
                }
            },
            None => Cutoff::AfterTime(*regeneration.start()),
        }
    }

    /// True when `reading` counts toward the total.
    pub fn includes(&self, reading: &CycleReading) -> bool {
        match self {
            Cutoff::Everything => true,
            Cutoff::AfterReading(baseline) => baseline.precedes(reading),
            Cutoff::AfterTime(start) => reading.stop() > start,
        }
    }
}

/// Sums the partial counts of readings past `cutoff`.
pub fn total_since(readings: &[ReadingWithPartial], cutoff: &Cutoff) -> i64 {
    readings
        .iter()
        .filter(|r| cutoff.includes(&r.reading))
        .map(|r| r.partial_count)
        .sum()
}
