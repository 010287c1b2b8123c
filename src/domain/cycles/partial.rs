//! Partial (per-interval) cycle arithmetic.
//!
//! A partial count is the difference between a reading and the reading
//! before it on the same tool. The first reading of a tool has nothing to
//! subtract and counts in full.

use tracing::warn;

use super::CycleReading;

/// How negative differences are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialPolicy {
    /// Clamp negative partial counts to zero (logged as a warning).
    pub clamp_negative: bool,
}

impl Default for PartialPolicy {
    fn default() -> Self {
        Self { clamp_negative: true }
    }
}

impl PartialPolicy {
    /// Reports raw differences, negative values included.
    pub fn raw() -> Self {
        Self { clamp_negative: false }
    }

    /// Applies the policy to a computed difference.
    pub fn apply(&self, current: &CycleReading, partial: i64) -> i64 {
        if partial >= 0 || !self.clamp_negative {
            return partial;
        }
        warn!(
            reading_id = %current.id(),
            tool_id = %current.tool_id(),
            partial,
            "Negative partial cycle count clamped to zero"
        );
        0
    }
}

/// Difference between `current` and `previous`, or `current` in full.
pub fn partial_cycles(
    current: &CycleReading,
    previous: Option<&CycleReading>,
    policy: PartialPolicy,
) -> i64 {
    let partial = match previous {
        Some(previous) => current.cumulative_count() - previous.cumulative_count(),
        None => current.cumulative_count(),
    };
    policy.apply(current, partial)
}

/// Picks the reading immediately before `current` among `candidates`.
///
/// Only readings of the same tool are considered.
pub fn previous_reading<'a>(
    current: &CycleReading,
    candidates: impl IntoIterator<Item = &'a CycleReading>,
) -> Option<&'a CycleReading> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.tool_id() == current.tool_id())
        .filter(|candidate| candidate.precedes(current))
        .max_by(|a, b| a.cmp_position(b))
}
