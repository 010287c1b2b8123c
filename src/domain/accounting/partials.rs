//! Regeneration-aware partial cycles.
//!
//! A partial interval never spans a completed regeneration: when a
//! regeneration of the same tool completed after the previous reading and
//! no later than the current one, the current reading counts from zero.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::cycles::{
    partial_cycles, previous_reading, CycleReading, PartialPolicy, ReadingWithPartial,
};
use crate::domain::foundation::ToolId;
use crate::domain::regeneration::Regeneration;

/// Returns the regeneration that resets the baseline between two readings.
pub fn resetting_regeneration<'a>(
    previous: &CycleReading,
    current: &CycleReading,
    regenerations: &'a [Regeneration],
) -> Option<&'a Regeneration> {
    regenerations
        .iter()
        .filter(|r| r.tool_id() == current.tool_id())
        .find(|r| r.completed_within(previous.stop(), current.stop()))
}

/// Partial cycles of `current` given its ledger predecessor.
pub fn partial_cycles_across_regenerations(
    current: &CycleReading,
    previous: Option<&CycleReading>,
    regenerations: &[Regeneration],
    policy: PartialPolicy,
) -> i64 {
    let Some(previous) = previous else {
        return partial_cycles(current, None, policy);
    };

    match resetting_regeneration(previous, current, regenerations) {
        Some(regeneration) => {
            debug!(
                reading_id = %current.id(),
                regeneration_id = %regeneration.id(),
                "Baseline reset by completed regeneration"
            );
            partial_cycles(current, None, policy)
        }
        None => partial_cycles(current, Some(previous), policy),
    }
}

/// Derives partial counts for a batch of readings.
///
/// Readings may belong to several tools; each is compared against its own
/// tool's timeline. The result is ordered newest first.
pub fn with_partials(
    readings: Vec<CycleReading>,
    regenerations: &[Regeneration],
    policy: PartialPolicy,
) -> Vec<ReadingWithPartial> {
    let mut by_tool: BTreeMap<ToolId, Vec<CycleReading>> = BTreeMap::new();
    for reading in readings {
        by_tool.entry(reading.tool_id()).or_default().push(reading);
    }

    let mut result = Vec::new();
    for (_, mut timeline) in by_tool {
        timeline.sort_by(|a, b| a.cmp_position(b));

        let mut previous: Option<&CycleReading> = None;
        let mut computed = Vec::with_capacity(timeline.len());
        for reading in &timeline {
            let partial =
                partial_cycles_across_regenerations(reading, previous, regenerations, policy);
            computed.push(partial);
            previous = Some(reading);
        }

        result.extend(
            timeline
                .into_iter()
                .zip(computed)
                .map(|(reading, partial_count)| ReadingWithPartial {
                    reading,
                    partial_count,
                }),
        );
    }

    result.sort_by(|a, b| b.reading.cmp_position(&a.reading));
    result
}

/// Partial count of a single reading drawn from its tool's timeline.
pub fn partial_for_reading(
    current: &CycleReading,
    timeline: &[CycleReading],
    regenerations: &[Regeneration],
    policy: PartialPolicy,
) -> i64 {
    let previous = previous_reading(current, timeline);
    partial_cycles_across_regenerations(current, previous, regenerations, policy)
}
