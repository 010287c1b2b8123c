//! Cumulative cycle readings.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::foundation::{Actor, PressNumber, ReadingId, Timestamp, ToolId, ValidationError};

/// Validated input for a reading that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCycleReading {
    tool_id: ToolId,
    press: Option<PressNumber>,
    cumulative_count: i64,
    start: Timestamp,
    stop: Timestamp,
    performed_by: Option<Actor>,
}

impl NewCycleReading {
    /// Validates `cumulative_count >= 0` and `stop >= start`.
    pub fn new(
        tool_id: ToolId,
        cumulative_count: i64,
        start: Timestamp,
        stop: Timestamp,
    ) -> Result<Self, ValidationError> {
        if cumulative_count < 0 {
            return Err(ValidationError::negative("cumulative_count", cumulative_count));
        }
        if stop < start {
            return Err(ValidationError::inverted_interval(
                start.as_datetime().to_rfc3339(),
                stop.as_datetime().to_rfc3339(),
            ));
        }
        Ok(Self {
            tool_id,
            press: None,
            cumulative_count,
            start,
            stop,
            performed_by: None,
        })
    }

    /// Records which press the tool was mounted on.
    pub fn on_press(mut self, press: PressNumber) -> Self {
        self.press = Some(press);
        self
    }

    /// Records who took the reading.
    pub fn performed_by(mut self, actor: Actor) -> Self {
        self.performed_by = Some(actor);
        self
    }

    pub fn tool_id(&self) -> ToolId {
        self.tool_id
    }

    pub fn press(&self) -> Option<PressNumber> {
        self.press
    }

    pub fn cumulative_count(&self) -> i64 {
        self.cumulative_count
    }

    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    pub fn stop(&self) -> &Timestamp {
        &self.stop
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.performed_by.as_ref()
    }

    /// Attaches the store-assigned id.
    pub fn into_reading(self, id: ReadingId) -> CycleReading {
        CycleReading {
            id,
            tool_id: self.tool_id,
            press: self.press,
            cumulative_count: self.cumulative_count,
            start: self.start,
            stop: self.stop,
            performed_by: self.performed_by,
        }
    }
}

/// An odometer-style counter value reported for a tool at `stop`.
///
/// Readings of one tool are ordered by `(stop, id)`; see [`CycleReading::cmp_position`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReading {
    id: ReadingId,
    tool_id: ToolId,
    press: Option<PressNumber>,
    cumulative_count: i64,
    start: Timestamp,
    stop: Timestamp,
    performed_by: Option<Actor>,
}

impl CycleReading {
    /// Reconstitute a reading from persistence (no validation).
    pub fn reconstitute(
        id: ReadingId,
        tool_id: ToolId,
        press: Option<PressNumber>,
        cumulative_count: i64,
        start: Timestamp,
        stop: Timestamp,
        performed_by: Option<Actor>,
    ) -> Self {
        Self {
            id,
            tool_id,
            press,
            cumulative_count,
            start,
            stop,
            performed_by,
        }
    }

    pub fn id(&self) -> ReadingId {
        self.id
    }

    pub fn tool_id(&self) -> ToolId {
        self.tool_id
    }

    pub fn press(&self) -> Option<PressNumber> {
        self.press
    }

    pub fn cumulative_count(&self) -> i64 {
        self.cumulative_count
    }

    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    pub fn stop(&self) -> &Timestamp {
        &self.stop
    }

    pub fn performed_by(&self) -> Option<&Actor> {
        self.performed_by.as_ref()
    }

    /// Position of this reading in its tool's timeline.
    pub fn cmp_position(&self, other: &CycleReading) -> Ordering {
        (self.stop, self.id).cmp(&(other.stop, other.id))
    }

    /// True when `self` comes before `other` in the tool's timeline.
    pub fn precedes(&self, other: &CycleReading) -> bool {
        self.cmp_position(other) == Ordering::Less
    }
}

/// A reading together with its derived interval count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingWithPartial {
    #[serde(flatten)]
    pub reading: CycleReading,
    pub partial_count: i64,
}
