//! Cycle ledger domain.
//!
//! Presses report cumulative counters; everything per-interval is derived
//! from consecutive readings of the same tool and never stored.

mod partial;
mod reading;

pub use partial::{partial_cycles, previous_reading, PartialPolicy};
pub use reading::{CycleReading, NewCycleReading, ReadingWithPartial};
