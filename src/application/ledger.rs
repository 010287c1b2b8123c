//! Cycle Ledger - stores cumulative readings and derives plain partial counts.
//!
//! The ledger knows nothing about regenerations. Regeneration-aware partials
//! are computed by [`AccountingService`](super::AccountingService).

use std::sync::Arc;

use tracing::info;

use crate::domain::cycles::{
    partial_cycles, CycleReading, NewCycleReading, PartialPolicy, ReadingWithPartial,
};
use crate::domain::foundation::{ErrorCode, PressNumber, ReadingId, ToolId};
use crate::ports::CycleReadingRepository;

use super::{AccountingError, Table, TableLocks};

/// Cumulative cycle readings keyed by tool.
#[derive(Clone)]
pub struct CycleLedger {
    readings: Arc<dyn CycleReadingRepository>,
    locks: TableLocks,
    policy: PartialPolicy,
}

impl CycleLedger {
    pub fn new(
        readings: Arc<dyn CycleReadingRepository>,
        locks: TableLocks,
        policy: PartialPolicy,
    ) -> Self {
        Self {
            readings,
            locks,
            policy,
        }
    }

    pub fn policy(&self) -> PartialPolicy {
        self.policy
    }

    /// Stores a validated reading.
    pub async fn record(&self, reading: NewCycleReading) -> Result<CycleReading, AccountingError> {
        let _guard = self.locks.lock(Table::CycleReadings).await;
        let stored = self.readings.insert(&reading).await?;

        info!(
            reading_id = %stored.id(),
            tool_id = %stored.tool_id(),
            cumulative_count = stored.cumulative_count(),
            "Cycle reading recorded"
        );
        Ok(stored)
    }

    /// # Errors
    ///
    /// - `NotFound` if no reading has this id
    pub async fn get(&self, id: ReadingId) -> Result<CycleReading, AccountingError> {
        self.readings.find_by_id(id).await?.ok_or_else(|| {
            AccountingError::not_found(
                ErrorCode::ReadingNotFound,
                format!("Cycle reading not found: {}", id),
            )
        })
    }

    /// Partial count against the immediately preceding reading of the same tool.
    pub async fn partial_cycles_for(&self, reading: &CycleReading) -> Result<i64, AccountingError> {
        let previous = self.readings.find_previous(reading).await?;
        Ok(partial_cycles(reading, previous.as_ref(), self.policy))
    }

    /// Readings of one tool, newest first, with plain partial counts.
    pub async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<ReadingWithPartial>, AccountingError> {
        let readings = self.readings.list_by_tool(tool_id).await?;
        let mut result = Vec::with_capacity(readings.len());
        for reading in readings {
            let partial_count = self.partial_cycles_for(&reading).await?;
            result.push(ReadingWithPartial {
                reading,
                partial_count,
            });
        }
        Ok(result)
    }

    /// Raw timeline of one tool, newest first.
    pub async fn readings_for_tool(&self, tool_id: ToolId) -> Result<Vec<CycleReading>, AccountingError> {
        Ok(self.readings.list_by_tool(tool_id).await?)
    }

    /// Readings taken on `press`, newest first.
    pub async fn readings_for_press(&self, press: PressNumber) -> Result<Vec<CycleReading>, AccountingError> {
        Ok(self.readings.list_by_press(press).await?)
    }

    /// Every reading, newest first.
    pub async fn list_all(&self) -> Result<Vec<CycleReading>, AccountingError> {
        Ok(self.readings.list_all().await?)
    }

    /// Newest reading of a tool, if any.
    pub async fn latest(&self, tool_id: ToolId) -> Result<Option<CycleReading>, AccountingError> {
        Ok(self.readings.find_latest_by_tool(tool_id).await?)
    }

    /// Removes a reading. Later partials re-derive against the new predecessor.
    pub async fn delete(&self, id: ReadingId) -> Result<(), AccountingError> {
        let _guard = self.locks.lock(Table::CycleReadings).await;
        self.readings.delete(id).await?;
        info!(reading_id = %id, "Cycle reading deleted");
        Ok(())
    }
}
