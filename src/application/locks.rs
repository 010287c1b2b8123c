//! Per-table write serialization.
//!
//! Every mutating operation on a table runs while holding that table's
//! mutex. Reads never take these locks.
//!
//! Lock order when more than one is held: `Tools` before `Regenerations`.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Tables whose writes are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    CycleReadings,
    Regenerations,
    Tools,
    MetalSheets,
    TroubleReports,
}

/// One mutex per table, shared by every service built from the same instance.
#[derive(Debug, Clone, Default)]
pub struct TableLocks {
    cycle_readings: Arc<Mutex<()>>,
    regenerations: Arc<Mutex<()>>,
    tools: Arc<Mutex<()>>,
    metal_sheets: Arc<Mutex<()>>,
    trouble_reports: Arc<Mutex<()>>,
}

impl TableLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive write access to `table`.
    pub async fn lock(&self, table: Table) -> MutexGuard<'_, ()> {
        let mutex = match table {
            Table::CycleReadings => &self.cycle_readings,
            Table::Regenerations => &self.regenerations,
            Table::Tools => &self.tools,
            Table::MetalSheets => &self.metal_sheets,
            Table::TroubleReports => &self.trouble_reports,
        };
        mutex.lock().await
    }
}
