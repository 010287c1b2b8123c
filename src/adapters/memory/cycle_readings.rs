//! In-memory cycle reading storage.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cycles::{previous_reading, CycleReading, NewCycleReading};
use crate::domain::foundation::{DomainError, ErrorCode, PressNumber, ReadingId, ToolId};
use crate::ports::CycleReadingRepository;

#[derive(Debug, Default)]
struct Readings {
    last_id: i64,
    rows: Vec<CycleReading>,
}

impl Readings {
    fn newest_first<F>(&self, keep: F) -> Vec<CycleReading>
    where
        F: Fn(&CycleReading) -> bool,
    {
        let mut selected: Vec<_> = self.rows.iter().filter(|r| keep(r)).cloned().collect();
        selected.sort_by(|a, b| b.cmp_position(a));
        selected
    }
}

/// In-memory storage for cycle readings.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCycleReadingRepository {
    readings: Arc<RwLock<Readings>>,
}

impl InMemoryCycleReadingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored readings.
    pub async fn count(&self) -> usize {
        self.readings.read().await.rows.len()
    }
}

#[async_trait]
impl CycleReadingRepository for InMemoryCycleReadingRepository {
    async fn insert(&self, reading: &NewCycleReading) -> Result<CycleReading, DomainError> {
        let mut readings = self.readings.write().await;
        readings.last_id += 1;
        let stored = reading.clone().into_reading(ReadingId::new(readings.last_id));
        readings.rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: ReadingId) -> Result<Option<CycleReading>, DomainError> {
        let readings = self.readings.read().await;
        Ok(readings.rows.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_previous(&self, reading: &CycleReading) -> Result<Option<CycleReading>, DomainError> {
        let readings = self.readings.read().await;
        Ok(previous_reading(reading, &readings.rows).cloned())
    }

    async fn find_latest_by_tool(&self, tool_id: ToolId) -> Result<Option<CycleReading>, DomainError> {
        let readings = self.readings.read().await;
        Ok(readings
            .rows
            .iter()
            .filter(|r| r.tool_id() == tool_id)
            .max_by(|a, b| a.cmp_position(b))
            .cloned())
    }

    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<CycleReading>, DomainError> {
        let readings = self.readings.read().await;
        Ok(readings.newest_first(|r| r.tool_id() == tool_id))
    }

    async fn list_by_press(&self, press: PressNumber) -> Result<Vec<CycleReading>, DomainError> {
        let readings = self.readings.read().await;
        Ok(readings.newest_first(|r| r.press() == Some(press)))
    }

    async fn list_all(&self) -> Result<Vec<CycleReading>, DomainError> {
        let readings = self.readings.read().await;
        Ok(readings.newest_first(|_| true))
    }

    async fn delete(&self, id: ReadingId) -> Result<(), DomainError> {
        let mut readings = self.readings.write().await;
        let before = readings.rows.len();
        readings.rows.retain(|r| r.id() != id);
        if readings.rows.len() == before {
            return Err(DomainError::new(
                ErrorCode::ReadingNotFound,
                format!("Cycle reading not found: {}", id),
            ));
        }
        Ok(())
    }
}
