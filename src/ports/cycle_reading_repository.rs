//! Cycle reading repository port.
//!
//! Readings are insert-only rows; partial counts are never stored.
//!
//! # Ordering
//!
//! Lists are returned newest first by `(stop, id)`.

use async_trait::async_trait;

use crate::domain::cycles::{CycleReading, NewCycleReading};
use crate::domain::foundation::{DomainError, PressNumber, ReadingId, ToolId};

/// Repository port for cycle readings.
#[async_trait]
pub trait CycleReadingRepository: Send + Sync {
    /// Insert a reading and return it with its assigned id.
    ///
    /// Ids grow monotonically with each insert.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, reading: &NewCycleReading) -> Result<CycleReading, DomainError>;

    /// Find a reading by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: ReadingId) -> Result<Option<CycleReading>, DomainError>;

    /// Find the reading immediately before `reading` on the same tool.
    async fn find_previous(&self, reading: &CycleReading) -> Result<Option<CycleReading>, DomainError>;

    /// Find the newest reading of a tool.
    async fn find_latest_by_tool(&self, tool_id: ToolId) -> Result<Option<CycleReading>, DomainError>;

    /// All readings of a tool.
    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<CycleReading>, DomainError>;

    /// All readings taken while a tool was mounted on `press`.
    async fn list_by_press(&self, press: PressNumber) -> Result<Vec<CycleReading>, DomainError>;

    /// Every reading.
    async fn list_all(&self) -> Result<Vec<CycleReading>, DomainError>;

    /// Delete a reading.
    ///
    /// # Errors
    ///
    /// - `ReadingNotFound` if the reading doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: ReadingId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_reading_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CycleReadingRepository) {}
    }
}
