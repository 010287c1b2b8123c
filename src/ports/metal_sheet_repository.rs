//! Metal sheet repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MetalSheetId, ToolId};
use crate::domain::metal_sheet::{MetalSheet, NewMetalSheet};

/// Repository port for metal sheets.
#[async_trait]
pub trait MetalSheetRepository: Send + Sync {
    /// Insert a sheet and return it with its assigned id.
    async fn insert(&self, sheet: &NewMetalSheet) -> Result<MetalSheet, DomainError>;

    /// Persist data and history of an existing sheet.
    ///
    /// # Errors
    ///
    /// - `MetalSheetNotFound` if the sheet doesn't exist
    async fn update(&self, sheet: &MetalSheet) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: MetalSheetId) -> Result<Option<MetalSheet>, DomainError>;

    async fn list(&self) -> Result<Vec<MetalSheet>, DomainError>;

    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<MetalSheet>, DomainError>;

    /// # Errors
    ///
    /// - `MetalSheetNotFound` if the sheet doesn't exist
    async fn delete(&self, id: MetalSheetId) -> Result<(), DomainError>;
}
