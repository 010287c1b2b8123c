//! AddMetalSheetHandler - Command handler for recording a tool's metal sheet.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, Table, TableLocks};
use crate::domain::foundation::Actor;
use crate::domain::metal_sheet::{MetalSheet, MetalSheetData, NewMetalSheet};
use crate::ports::{MetalSheetRepository, ToolRepository};

use super::ensure_tool_exists;

/// Command to add a metal sheet.
#[derive(Debug, Clone)]
pub struct AddMetalSheetCommand {
    pub data: MetalSheetData,
    pub actor: Option<Actor>,
}

/// Handler for adding metal sheets.
pub struct AddMetalSheetHandler {
    sheets: Arc<dyn MetalSheetRepository>,
    tools: Arc<dyn ToolRepository>,
    locks: TableLocks,
}

impl AddMetalSheetHandler {
    pub fn new(sheets: Arc<dyn MetalSheetRepository>, tools: Arc<dyn ToolRepository>, locks: TableLocks) -> Self {
        Self { sheets, tools, locks }
    }

    /// # Errors
    ///
    /// - `NotFound` if the sheet's tool doesn't exist
    pub async fn handle(&self, cmd: AddMetalSheetCommand) -> Result<MetalSheet, AccountingError> {
        let _guard = self.locks.lock(Table::MetalSheets).await;
        ensure_tool_exists(self.tools.as_ref(), cmd.data.tool_id()).await?;

        let sheet = self
            .sheets
            .insert(&NewMetalSheet::new(cmd.data, cmd.actor.as_ref()))
            .await?;

        info!(
            metal_sheet_id = %sheet.id(),
            tool_id = %sheet.data().tool_id(),
            machine = %sheet.data().machine(),
            "Metal sheet added"
        );
        Ok(sheet)
    }
}
