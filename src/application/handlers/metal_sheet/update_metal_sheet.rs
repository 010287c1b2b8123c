//! UpdateMetalSheetHandler - Command handler for replacing a sheet's settings.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, Table, TableLocks};
use crate::domain::foundation::{Actor, MetalSheetId};
use crate::domain::metal_sheet::{MetalSheet, MetalSheetData};
use crate::ports::{MetalSheetRepository, ToolRepository};

use super::{ensure_tool_exists, load_sheet};

/// Command to replace a metal sheet's data.
#[derive(Debug, Clone)]
pub struct UpdateMetalSheetCommand {
    pub sheet_id: MetalSheetId,
    pub data: MetalSheetData,
    pub actor: Option<Actor>,
}

/// Handler for editing metal sheets.
pub struct UpdateMetalSheetHandler {
    sheets: Arc<dyn MetalSheetRepository>,
    tools: Arc<dyn ToolRepository>,
    locks: TableLocks,
}

impl UpdateMetalSheetHandler {
    pub fn new(sheets: Arc<dyn MetalSheetRepository>, tools: Arc<dyn ToolRepository>, locks: TableLocks) -> Self {
        Self { sheets, tools, locks }
    }

    /// # Errors
    ///
    /// - `NotFound` if the sheet, or the tool it is moved to, doesn't exist
    pub async fn handle(&self, cmd: UpdateMetalSheetCommand) -> Result<MetalSheet, AccountingError> {
        let _guard = self.locks.lock(Table::MetalSheets).await;
        let mut sheet = load_sheet(self.sheets.as_ref(), cmd.sheet_id).await?;

        if cmd.data.tool_id() != sheet.data().tool_id() {
            ensure_tool_exists(self.tools.as_ref(), cmd.data.tool_id()).await?;
        }

        sheet.replace(cmd.data, cmd.actor.as_ref());
        self.sheets.update(&sheet).await?;

        info!(metal_sheet_id = %sheet.id(), "Metal sheet updated");
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{sheet_data, Fixture};
    use super::*;
    use crate::domain::foundation::{ErrorCode, ToolId, UserId};
    use crate::domain::metal_sheet::NewMetalSheet;

    fn handler(fixture: &Fixture) -> UpdateMetalSheetHandler {
        UpdateMetalSheetHandler::new(fixture.sheets.clone(), fixture.tools.clone(), TableLocks::new())
    }

    #[tokio::test]
    async fn replaces_data_and_records_history() {
        let fixture = Fixture::new();
        let tool_id = fixture.tool("P1").await;
        let sheet = fixture
            .sheets
            .insert(&NewMetalSheet::new(sheet_data(tool_id, 8.5), None))
            .await
            .unwrap();
        let actor = Actor::new(UserId::new("u-3").unwrap(), "Tomo").unwrap();

        let updated = handler(&fixture)
            .handle(UpdateMetalSheetCommand {
                sheet_id: sheet.id(),
                data: sheet_data(tool_id, 9.0),
                actor: Some(actor),
            })
            .await
            .unwrap();

        assert_eq!(updated.data().tile_height(), 9.0);
        assert_eq!(updated.mods().len(), 1);
        let stored = fixture.sheets.find_by_id(sheet.id()).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn moving_to_unknown_tool_is_rejected() {
        let fixture = Fixture::new();
        let tool_id = fixture.tool("P1").await;
        let sheet = fixture
            .sheets
            .insert(&NewMetalSheet::new(sheet_data(tool_id, 8.5), None))
            .await
            .unwrap();

        let err = handler(&fixture)
            .handle(UpdateMetalSheetCommand {
                sheet_id: sheet.id(),
                data: sheet_data(ToolId::new(500), 8.5),
                actor: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ToolNotFound);
    }

    #[tokio::test]
    async fn unknown_sheet_is_not_found() {
        let fixture = Fixture::new();
        let tool_id = fixture.tool("P1").await;

        let err = handler(&fixture)
            .handle(UpdateMetalSheetCommand {
                sheet_id: MetalSheetId::new(3),
                data: sheet_data(tool_id, 8.5),
                actor: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::MetalSheetNotFound);
    }
}
