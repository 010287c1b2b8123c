//! DeleteMetalSheetHandler - Removes a metal sheet.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, Table, TableLocks};
use crate::domain::foundation::MetalSheetId;
use crate::ports::MetalSheetRepository;

#[derive(Debug, Clone)]
pub struct DeleteMetalSheetCommand {
    pub sheet_id: MetalSheetId,
}

pub struct DeleteMetalSheetHandler {
    sheets: Arc<dyn MetalSheetRepository>,
    locks: TableLocks,
}

impl DeleteMetalSheetHandler {
    pub fn new(sheets: Arc<dyn MetalSheetRepository>, locks: TableLocks) -> Self {
        Self { sheets, locks }
    }

    pub async fn handle(&self, cmd: DeleteMetalSheetCommand) -> Result<(), AccountingError> {
        let _guard = self.locks.lock(Table::MetalSheets).await;
        self.sheets.delete(cmd.sheet_id).await?;
        info!(metal_sheet_id = %cmd.sheet_id, "Metal sheet deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{sheet_data, Fixture};
    use super::*;
    use crate::domain::metal_sheet::NewMetalSheet;

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let fixture = Fixture::new();
        let tool_id = fixture.tool("P1").await;
        let sheet = fixture
            .sheets
            .insert(&NewMetalSheet::new(sheet_data(tool_id, 8.5), None))
            .await
            .unwrap();
        let handler = DeleteMetalSheetHandler::new(fixture.sheets.clone(), TableLocks::new());

        handler
            .handle(DeleteMetalSheetCommand { sheet_id: sheet.id() })
            .await
            .unwrap();
        let err = handler
            .handle(DeleteMetalSheetCommand { sheet_id: sheet.id() })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
