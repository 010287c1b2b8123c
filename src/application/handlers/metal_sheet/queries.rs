//! Metal sheet query handlers.

use std::sync::Arc;

use crate::application::AccountingError;
use crate::domain::foundation::{MetalSheetId, ToolId};
use crate::domain::metal_sheet::MetalSheet;
use crate::ports::MetalSheetRepository;

use super::load_sheet;

#[derive(Debug, Clone)]
pub struct GetMetalSheetQuery {
    pub sheet_id: MetalSheetId,
}

pub struct GetMetalSheetHandler {
    sheets: Arc<dyn MetalSheetRepository>,
}

impl GetMetalSheetHandler {
    pub fn new(sheets: Arc<dyn MetalSheetRepository>) -> Self {
        Self { sheets }
    }

    pub async fn handle(&self, query: GetMetalSheetQuery) -> Result<MetalSheet, AccountingError> {
        load_sheet(self.sheets.as_ref(), query.sheet_id).await
    }
}

/// Query for metal sheets, optionally only one tool's.
#[derive(Debug, Clone, Default)]
pub struct ListMetalSheetsQuery {
    pub tool_id: Option<ToolId>,
}

pub struct ListMetalSheetsHandler {
    sheets: Arc<dyn MetalSheetRepository>,
}

impl ListMetalSheetsHandler {
    pub fn new(sheets: Arc<dyn MetalSheetRepository>) -> Self {
        Self { sheets }
    }

    pub async fn handle(&self, query: ListMetalSheetsQuery) -> Result<Vec<MetalSheet>, AccountingError> {
        let sheets = match query.tool_id {
            Some(tool_id) => self.sheets.list_by_tool(tool_id).await?,
            None => self.sheets.list().await?,
        };
        Ok(sheets)
    }
}
