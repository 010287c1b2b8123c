//! Metal sheet command and query handlers.
//!
//! A sheet always belongs to a stored tool; the handlers check that before
//! writing so both storage backends reject orphans the same way.

mod add_metal_sheet;
mod delete_metal_sheet;
mod queries;
mod update_metal_sheet;

pub use add_metal_sheet::{AddMetalSheetCommand, AddMetalSheetHandler};
pub use delete_metal_sheet::{DeleteMetalSheetCommand, DeleteMetalSheetHandler};
pub use queries::{GetMetalSheetHandler, GetMetalSheetQuery, ListMetalSheetsHandler, ListMetalSheetsQuery};
pub use update_metal_sheet::{UpdateMetalSheetCommand, UpdateMetalSheetHandler};

use crate::application::AccountingError;
use crate::domain::foundation::{ErrorCode, MetalSheetId, ToolId};
use crate::domain::metal_sheet::MetalSheet;
use crate::ports::{MetalSheetRepository, ToolRepository};

async fn ensure_tool_exists(tools: &dyn ToolRepository, tool_id: ToolId) -> Result<(), AccountingError> {
    match tools.find_by_id(tool_id).await? {
        Some(_) => Ok(()),
        None => Err(AccountingError::not_found(
            ErrorCode::ToolNotFound,
            format!("Tool not found: {}", tool_id),
        )),
    }
}

async fn load_sheet(sheets: &dyn MetalSheetRepository, id: MetalSheetId) -> Result<MetalSheet, AccountingError> {
    sheets.find_by_id(id).await?.ok_or_else(|| {
        AccountingError::not_found(ErrorCode::MetalSheetNotFound, format!("Metal sheet not found: {}", id))
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::adapters::memory::{InMemoryMetalSheetRepository, InMemoryToolRepository};
    use crate::domain::foundation::ToolId;
    use crate::domain::metal_sheet::{MachineType, MetalSheetData};
    use crate::domain::tool::{NewTool, ToolData, ToolFormat};
    use crate::ports::ToolRepository;

    pub struct Fixture {
        pub tools: Arc<InMemoryToolRepository>,
        pub sheets: Arc<InMemoryMetalSheetRepository>,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                tools: Arc::new(InMemoryToolRepository::new()),
                sheets: Arc::new(InMemoryMetalSheetRepository::new()),
            }
        }

        pub async fn tool(&self, code: &str) -> ToolId {
            let data = ToolData::new(ToolFormat::new(600, 600).unwrap(), code).unwrap();
            self.tools.insert(&NewTool::new(data, None)).await.unwrap().id()
        }
    }

    pub fn sheet_data(tool_id: ToolId, tile_height: f64) -> MetalSheetData {
        MetalSheetData::new(tool_id, MachineType::Sacmi, tile_height, 12.0, 40, 1.5, 2.0).unwrap()
    }
}
