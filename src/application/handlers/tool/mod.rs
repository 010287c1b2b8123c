//! Tool command and query handlers.
//!
//! The regeneration handlers keep a tool's `regenerating` flag and its open
//! regeneration in agreement: when the second half of a pair fails, the
//! first half is undone.

mod abort_tool_regeneration;
mod add_tool;
mod finish_tool_regeneration;
mod queries;
mod start_tool_regeneration;
mod update_tool;

pub use abort_tool_regeneration::{AbortToolRegenerationCommand, AbortToolRegenerationHandler};
pub use add_tool::{AddToolCommand, AddToolHandler};
pub use finish_tool_regeneration::{FinishToolRegenerationCommand, FinishToolRegenerationHandler};
pub use queries::{GetToolHandler, GetToolQuery, ListToolsHandler, ListToolsQuery};
pub use start_tool_regeneration::{
    StartToolRegenerationCommand, StartToolRegenerationHandler, StartToolRegenerationResult,
};
pub use update_tool::{UpdateToolCommand, UpdateToolHandler};

use tracing::error;

use crate::application::AccountingError;
use crate::domain::foundation::{Actor, ErrorCode, ToolId};
use crate::domain::tool::Tool;
use crate::ports::ToolRepository;

async fn load_tool(tools: &dyn ToolRepository, tool_id: ToolId) -> Result<Tool, AccountingError> {
    tools.find_by_id(tool_id).await?.ok_or_else(|| {
        AccountingError::not_found(ErrorCode::ToolNotFound, format!("Tool not found: {}", tool_id))
    })
}

/// Flags the tool as regenerating again after a failed finish or abort.
///
/// The undo is appended as a new change, so the stored history keeps the
/// flag-clear entry. Returns `cause` alone when the re-flag worked, both
/// errors when it didn't.
async fn reflag_tool(
    tools: &dyn ToolRepository,
    tool: &mut Tool,
    actor: Option<&Actor>,
    cause: AccountingError,
) -> AccountingError {
    let reflagged = match tool.set_regenerating(true, actor) {
        Ok(()) => tools.update(tool).await.map_err(AccountingError::from),
        Err(err) => Err(AccountingError::from(err)),
    };
    match reflagged {
        Ok(()) => cause,
        Err(reflag) => {
            error!(
                tool_id = %tool.id(),
                cause = %cause,
                reflag_error = %reflag,
                "Failed to flag tool again after regeneration step failed"
            );
            AccountingError::compensation_failed(cause, reflag)
        }
    }
}
