//! AbortToolRegenerationHandler - Cancels a tool regeneration that shouldn't have started.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, RegenerationTracker, Table, TableLocks};
use crate::domain::foundation::{Actor, ErrorCode, ToolId};
use crate::ports::ToolRepository;

use super::{load_tool, reflag_tool};

/// Command to abort a tool's open regeneration.
#[derive(Debug, Clone)]
pub struct AbortToolRegenerationCommand {
    pub tool_id: ToolId,
    pub actor: Option<Actor>,
}

/// Handler for aborting tool regenerations.
pub struct AbortToolRegenerationHandler {
    tools: Arc<dyn ToolRepository>,
    tracker: RegenerationTracker,
    locks: TableLocks,
}

impl AbortToolRegenerationHandler {
    pub fn new(tools: Arc<dyn ToolRepository>, tracker: RegenerationTracker, locks: TableLocks) -> Self {
        Self {
            tools,
            tracker,
            locks,
        }
    }

    /// # Errors
    ///
    /// - `NotFound` if the tool doesn't exist or has no open regeneration
    /// - `CompensationFailed` if the abort failed and the tool couldn't be flagged again
    pub async fn handle(&self, cmd: AbortToolRegenerationCommand) -> Result<(), AccountingError> {
        let _guard = self.locks.lock(Table::Tools).await;
        let mut tool = load_tool(self.tools.as_ref(), cmd.tool_id).await?;

        if self.tracker.open_regeneration(cmd.tool_id).await?.is_none() {
            return Err(AccountingError::not_found(
                ErrorCode::RegenerationNotFound,
                format!("Tool {} has no open regeneration", cmd.tool_id),
            ));
        }

        let cleared = tool.data().is_regenerating();
        if cleared {
            tool.set_regenerating(false, cmd.actor.as_ref())?;
            self.tools.update(&tool).await?;
        }

        match self.tracker.abort(cmd.tool_id).await {
            Ok(()) => {
                info!(tool_id = %cmd.tool_id, "Tool regeneration aborted");
                Ok(())
            }
            Err(cause) if cleared => {
                Err(reflag_tool(self.tools.as_ref(), &mut tool, cmd.actor.as_ref(), cause).await)
            }
            Err(cause) => Err(cause),
        }
    }
}
