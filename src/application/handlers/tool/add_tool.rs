//! AddToolHandler - Command handler for registering tools.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, Table, TableLocks};
use crate::domain::foundation::{Actor, PressNumber};
use crate::domain::tool::{NewTool, Tool, ToolData, ToolFormat};
use crate::ports::ToolRepository;

/// Command to register a tool.
#[derive(Debug, Clone)]
pub struct AddToolCommand {
    pub format: ToolFormat,
    pub code: String,
    pub press: Option<PressNumber>,
    pub actor: Option<Actor>,
}

/// Handler for registering tools.
pub struct AddToolHandler {
    tools: Arc<dyn ToolRepository>,
    locks: TableLocks,
}

impl AddToolHandler {
    pub fn new(tools: Arc<dyn ToolRepository>, locks: TableLocks) -> Self {
        Self { tools, locks }
    }

    /// # Errors
    ///
    /// - `Validation` for an empty or overlong code
    /// - `Conflict` if a tool with the same format and code exists
    pub async fn handle(&self, cmd: AddToolCommand) -> Result<Tool, AccountingError> {
        let mut data = ToolData::new(cmd.format, cmd.code)?;
        if let Some(press) = cmd.press {
            data = data.on_press(press);
        }
        let draft = NewTool::new(data, cmd.actor.as_ref());

        let _guard = self.locks.lock(Table::Tools).await;
        let tool = self.tools.insert(&draft).await?;

        info!(tool_id = %tool.id(), format = %tool.data().format(), code = tool.data().code(), "Tool added");
        Ok(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryToolRepository;
    use crate::domain::foundation::{ErrorCode, UserId};

    fn handler() -> AddToolHandler {
        AddToolHandler::new(Arc::new(InMemoryToolRepository::new()), TableLocks::new())
    }

    fn command(code: &str) -> AddToolCommand {
        AddToolCommand {
            format: ToolFormat::new(120, 60).unwrap(),
            code: code.to_string(),
            press: None,
            actor: Some(Actor::new(UserId::new("u-1").unwrap(), "Mara").unwrap()),
        }
    }

    #[tokio::test]
    async fn adds_tool_with_first_history_entry() {
        let tool = handler().handle(command("g01")).await.unwrap();

        assert_eq!(tool.data().code(), "G01");
        assert_eq!(tool.mods().len(), 1);
        assert_eq!(tool.mods().current().unwrap().snapshot(), tool.data());
    }

    #[tokio::test]
    async fn without_actor_history_stays_empty() {
        let mut cmd = command("G01");
        cmd.actor = None;

        let tool = handler().handle(cmd).await.unwrap();
        assert!(tool.mods().is_empty());
    }

    #[tokio::test]
    async fn duplicate_format_and_code_conflicts() {
        let handler = handler();
        handler.handle(command("G01")).await.unwrap();

        let err = handler.handle(command("G01")).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.code(), ErrorCode::DuplicateTool);
    }

    #[tokio::test]
    async fn blank_code_is_rejected() {
        let err = handler().handle(command("  ")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
