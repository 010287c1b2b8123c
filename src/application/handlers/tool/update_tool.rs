//! UpdateToolHandler - Command handler for editing a tool's format, code and press.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, Table, TableLocks};
use crate::domain::foundation::{Actor, ErrorCode, PressNumber, ToolId};
use crate::domain::tool::{Tool, ToolFormat};
use crate::ports::ToolRepository;

/// Command to edit a tool.
///
/// The regenerating flag is not editable here; it follows the tool's
/// regenerations.
#[derive(Debug, Clone)]
pub struct UpdateToolCommand {
    pub tool_id: ToolId,
    pub format: ToolFormat,
    pub code: String,
    pub press: Option<PressNumber>,
    pub actor: Option<Actor>,
}

/// Handler for editing tools.
pub struct UpdateToolHandler {
    tools: Arc<dyn ToolRepository>,
    locks: TableLocks,
}

impl UpdateToolHandler {
    pub fn new(tools: Arc<dyn ToolRepository>, locks: TableLocks) -> Self {
        Self { tools, locks }
    }

    /// # Errors
    ///
    /// - `NotFound` if the tool doesn't exist
    /// - `Validation` for an empty or overlong code
    /// - `Conflict` if another tool already has the new format and code
    pub async fn handle(&self, cmd: UpdateToolCommand) -> Result<Tool, AccountingError> {
        let _guard = self.locks.lock(Table::Tools).await;

        let mut tool = self.tools.find_by_id(cmd.tool_id).await?.ok_or_else(|| {
            AccountingError::not_found(
                ErrorCode::ToolNotFound,
                format!("Tool not found: {}", cmd.tool_id),
            )
        })?;

        tool.modify(cmd.actor.as_ref(), |data| {
            data.set_format(cmd.format);
            data.set_code(cmd.code)?;
            data.set_press(cmd.press);
            Ok(())
        })?;
        self.tools.update(&tool).await?;

        info!(tool_id = %tool.id(), "Tool updated");
        Ok(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryToolRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::tool::{NewTool, ToolData};

    fn actor(name: &str) -> Actor {
        Actor::new(UserId::new(format!("u-{}", name)).unwrap(), name).unwrap()
    }

    async fn seeded(code: &str, repo: &InMemoryToolRepository) -> Tool {
        let data = ToolData::new(ToolFormat::new(120, 60).unwrap(), code).unwrap();
        repo.insert(&NewTool::new(data, Some(&actor("Mara")))).await.unwrap()
    }

    fn command(tool_id: ToolId, code: &str) -> UpdateToolCommand {
        UpdateToolCommand {
            tool_id,
            format: ToolFormat::new(120, 60).unwrap(),
            code: code.to_string(),
            press: PressNumber::new(4).ok(),
            actor: Some(actor("Ivo")),
        }
    }

    #[tokio::test]
    async fn update_appends_history_and_persists() {
        let repo = Arc::new(InMemoryToolRepository::new());
        let tool = seeded("G01", &repo).await;
        let handler = UpdateToolHandler::new(repo.clone(), TableLocks::new());

        let updated = handler.handle(command(tool.id(), "G01B")).await.unwrap();

        assert_eq!(updated.data().code(), "G01B");
        assert_eq!(updated.data().press(), PressNumber::new(4).ok());
        assert_eq!(updated.mods().len(), 2);
        assert_eq!(updated.mods().current().unwrap().actor().name(), "Ivo");

        let stored = repo.find_by_id(tool.id()).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn history_timestamps_stay_strictly_increasing() {
        let repo = Arc::new(InMemoryToolRepository::new());
        let tool = seeded("G01", &repo).await;
        let handler = UpdateToolHandler::new(repo, TableLocks::new());

        for code in ["A", "B", "C"] {
            handler.handle(command(tool.id(), code)).await.unwrap();
        }
        let updated = handler.handle(command(tool.id(), "D")).await.unwrap();

        let stamps: Vec<_> = updated.mods().iter().map(|m| *m.timestamp()).collect();
        assert_eq!(stamps.len(), 5);
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn invalid_code_leaves_tool_unchanged() {
        let repo = Arc::new(InMemoryToolRepository::new());
        let tool = seeded("G01", &repo).await;
        let handler = UpdateToolHandler::new(repo.clone(), TableLocks::new());

        let err = handler.handle(command(tool.id(), " ")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);

        let stored = repo.find_by_id(tool.id()).await.unwrap().unwrap();
        assert_eq!(stored, tool);
    }

    #[tokio::test]
    async fn taking_another_tools_identity_conflicts() {
        let repo = Arc::new(InMemoryToolRepository::new());
        seeded("G01", &repo).await;
        let second = seeded("G02", &repo).await;
        let handler = UpdateToolHandler::new(repo, TableLocks::new());

        let err = handler.handle(command(second.id(), "G01")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateTool);
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let handler = UpdateToolHandler::new(Arc::new(InMemoryToolRepository::new()), TableLocks::new());
        let err = handler.handle(command(ToolId::new(8), "G01")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ToolNotFound);
    }
}
