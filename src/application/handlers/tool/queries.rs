//! Tool query handlers.

use std::sync::Arc;

use crate::application::AccountingError;
use crate::domain::foundation::{PressNumber, ToolId};
use crate::domain::tool::Tool;
use crate::ports::ToolRepository;

use super::load_tool;

/// Query for a single tool.
#[derive(Debug, Clone)]
pub struct GetToolQuery {
    pub tool_id: ToolId,
}

pub struct GetToolHandler {
    tools: Arc<dyn ToolRepository>,
}

impl GetToolHandler {
    pub fn new(tools: Arc<dyn ToolRepository>) -> Self {
        Self { tools }
    }

    pub async fn handle(&self, query: GetToolQuery) -> Result<Tool, AccountingError> {
        load_tool(self.tools.as_ref(), query.tool_id).await
    }
}

/// Query for tools, optionally only those mounted on one press.
#[derive(Debug, Clone, Default)]
pub struct ListToolsQuery {
    pub press: Option<PressNumber>,
}

pub struct ListToolsHandler {
    tools: Arc<dyn ToolRepository>,
}

impl ListToolsHandler {
    pub fn new(tools: Arc<dyn ToolRepository>) -> Self {
        Self { tools }
    }

    pub async fn handle(&self, query: ListToolsQuery) -> Result<Vec<Tool>, AccountingError> {
        let tools = match query.press {
            Some(press) => self.tools.list_by_press(press).await?,
            None => self.tools.list().await?,
        };
        Ok(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryToolRepository;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::tool::{NewTool, ToolData, ToolFormat};

    async fn repo_with_tools() -> Arc<InMemoryToolRepository> {
        let repo = Arc::new(InMemoryToolRepository::new());
        let format = ToolFormat::new(300, 300).unwrap();
        let press = PressNumber::new(0).unwrap();
        repo.insert(&NewTool::new(ToolData::new(format, "A").unwrap().on_press(press), None))
            .await
            .unwrap();
        repo.insert(&NewTool::new(ToolData::new(format, "B").unwrap(), None))
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn list_filters_by_press() {
        let handler = ListToolsHandler::new(repo_with_tools().await);

        let all = handler.handle(ListToolsQuery::default()).await.unwrap();
        let mounted = handler
            .handle(ListToolsQuery {
                press: PressNumber::new(0).ok(),
            })
            .await
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(mounted.len(), 1);
        assert_eq!(mounted[0].data().code(), "A");
    }

    #[tokio::test]
    async fn get_unknown_tool_is_not_found() {
        let handler = GetToolHandler::new(repo_with_tools().await);
        let err = handler
            .handle(GetToolQuery {
                tool_id: ToolId::new(404),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ToolNotFound);
    }
}
