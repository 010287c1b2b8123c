//! FinishToolRegenerationHandler - Returns a regenerated tool to service.
//!
//! Clears the tool's flag first, then completes the regeneration. A failed
//! completion flags the tool again as a new change.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, RegenerationTracker, Table, TableLocks};
use crate::domain::foundation::{Actor, ErrorCode, ToolId};
use crate::domain::regeneration::Regeneration;
use crate::ports::ToolRepository;

use super::{load_tool, reflag_tool};

/// Command to complete a tool's open regeneration.
#[derive(Debug, Clone)]
pub struct FinishToolRegenerationCommand {
    pub tool_id: ToolId,
    pub actor: Option<Actor>,
}

/// Handler for completing tool regenerations.
pub struct FinishToolRegenerationHandler {
    tools: Arc<dyn ToolRepository>,
    tracker: RegenerationTracker,
    locks: TableLocks,
}

impl FinishToolRegenerationHandler {
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
    /// - `CompensationFailed` if completing failed and the tool couldn't be flagged again
    pub async fn handle(&self, cmd: FinishToolRegenerationCommand) -> Result<Regeneration, AccountingError> {
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

        match self.tracker.stop(cmd.tool_id).await {
            Ok(regeneration) => {
                info!(
                    tool_id = %cmd.tool_id,
                    regeneration_id = %regeneration.id(),
                    "Tool regeneration finished"
                );
                Ok(regeneration)
            }
            Err(cause) if cleared => {
                Err(reflag_tool(self.tools.as_ref(), &mut tool, cmd.actor.as_ref(), cause).await)
            }
            Err(cause) => Err(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use std::sync::atomic::Ordering;

    async fn regenerating_tool(fixture: &Fixture) -> ToolId {
        let mut tool = fixture.tool().await;
        fixture.tracker.start(tool.id(), None, None).await.unwrap();
        tool.set_regenerating(true, None).unwrap();
        fixture.tools.update(&tool).await.unwrap();
        tool.id()
    }

    fn handler(fixture: &Fixture) -> FinishToolRegenerationHandler {
        FinishToolRegenerationHandler::new(
            fixture.tools.clone(),
            fixture.tracker.clone(),
            fixture.locks.clone(),
        )
    }

    fn command(tool_id: ToolId) -> FinishToolRegenerationCommand {
        FinishToolRegenerationCommand { tool_id, actor: None }
    }

    #[tokio::test]
    async fn completes_regeneration_and_clears_flag() {
        let fixture = Fixture::new();
        let tool_id = regenerating_tool(&fixture).await;

        let regeneration = handler(&fixture).handle(command(tool_id)).await.unwrap();

        assert!(!regeneration.is_open());
        assert!(!fixture.stored(tool_id).await.data().is_regenerating());
        assert!(fixture.tracker.open_regeneration(tool_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn nothing_open_is_not_found_and_changes_nothing() {
        let fixture = Fixture::new();
        let tool = fixture.tool().await;

        let err = handler(&fixture).handle(command(tool.id())).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::RegenerationNotFound);
        assert_eq!(fixture.stored(tool.id()).await, tool);
    }

    #[tokio::test]
    async fn failed_completion_restores_the_flag() {
        let fixture = Fixture::new();
        let tool_id = regenerating_tool(&fixture).await;
        fixture.regenerations.fail_close.store(true, Ordering::SeqCst);

        let err = handler(&fixture).handle(command(tool_id)).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert!(fixture.stored(tool_id).await.data().is_regenerating());
        assert!(fixture.tracker.open_regeneration(tool_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn failed_completion_appends_to_history() {
        let fixture = Fixture::new();
        let actor = Actor::system();
        let mut tool = fixture.tool().await;
        fixture.tracker.start(tool.id(), None, None).await.unwrap();
        tool.set_regenerating(true, Some(&actor)).unwrap();
        fixture.tools.update(&tool).await.unwrap();
        let before = fixture.stored(tool.id()).await.mods().clone();
        fixture.regenerations.fail_close.store(true, Ordering::SeqCst);

        handler(&fixture)
            .handle(FinishToolRegenerationCommand {
                tool_id: tool.id(),
                actor: Some(actor),
            })
            .await
            .unwrap_err();

        let stored = fixture.stored(tool.id()).await;
        assert!(stored.mods().len() >= before.len());
        assert!(before.iter().zip(stored.mods().iter()).all(|(old, kept)| old == kept));
        let flags: Vec<bool> = stored.mods().iter().map(|m| m.snapshot().is_regenerating()).collect();
        assert_eq!(flags, vec![true, false, true]);
        assert!(stored.data().is_regenerating());
    }

    #[tokio::test]
    async fn failed_restore_reports_both_errors() {
        let fixture = Fixture::new();
        let tool_id = regenerating_tool(&fixture).await;
        fixture.regenerations.fail_close.store(true, Ordering::SeqCst);
        fixture.tools.fail_after_next_update();

        let err = handler(&fixture).handle(command(tool_id)).await.unwrap_err();

        assert!(matches!(err, AccountingError::CompensationFailed { .. }));
    }
}
