//! StartToolRegenerationHandler - Takes a tool out of service for regeneration.
//!
//! Opens the regeneration, then flags the tool. If flagging fails the
//! regeneration is aborted so no open regeneration is left behind for a tool
//! that doesn't know about it.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::{AccountingError, RegenerationTracker, Table, TableLocks};
use crate::domain::foundation::{Actor, ToolId};
use crate::domain::regeneration::Regeneration;
use crate::domain::tool::Tool;
use crate::ports::ToolRepository;

use super::load_tool;

/// Command to start a tool regeneration.
#[derive(Debug, Clone)]
pub struct StartToolRegenerationCommand {
    pub tool_id: ToolId,
    pub reason: Option<String>,
    pub actor: Option<Actor>,
}

/// Result of a started tool regeneration.
#[derive(Debug, Clone)]
pub struct StartToolRegenerationResult {
    pub tool: Tool,
    pub regeneration: Regeneration,
}

/// Handler for starting tool regenerations.
pub struct StartToolRegenerationHandler {
    tools: Arc<dyn ToolRepository>,
    tracker: RegenerationTracker,
    locks: TableLocks,
}

impl StartToolRegenerationHandler {
    pub fn new(tools: Arc<dyn ToolRepository>, tracker: RegenerationTracker, locks: TableLocks) -> Self {
        Self {
            tools,
            tracker,
            locks,
        }
    }

    /// # Errors
    ///
    /// - `NotFound` if the tool doesn't exist
    /// - `Conflict` if the tool already has an open regeneration
    /// - whatever flagging the tool failed with, after the regeneration was aborted
    /// - `CompensationFailed` if flagging failed and so did the abort
    pub async fn handle(
        &self,
        cmd: StartToolRegenerationCommand,
    ) -> Result<StartToolRegenerationResult, AccountingError> {
        let _guard = self.locks.lock(Table::Tools).await;
        let mut tool = load_tool(self.tools.as_ref(), cmd.tool_id).await?;

        let regeneration = self
            .tracker
            .start(cmd.tool_id, cmd.reason, cmd.actor.clone())
            .await?;

        if let Err(cause) = self.flag_tool(&mut tool, cmd.actor.as_ref()).await {
            return Err(self.abort_after_failure(cmd.tool_id, cause).await);
        }

        info!(
            tool_id = %cmd.tool_id,
            regeneration_id = %regeneration.id(),
            "Tool regeneration started"
        );
        Ok(StartToolRegenerationResult { tool, regeneration })
    }

    async fn flag_tool(&self, tool: &mut Tool, actor: Option<&Actor>) -> Result<(), AccountingError> {
        tool.set_regenerating(true, actor)?;
        self.tools.update(tool).await?;
        Ok(())
    }

    async fn abort_after_failure(&self, tool_id: ToolId, cause: AccountingError) -> AccountingError {
        match self.tracker.abort(tool_id).await {
            Ok(()) => {
                warn!(tool_id = %tool_id, cause = %cause, "Regeneration aborted after tool update failed");
                cause
            }
            Err(abort) => {
                error!(
                    tool_id = %tool_id,
                    cause = %cause,
                    abort_error = %abort,
                    "Compensating abort failed; open regeneration left behind"
                );
                AccountingError::compensation_failed(cause, abort)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::domain::foundation::{ErrorCode, UserId};
    use std::sync::atomic::Ordering;

    fn handler(fixture: &Fixture) -> StartToolRegenerationHandler {
        StartToolRegenerationHandler::new(
            fixture.tools.clone(),
            fixture.tracker.clone(),
            fixture.locks.clone(),
        )
    }

    fn command(tool_id: ToolId) -> StartToolRegenerationCommand {
        StartToolRegenerationCommand {
            tool_id,
            reason: Some("worn edges".to_string()),
            actor: Some(Actor::new(UserId::new("u-7").unwrap(), "Lena").unwrap()),
        }
    }

    #[tokio::test]
    async fn flags_tool_and_opens_regeneration() {
        let fixture = Fixture::new();
        let tool = fixture.tool().await;

        let result = handler(&fixture).handle(command(tool.id())).await.unwrap();

        assert!(result.tool.data().is_regenerating());
        assert!(result.regeneration.is_open());
        assert!(fixture.stored(tool.id()).await.data().is_regenerating());
        assert_eq!(result.tool.mods().len(), 1);
    }

    #[tokio::test]
    async fn second_start_conflicts_and_leaves_state_alone() {
        let fixture = Fixture::new();
        let tool = fixture.tool().await;
        let handler = handler(&fixture);
        let first = handler.handle(command(tool.id())).await.unwrap();

        let err = handler.handle(command(tool.id())).await.unwrap_err();
        assert!(err.is_conflict());

        let open = fixture.tracker.open_regeneration(tool.id()).await.unwrap().unwrap();
        assert_eq!(open.id(), first.regeneration.id());
        assert!(fixture.stored(tool.id()).await.data().is_regenerating());
    }

    #[tokio::test]
    async fn failed_tool_update_aborts_the_regeneration() {
        let fixture = Fixture::new();
        let tool = fixture.tool().await;
        fixture.tools.fail_every_update();

        let err = handler(&fixture).handle(command(tool.id())).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert!(fixture.tracker.open_regeneration(tool.id()).await.unwrap().is_none());
        assert!(fixture.tracker.last_regeneration(tool.id()).await.unwrap_err().is_not_found());
        assert!(!fixture.stored(tool.id()).await.data().is_regenerating());
    }

    #[tokio::test]
    async fn failed_abort_reports_both_errors() {
        let fixture = Fixture::new();
        let tool = fixture.tool().await;
        fixture.tools.fail_every_update();
        fixture.regenerations.fail_delete.store(true, Ordering::SeqCst);

        let err = handler(&fixture).handle(command(tool.id())).await.unwrap_err();

        match err {
            AccountingError::CompensationFailed { cause, compensation } => {
                assert_eq!(cause.code(), ErrorCode::DatabaseError);
                assert!(compensation.to_string().contains("regeneration delete"));
            }
            other => panic!("expected CompensationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_tool_opens_nothing() {
        let fixture = Fixture::new();
        let err = handler(&fixture).handle(command(ToolId::new(99))).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ToolNotFound);
        assert!(fixture.tracker.open_regeneration(ToolId::new(99)).await.unwrap().is_none());
    }
}
