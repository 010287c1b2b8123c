//! Regeneration Tracker - start, stop and abort regenerations per tool.
//!
//! Start, stop and abort all run under the `Regenerations` table lock, so the
//! open-regeneration check and the insert cannot interleave within one
//! service instance. Across instances the store's uniqueness guarantee
//! applies (see the postgres adapter).

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{Actor, ErrorCode, Timestamp, ToolId};
use crate::domain::regeneration::{NewRegeneration, Regeneration};
use crate::ports::RegenerationRepository;

use super::{AccountingError, CycleLedger, Table, TableLocks};

fn nothing_open(tool_id: ToolId) -> AccountingError {
    AccountingError::not_found(
        ErrorCode::RegenerationNotFound,
        format!("Tool {} has no open regeneration", tool_id),
    )
}

/// Tracks regenerations of tools.
#[derive(Clone)]
pub struct RegenerationTracker {
    regenerations: Arc<dyn RegenerationRepository>,
    ledger: CycleLedger,
    locks: TableLocks,
}

impl RegenerationTracker {
    pub fn new(
        regenerations: Arc<dyn RegenerationRepository>,
        ledger: CycleLedger,
        locks: TableLocks,
    ) -> Self {
        Self {
            regenerations,
            ledger,
            locks,
        }
    }

    /// Opens a regeneration starting now.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the tool already has an open regeneration
    /// - `Validation` if the reason is too long
    pub async fn start(
        &self,
        tool_id: ToolId,
        reason: Option<String>,
        actor: Option<Actor>,
    ) -> Result<Regeneration, AccountingError> {
        self.start_at(tool_id, reason, actor, Timestamp::now()).await
    }

    /// Opens a regeneration starting at `start`.
    ///
    /// The tool's newest reading at this point becomes the baseline that
    /// totals count from.
    pub async fn start_at(
        &self,
        tool_id: ToolId,
        reason: Option<String>,
        actor: Option<Actor>,
        start: Timestamp,
    ) -> Result<Regeneration, AccountingError> {
        let draft = NewRegeneration::new(tool_id, reason, actor, start)?;

        let _guard = self.locks.lock(Table::Regenerations).await;
        if let Some(open) = self.regenerations.find_open(tool_id).await? {
            return Err(AccountingError::conflict(
                ErrorCode::RegenerationAlreadyOpen,
                format!("Tool {} already has open regeneration {}", tool_id, open.id()),
            ));
        }

        let baseline = self.ledger.latest(tool_id).await?;
        let draft = draft.with_baseline(baseline.as_ref().map(|r| r.id()));
        let regeneration = self.regenerations.insert_open(&draft).await?;

        info!(
            tool_id = %tool_id,
            regeneration_id = %regeneration.id(),
            baseline_reading = ?regeneration.baseline_reading(),
            "Regeneration started"
        );
        Ok(regeneration)
    }

    /// Completes the open regeneration of a tool now.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the tool has no open regeneration
    pub async fn stop(&self, tool_id: ToolId) -> Result<Regeneration, AccountingError> {
        self.stop_at(tool_id, Timestamp::now()).await
    }

    /// Completes the open regeneration of a tool at `stop`.
    ///
    /// A `stop` earlier than the regeneration's start is raised to the start.
    pub async fn stop_at(&self, tool_id: ToolId, stop: Timestamp) -> Result<Regeneration, AccountingError> {
        let _guard = self.locks.lock(Table::Regenerations).await;
        let open = self
            .regenerations
            .find_open(tool_id)
            .await?
            .ok_or_else(|| nothing_open(tool_id))?;

        let closed = self.regenerations.close(open.id(), stop).await?;
        info!(
            tool_id = %tool_id,
            regeneration_id = %closed.id(),
            "Regeneration stopped"
        );
        Ok(closed)
    }

    /// Deletes the open regeneration of a tool.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the tool has no open regeneration
    pub async fn abort(&self, tool_id: ToolId) -> Result<(), AccountingError> {
        let _guard = self.locks.lock(Table::Regenerations).await;
        let open = self
            .regenerations
            .find_open(tool_id)
            .await?
            .ok_or_else(|| nothing_open(tool_id))?;
        open.ensure_abortable()?;

        self.regenerations.delete_open(open.id()).await?;
        info!(
            tool_id = %tool_id,
            regeneration_id = %open.id(),
            "Regeneration aborted"
        );
        Ok(())
    }

    /// Most recent regeneration of a tool by id, open or completed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the tool was never regenerated
    pub async fn last_regeneration(&self, tool_id: ToolId) -> Result<Regeneration, AccountingError> {
        self.find_last(tool_id).await?.ok_or_else(|| {
            AccountingError::not_found(
                ErrorCode::RegenerationNotFound,
                format!("Tool {} has no regenerations", tool_id),
            )
        })
    }

    pub(crate) async fn find_last(&self, tool_id: ToolId) -> Result<Option<Regeneration>, AccountingError> {
        Ok(self.regenerations.find_last(tool_id).await?)
    }

    pub async fn open_regeneration(&self, tool_id: ToolId) -> Result<Option<Regeneration>, AccountingError> {
        Ok(self.regenerations.find_open(tool_id).await?)
    }

    /// Regenerations of a tool, newest first.
    pub async fn list(&self, tool_id: ToolId) -> Result<Vec<Regeneration>, AccountingError> {
        Ok(self.regenerations.list_by_tool(tool_id).await?)
    }
}
