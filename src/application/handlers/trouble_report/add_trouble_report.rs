//! AddTroubleReportHandler - Command handler for filing trouble reports.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, Table, TableLocks};
use crate::domain::foundation::Actor;
use crate::domain::trouble_report::{NewTroubleReport, TroubleReport, TroubleReportData};
use crate::ports::TroubleReportRepository;

/// Command to file a trouble report.
#[derive(Debug, Clone)]
pub struct AddTroubleReportCommand {
    pub title: String,
    pub content: String,
    pub actor: Option<Actor>,
}

/// Handler for filing trouble reports.
pub struct AddTroubleReportHandler {
    reports: Arc<dyn TroubleReportRepository>,
    locks: TableLocks,
}

impl AddTroubleReportHandler {
    pub fn new(reports: Arc<dyn TroubleReportRepository>, locks: TableLocks) -> Self {
        Self { reports, locks }
    }

    /// # Errors
    ///
    /// - `Validation` for an empty title or content, or an overlong title
    pub async fn handle(&self, cmd: AddTroubleReportCommand) -> Result<TroubleReport, AccountingError> {
        let data = TroubleReportData::new(cmd.title, cmd.content)?;

        let _guard = self.locks.lock(Table::TroubleReports).await;
        let report = self
            .reports
            .insert(&NewTroubleReport::new(data, cmd.actor.as_ref()))
            .await?;

        info!(trouble_report_id = %report.id(), "Trouble report filed");
        Ok(report)
    }
}
