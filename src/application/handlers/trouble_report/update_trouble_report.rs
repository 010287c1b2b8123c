//! UpdateTroubleReportHandler - Command handler for editing trouble reports.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, Table, TableLocks};
use crate::domain::foundation::{Actor, TroubleReportId};
use crate::domain::trouble_report::{TroubleReport, TroubleReportData};
use crate::ports::TroubleReportRepository;

use super::load_report;

#[derive(Debug, Clone)]
pub struct UpdateTroubleReportCommand {
    pub report_id: TroubleReportId,
    pub title: String,
    pub content: String,
    pub actor: Option<Actor>,
}

pub struct UpdateTroubleReportHandler {
    reports: Arc<dyn TroubleReportRepository>,
    locks: TableLocks,
}

impl UpdateTroubleReportHandler {
    pub fn new(reports: Arc<dyn TroubleReportRepository>, locks: TableLocks) -> Self {
        Self { reports, locks }
    }

    pub async fn handle(&self, cmd: UpdateTroubleReportCommand) -> Result<TroubleReport, AccountingError> {
        let data = TroubleReportData::new(cmd.title, cmd.content)?;

        let _guard = self.locks.lock(Table::TroubleReports).await;
        let mut report = load_report(self.reports.as_ref(), cmd.report_id).await?;
        report.replace(data, cmd.actor.as_ref());
        self.reports.update(&report).await?;

        info!(trouble_report_id = %report.id(), "Trouble report updated");
        Ok(report)
    }
}
