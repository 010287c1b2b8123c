//! DeleteTroubleReportHandler - Removes a trouble report.

use std::sync::Arc;

use tracing::info;

use crate::application::{AccountingError, Table, TableLocks};
use crate::domain::foundation::TroubleReportId;
use crate::ports::TroubleReportRepository;

#[derive(Debug, Clone)]
pub struct DeleteTroubleReportCommand {
    pub report_id: TroubleReportId,
}

pub struct DeleteTroubleReportHandler {
    reports: Arc<dyn TroubleReportRepository>,
    locks: TableLocks,
}

impl DeleteTroubleReportHandler {
    pub fn new(reports: Arc<dyn TroubleReportRepository>, locks: TableLocks) -> Self {
        Self { reports, locks }
    }

    pub async fn handle(&self, cmd: DeleteTroubleReportCommand) -> Result<(), AccountingError> {
        let _guard = self.locks.lock(Table::TroubleReports).await;
        self.reports.delete(cmd.report_id).await?;
        info!(trouble_report_id = %cmd.report_id, "Trouble report deleted");
        Ok(())
    }
}
