//! Trouble report query handlers.

use std::sync::Arc;

use crate::application::AccountingError;
use crate::domain::foundation::TroubleReportId;
use crate::domain::trouble_report::TroubleReport;
use crate::ports::TroubleReportRepository;

use super::load_report;

#[derive(Debug, Clone)]
pub struct GetTroubleReportQuery {
    pub report_id: TroubleReportId,
}

pub struct GetTroubleReportHandler {
    reports: Arc<dyn TroubleReportRepository>,
}

impl GetTroubleReportHandler {
    pub fn new(reports: Arc<dyn TroubleReportRepository>) -> Self {
        Self { reports }
    }

    pub async fn handle(&self, query: GetTroubleReportQuery) -> Result<TroubleReport, AccountingError> {
        load_report(self.reports.as_ref(), query.report_id).await
    }
}

/// Query for all trouble reports, newest first.
#[derive(Debug, Clone, Default)]
pub struct ListTroubleReportsQuery;

pub struct ListTroubleReportsHandler {
    reports: Arc<dyn TroubleReportRepository>,
}

impl ListTroubleReportsHandler {
    pub fn new(reports: Arc<dyn TroubleReportRepository>) -> Self {
        Self { reports }
    }

    pub async fn handle(&self, _query: ListTroubleReportsQuery) -> Result<Vec<TroubleReport>, AccountingError> {
        Ok(self.reports.list().await?)
    }
}
