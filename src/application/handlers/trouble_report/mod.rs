//! Trouble report command and query handlers.

mod add_trouble_report;
mod delete_trouble_report;
mod queries;
mod update_trouble_report;

pub use add_trouble_report::{AddTroubleReportCommand, AddTroubleReportHandler};
pub use delete_trouble_report::{DeleteTroubleReportCommand, DeleteTroubleReportHandler};
pub use queries::{
    GetTroubleReportHandler, GetTroubleReportQuery, ListTroubleReportsHandler, ListTroubleReportsQuery,
};
pub use update_trouble_report::{UpdateTroubleReportCommand, UpdateTroubleReportHandler};

use crate::application::AccountingError;
use crate::domain::foundation::{ErrorCode, TroubleReportId};
use crate::domain::trouble_report::TroubleReport;
use crate::ports::TroubleReportRepository;

async fn load_report(
    reports: &dyn TroubleReportRepository,
    id: TroubleReportId,
) -> Result<TroubleReport, AccountingError> {
    reports.find_by_id(id).await?.ok_or_else(|| {
        AccountingError::not_found(
            ErrorCode::TroubleReportNotFound,
            format!("Trouble report not found: {}", id),
        )
    })
}
