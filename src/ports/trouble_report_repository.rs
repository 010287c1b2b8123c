//! Trouble report repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TroubleReportId};
use crate::domain::trouble_report::{NewTroubleReport, TroubleReport};

/// Repository port for trouble reports.
#[async_trait]
pub trait TroubleReportRepository: Send + Sync {
    async fn insert(&self, report: &NewTroubleReport) -> Result<TroubleReport, DomainError>;

    /// # Errors
    ///
    /// - `TroubleReportNotFound` if the report doesn't exist
    async fn update(&self, report: &TroubleReport) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: TroubleReportId) -> Result<Option<TroubleReport>, DomainError>;

    /// All reports, newest id first.
    async fn list(&self) -> Result<Vec<TroubleReport>, DomainError>;

    /// # Errors
    ///
    /// - `TroubleReportNotFound` if the report doesn't exist
    async fn delete(&self, id: TroubleReportId) -> Result<(), DomainError>;
}
