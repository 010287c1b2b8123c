//! PostgreSQL implementation of TroubleReportRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, TroubleReportId};
use crate::domain::trouble_report::{NewTroubleReport, TroubleReport};
use crate::ports::TroubleReportRepository;

use super::codec::{row_to_audited, to_json};

/// PostgreSQL implementation of TroubleReportRepository.
#[derive(Clone)]
pub struct PostgresTroubleReportRepository {
    pool: PgPool,
}

impl PostgresTroubleReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(id: TroubleReportId) -> DomainError {
    DomainError::new(
        ErrorCode::TroubleReportNotFound,
        format!("Trouble report not found: {}", id),
    )
}

#[async_trait]
impl TroubleReportRepository for PostgresTroubleReportRepository {
    async fn insert(&self, report: &NewTroubleReport) -> Result<TroubleReport, DomainError> {
        let row = sqlx::query(
            "INSERT INTO trouble_reports (data, mods) VALUES ($1, $2) RETURNING id, data, mods",
        )
        .bind(to_json(report.data())?)
        .bind(to_json(report.mods())?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert trouble report", e))?;

        row_to_audited(row)
    }

    async fn update(&self, report: &TroubleReport) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE trouble_reports SET data = $2, mods = $3 WHERE id = $1")
            .bind(report.id().as_i64())
            .bind(to_json(report.data())?)
            .bind(to_json(report.mods())?)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to update trouble report", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(report.id()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TroubleReportId) -> Result<Option<TroubleReport>, DomainError> {
        let row = sqlx::query("SELECT id, data, mods FROM trouble_reports WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch trouble report", e))?;

        row.map(row_to_audited).transpose()
    }

    async fn list(&self) -> Result<Vec<TroubleReport>, DomainError> {
        let rows = sqlx::query("SELECT id, data, mods FROM trouble_reports ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list trouble reports", e))?;

        rows.into_iter().map(row_to_audited).collect()
    }

    async fn delete(&self, id: TroubleReportId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM trouble_reports WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete trouble report", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
