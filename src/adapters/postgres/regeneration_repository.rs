//! PostgreSQL implementation of RegenerationRepository.
//!
//! The partial unique index `regenerations_one_open_per_tool` guarantees at
//! most one open regeneration per tool across every service instance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    Actor, DomainError, ErrorCode, ReadingId, RegenerationId, Timestamp, ToolId,
};
use crate::domain::regeneration::{NewRegeneration, Regeneration};
use crate::ports::RegenerationRepository;

use super::codec::{from_json, is_unique_violation, to_json};

const COLUMNS: &str = "id, tool_id, reason, performed_by, baseline_reading, start_at, stop_at";
const ONE_OPEN_PER_TOOL: &str = "regenerations_one_open_per_tool";

/// PostgreSQL implementation of RegenerationRepository.
#[derive(Clone)]
pub struct PostgresRegenerationRepository {
    pool: PgPool,
}

impl PostgresRegenerationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn open_not_found(id: RegenerationId) -> DomainError {
    DomainError::new(
        ErrorCode::RegenerationNotFound,
        format!("No open regeneration with id {}", id),
    )
}

#[async_trait]
impl RegenerationRepository for PostgresRegenerationRepository {
    async fn insert_open(&self, regeneration: &NewRegeneration) -> Result<Regeneration, DomainError> {
        let performed_by = regeneration.performed_by().map(to_json).transpose()?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO regenerations (
                tool_id, reason, performed_by, baseline_reading, start_at
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(regeneration.tool_id().as_i64())
        .bind(regeneration.reason())
        .bind(performed_by)
        .bind(regeneration.baseline_reading().map(|id| id.as_i64()))
        .bind(regeneration.start().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, ONE_OPEN_PER_TOOL) {
                return DomainError::new(
                    ErrorCode::RegenerationAlreadyOpen,
                    format!("Tool {} already has an open regeneration", regeneration.tool_id()),
                );
            }
            DomainError::database("Failed to insert regeneration", e)
        })?;

        row_to_regeneration(row)
    }

    async fn find_open(&self, tool_id: ToolId) -> Result<Option<Regeneration>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM regenerations WHERE tool_id = $1 AND stop_at IS NULL",
            COLUMNS
        ))
        .bind(tool_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch open regeneration", e))?;

        row.map(row_to_regeneration).transpose()
    }

    async fn find_last(&self, tool_id: ToolId) -> Result<Option<Regeneration>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM regenerations WHERE tool_id = $1 ORDER BY id DESC LIMIT 1",
            COLUMNS
        ))
        .bind(tool_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch last regeneration", e))?;

        row.map(row_to_regeneration).transpose()
    }

    async fn close(&self, id: RegenerationId, stop: Timestamp) -> Result<Regeneration, DomainError> {
        // GREATEST keeps stop >= start, matching Regeneration::complete.
        let row = sqlx::query(&format!(
            r#"
            UPDATE regenerations SET stop_at = GREATEST($2, start_at)
            WHERE id = $1 AND stop_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id.as_i64())
        .bind(stop.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to close regeneration", e))?;

        match row {
            Some(row) => row_to_regeneration(row),
            None => Err(open_not_found(id)),
        }
    }

    async fn delete_open(&self, id: RegenerationId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM regenerations WHERE id = $1 AND stop_at IS NULL")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete regeneration", e))?;

        if result.rows_affected() == 0 {
            return Err(open_not_found(id));
        }
        Ok(())
    }

    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<Regeneration>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM regenerations WHERE tool_id = $1 ORDER BY id DESC",
            COLUMNS
        ))
        .bind(tool_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list regenerations", e))?;

        rows.into_iter().map(row_to_regeneration).collect()
    }
}

fn row_to_regeneration(row: PgRow) -> Result<Regeneration, DomainError> {
    let id: i64 = row.get("id");
    let tool_id: i64 = row.get("tool_id");
    let reason: Option<String> = row.get("reason");
    let performed_by: Option<serde_json::Value> = row.get("performed_by");
    let baseline_reading: Option<i64> = row.get("baseline_reading");
    let start_at: DateTime<Utc> = row.get("start_at");
    let stop_at: Option<DateTime<Utc>> = row.get("stop_at");

    Ok(Regeneration::reconstitute(
        RegenerationId::new(id),
        ToolId::new(tool_id),
        reason,
        performed_by
            .map(|v| from_json::<Actor>("performed_by", v))
            .transpose()?,
        baseline_reading.map(ReadingId::new),
        Timestamp::from_datetime(start_at),
        stop_at.map(Timestamp::from_datetime),
    ))
}
