//! PostgreSQL implementation of CycleReadingRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::cycles::{CycleReading, NewCycleReading};
use crate::domain::foundation::{
    Actor, DomainError, ErrorCode, PressNumber, ReadingId, Timestamp, ToolId,
};
use crate::ports::CycleReadingRepository;

use super::codec::{from_json, press_from_db, to_json};

const COLUMNS: &str = "id, tool_id, press, cumulative_count, start_at, stop_at, performed_by";

/// PostgreSQL implementation of CycleReadingRepository.
#[derive(Clone)]
pub struct PostgresCycleReadingRepository {
    pool: PgPool,
}

impl PostgresCycleReadingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_many(&self, sql: &str, bind: Option<i64>) -> Result<Vec<CycleReading>, DomainError> {
        let mut query = sqlx::query(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list cycle readings", e))?;

        rows.into_iter().map(row_to_reading).collect()
    }
}

#[async_trait]
impl CycleReadingRepository for PostgresCycleReadingRepository {
    async fn insert(&self, reading: &NewCycleReading) -> Result<CycleReading, DomainError> {
        let performed_by = reading.actor().map(to_json).transpose()?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO cycle_readings (
                tool_id, press, cumulative_count, start_at, stop_at, performed_by
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(reading.tool_id().as_i64())
        .bind(reading.press().map(|p| p.as_i16()))
        .bind(reading.cumulative_count())
        .bind(reading.start().as_datetime())
        .bind(reading.stop().as_datetime())
        .bind(performed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert cycle reading", e))?;

        row_to_reading(row)
    }

    async fn find_by_id(&self, id: ReadingId) -> Result<Option<CycleReading>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM cycle_readings WHERE id = $1", COLUMNS))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch cycle reading", e))?;

        row.map(row_to_reading).transpose()
    }

    async fn find_previous(&self, reading: &CycleReading) -> Result<Option<CycleReading>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM cycle_readings
            WHERE tool_id = $1 AND (stop_at, id) < ($2, $3)
            ORDER BY stop_at DESC, id DESC
            LIMIT 1
            "#,
            COLUMNS
        ))
        .bind(reading.tool_id().as_i64())
        .bind(reading.stop().as_datetime())
        .bind(reading.id().as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch previous cycle reading", e))?;

        row.map(row_to_reading).transpose()
    }

    async fn find_latest_by_tool(&self, tool_id: ToolId) -> Result<Option<CycleReading>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM cycle_readings
            WHERE tool_id = $1
            ORDER BY stop_at DESC, id DESC
            LIMIT 1
            "#,
            COLUMNS
        ))
        .bind(tool_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch latest cycle reading", e))?;

        row.map(row_to_reading).transpose()
    }

    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<CycleReading>, DomainError> {
        let sql = format!(
            "SELECT {} FROM cycle_readings WHERE tool_id = $1 ORDER BY stop_at DESC, id DESC",
            COLUMNS
        );
        self.fetch_many(&sql, Some(tool_id.as_i64())).await
    }

    async fn list_by_press(&self, press: PressNumber) -> Result<Vec<CycleReading>, DomainError> {
        let sql = format!(
            "SELECT {} FROM cycle_readings WHERE press = $1 ORDER BY stop_at DESC, id DESC",
            COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(press.as_i16())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list cycle readings", e))?;

        rows.into_iter().map(row_to_reading).collect()
    }

    async fn list_all(&self) -> Result<Vec<CycleReading>, DomainError> {
        let sql = format!(
            "SELECT {} FROM cycle_readings ORDER BY stop_at DESC, id DESC",
            COLUMNS
        );
        self.fetch_many(&sql, None).await
    }

    async fn delete(&self, id: ReadingId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM cycle_readings WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete cycle reading", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ReadingNotFound,
                format!("Cycle reading not found: {}", id),
            ));
        }
        Ok(())
    }
}

fn row_to_reading(row: PgRow) -> Result<CycleReading, DomainError> {
    let id: i64 = row.get("id");
    let tool_id: i64 = row.get("tool_id");
    let press: Option<i16> = row.get("press");
    let cumulative_count: i64 = row.get("cumulative_count");
    let start_at: DateTime<Utc> = row.get("start_at");
    let stop_at: DateTime<Utc> = row.get("stop_at");
    let performed_by: Option<serde_json::Value> = row.get("performed_by");

    Ok(CycleReading::reconstitute(
        ReadingId::new(id),
        ToolId::new(tool_id),
        press_from_db(press)?,
        cumulative_count,
        Timestamp::from_datetime(start_at),
        Timestamp::from_datetime(stop_at),
        performed_by
            .map(|v| from_json::<Actor>("performed_by", v))
            .transpose()?,
    ))
}
