//! PostgreSQL implementation of ToolRepository.
//!
//! Tool data and its history live in JSONB columns. Format, code and press
//! are duplicated into plain columns for the identity index and press lookups.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, PressNumber, ToolId, ValidationError};
use crate::domain::tool::{NewTool, Tool, ToolData, MAX_FORMAT_SIDE};
use crate::ports::ToolRepository;

use super::codec::{is_unique_violation, row_to_audited, to_json};

const TOOL_IDENTITY: &str = "tools_identity_key";

/// PostgreSQL implementation of ToolRepository.
#[derive(Clone)]
pub struct PostgresToolRepository {
    pool: PgPool,
}

impl PostgresToolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Converts a format side to its `INTEGER` column value.
fn side_column(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        ValidationError::out_of_range(field, 1, i64::from(MAX_FORMAT_SIDE), i64::from(value)).into()
    })
}

fn map_write_error(e: sqlx::Error, data: &ToolData, context: &str) -> DomainError {
    if is_unique_violation(&e, TOOL_IDENTITY) {
        return DomainError::new(
            ErrorCode::DuplicateTool,
            format!("Tool {} {} already exists", data.format(), data.code()),
        );
    }
    DomainError::database(context, e)
}

#[async_trait]
impl ToolRepository for PostgresToolRepository {
    async fn insert(&self, tool: &NewTool) -> Result<Tool, DomainError> {
        let data = tool.data();
        let width = side_column("width", data.format().width())?;
        let height = side_column("height", data.format().height())?;

        let row = sqlx::query(
            r#"
            INSERT INTO tools (width, height, code, press, data, mods)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, data, mods
            "#,
        )
        .bind(width)
        .bind(height)
        .bind(data.code())
        .bind(data.press().map(|p| p.as_i16()))
        .bind(to_json(data)?)
        .bind(to_json(tool.mods())?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, data, "Failed to insert tool"))?;

        row_to_audited(row)
    }

    async fn update(&self, tool: &Tool) -> Result<(), DomainError> {
        let data = tool.data();
        let width = side_column("width", data.format().width())?;
        let height = side_column("height", data.format().height())?;

        let result = sqlx::query(
            r#"
            UPDATE tools SET
                width = $2,
                height = $3,
                code = $4,
                press = $5,
                data = $6,
                mods = $7
            WHERE id = $1
            "#,
        )
        .bind(tool.id().as_i64())
        .bind(width)
        .bind(height)
        .bind(data.code())
        .bind(data.press().map(|p| p.as_i16()))
        .bind(to_json(data)?)
        .bind(to_json(tool.mods())?)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, data, "Failed to update tool"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ToolNotFound,
                format!("Tool not found: {}", tool.id()),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ToolId) -> Result<Option<Tool>, DomainError> {
        let row = sqlx::query("SELECT id, data, mods FROM tools WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch tool", e))?;

        row.map(row_to_audited).transpose()
    }

    async fn list(&self) -> Result<Vec<Tool>, DomainError> {
        let rows = sqlx::query("SELECT id, data, mods FROM tools ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list tools", e))?;

        rows.into_iter().map(row_to_audited).collect()
    }

    async fn list_by_press(&self, press: PressNumber) -> Result<Vec<Tool>, DomainError> {
        let rows = sqlx::query("SELECT id, data, mods FROM tools WHERE press = $1 ORDER BY id")
            .bind(press.as_i16())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list tools", e))?;

        rows.into_iter().map(row_to_audited).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_column_keeps_values_in_range() {
        assert_eq!(side_column("width", 600).unwrap(), 600);
        assert_eq!(side_column("width", MAX_FORMAT_SIDE).unwrap(), i32::MAX);
    }

    #[test]
    fn side_column_rejects_values_that_would_wrap() {
        let err = side_column("height", u32::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
