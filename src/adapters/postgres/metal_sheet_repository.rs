//! PostgreSQL implementation of MetalSheetRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, MetalSheetId, ToolId};
use crate::domain::metal_sheet::{MetalSheet, MetalSheetData, NewMetalSheet};
use crate::ports::MetalSheetRepository;

use super::codec::{is_foreign_key_violation, row_to_audited, to_json};

const TOOL_REFERENCE: &str = "metal_sheets_tool_id_fkey";

/// PostgreSQL implementation of MetalSheetRepository.
#[derive(Clone)]
pub struct PostgresMetalSheetRepository {
    pool: PgPool,
}

impl PostgresMetalSheetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, data: &MetalSheetData, context: &str) -> DomainError {
    if is_foreign_key_violation(&e, TOOL_REFERENCE) {
        return DomainError::new(
            ErrorCode::ToolNotFound,
            format!("Tool not found: {}", data.tool_id()),
        );
    }
    DomainError::database(context, e)
}

fn not_found(id: MetalSheetId) -> DomainError {
    DomainError::new(
        ErrorCode::MetalSheetNotFound,
        format!("Metal sheet not found: {}", id),
    )
}

#[async_trait]
impl MetalSheetRepository for PostgresMetalSheetRepository {
    async fn insert(&self, sheet: &NewMetalSheet) -> Result<MetalSheet, DomainError> {
        let data = sheet.data();

        let row = sqlx::query(
            r#"
            INSERT INTO metal_sheets (tool_id, data, mods)
            VALUES ($1, $2, $3)
            RETURNING id, data, mods
            "#,
        )
        .bind(data.tool_id().as_i64())
        .bind(to_json(data)?)
        .bind(to_json(sheet.mods())?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, data, "Failed to insert metal sheet"))?;

        row_to_audited(row)
    }

    async fn update(&self, sheet: &MetalSheet) -> Result<(), DomainError> {
        let data = sheet.data();

        let result = sqlx::query(
            "UPDATE metal_sheets SET tool_id = $2, data = $3, mods = $4 WHERE id = $1",
        )
        .bind(sheet.id().as_i64())
        .bind(data.tool_id().as_i64())
        .bind(to_json(data)?)
        .bind(to_json(sheet.mods())?)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, data, "Failed to update metal sheet"))?;

        if result.rows_affected() == 0 {
            return Err(not_found(sheet.id()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: MetalSheetId) -> Result<Option<MetalSheet>, DomainError> {
        let row = sqlx::query("SELECT id, data, mods FROM metal_sheets WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch metal sheet", e))?;

        row.map(row_to_audited).transpose()
    }

    async fn list(&self) -> Result<Vec<MetalSheet>, DomainError> {
        let rows = sqlx::query("SELECT id, data, mods FROM metal_sheets ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list metal sheets", e))?;

        rows.into_iter().map(row_to_audited).collect()
    }

    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<MetalSheet>, DomainError> {
        let rows = sqlx::query("SELECT id, data, mods FROM metal_sheets WHERE tool_id = $1 ORDER BY id")
            .bind(tool_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list metal sheets", e))?;

        rows.into_iter().map(row_to_audited).collect()
    }

    async fn delete(&self, id: MetalSheetId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM metal_sheets WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete metal sheet", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
