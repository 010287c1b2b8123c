//! In-memory repositories for tools, metal sheets and trouble reports.
//!
//! Useful for testing and development.

use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, ErrorCode, MetalSheetId, PressNumber, ToolId, TroubleReportId,
};
use crate::domain::metal_sheet::{MetalSheet, MetalSheetData, NewMetalSheet};
use crate::domain::tool::{NewTool, Tool, ToolData};
use crate::domain::trouble_report::{NewTroubleReport, TroubleReport, TroubleReportData};
use crate::ports::{MetalSheetRepository, ToolRepository, TroubleReportRepository};

use super::table::AuditedTable;

fn duplicate_tool(existing: &Tool, candidate: &ToolData) -> Option<DomainError> {
    existing.data().same_identity(candidate).then(|| {
        DomainError::new(
            ErrorCode::DuplicateTool,
            format!(
                "Tool {} {} already exists with id {}",
                candidate.format(),
                candidate.code(),
                existing.id()
            ),
        )
    })
}

/// In-memory tool storage.
#[derive(Debug, Clone)]
pub struct InMemoryToolRepository {
    table: AuditedTable<ToolId, ToolData>,
}

impl InMemoryToolRepository {
    pub fn new() -> Self {
        Self {
            table: AuditedTable::new(),
        }
    }
}

impl Default for InMemoryToolRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolRepository for InMemoryToolRepository {
    async fn insert(&self, tool: &NewTool) -> Result<Tool, DomainError> {
        self.table
            .insert_unless(tool, |existing| duplicate_tool(existing, tool.data()))
            .await
    }

    async fn update(&self, tool: &Tool) -> Result<(), DomainError> {
        let updated = self
            .table
            .update_unless(tool, |other| duplicate_tool(other, tool.data()))
            .await?;
        if !updated {
            return Err(DomainError::new(
                ErrorCode::ToolNotFound,
                format!("Tool not found: {}", tool.id()),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ToolId) -> Result<Option<Tool>, DomainError> {
        Ok(self.table.get(id).await)
    }

    async fn list(&self) -> Result<Vec<Tool>, DomainError> {
        Ok(self.table.filter(|_| true).await)
    }

    async fn list_by_press(&self, press: PressNumber) -> Result<Vec<Tool>, DomainError> {
        Ok(self.table.filter(|tool| tool.data().press() == Some(press)).await)
    }
}

/// In-memory metal sheet storage.
#[derive(Debug, Clone)]
pub struct InMemoryMetalSheetRepository {
    table: AuditedTable<MetalSheetId, MetalSheetData>,
}

impl InMemoryMetalSheetRepository {
    pub fn new() -> Self {
        Self {
            table: AuditedTable::new(),
        }
    }
}

impl Default for InMemoryMetalSheetRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetalSheetRepository for InMemoryMetalSheetRepository {
    async fn insert(&self, sheet: &NewMetalSheet) -> Result<MetalSheet, DomainError> {
        self.table.insert_unless(sheet, |_| None).await
    }

    async fn update(&self, sheet: &MetalSheet) -> Result<(), DomainError> {
        if !self.table.update_unless(sheet, |_| None).await? {
            return Err(DomainError::new(
                ErrorCode::MetalSheetNotFound,
                format!("Metal sheet not found: {}", sheet.id()),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: MetalSheetId) -> Result<Option<MetalSheet>, DomainError> {
        Ok(self.table.get(id).await)
    }

    async fn list(&self) -> Result<Vec<MetalSheet>, DomainError> {
        Ok(self.table.filter(|_| true).await)
    }

    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<MetalSheet>, DomainError> {
        Ok(self.table.filter(|sheet| sheet.data().tool_id() == tool_id).await)
    }

    async fn delete(&self, id: MetalSheetId) -> Result<(), DomainError> {
        if !self.table.remove(id).await {
            return Err(DomainError::new(
                ErrorCode::MetalSheetNotFound,
                format!("Metal sheet not found: {}", id),
            ));
        }
        Ok(())
    }
}

/// In-memory trouble report storage.
#[derive(Debug, Clone)]
pub struct InMemoryTroubleReportRepository {
    table: AuditedTable<TroubleReportId, TroubleReportData>,
}

impl InMemoryTroubleReportRepository {
    pub fn new() -> Self {
        Self {
            table: AuditedTable::new(),
        }
    }
}

impl Default for InMemoryTroubleReportRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TroubleReportRepository for InMemoryTroubleReportRepository {
    async fn insert(&self, report: &NewTroubleReport) -> Result<TroubleReport, DomainError> {
        self.table.insert_unless(report, |_| None).await
    }

    async fn update(&self, report: &TroubleReport) -> Result<(), DomainError> {
        if !self.table.update_unless(report, |_| None).await? {
            return Err(DomainError::new(
                ErrorCode::TroubleReportNotFound,
                format!("Trouble report not found: {}", report.id()),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TroubleReportId) -> Result<Option<TroubleReport>, DomainError> {
        Ok(self.table.get(id).await)
    }

    async fn list(&self) -> Result<Vec<TroubleReport>, DomainError> {
        let mut reports = self.table.filter(|_| true).await;
        reports.reverse();
        Ok(reports)
    }

    async fn delete(&self, id: TroubleReportId) -> Result<(), DomainError> {
        if !self.table.remove(id).await {
            return Err(DomainError::new(
                ErrorCode::TroubleReportNotFound,
                format!("Trouble report not found: {}", id),
            ));
        }
        Ok(())
    }
}
