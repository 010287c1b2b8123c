//! In-memory regeneration storage.
//!
//! The open-per-tool check and the insert happen under one write lock.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, RegenerationId, Timestamp, ToolId};
use crate::domain::regeneration::{NewRegeneration, Regeneration};
use crate::ports::RegenerationRepository;

#[derive(Debug, Default)]
struct Regenerations {
    last_id: i64,
    rows: Vec<Regeneration>,
}

fn open_not_found(id: RegenerationId) -> DomainError {
    DomainError::new(
        ErrorCode::RegenerationNotFound,
        format!("No open regeneration with id {}", id),
    )
}

/// In-memory storage for regenerations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegenerationRepository {
    regenerations: Arc<RwLock<Regenerations>>,
}

impl InMemoryRegenerationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored regenerations, open or completed.
    pub async fn count(&self) -> usize {
        self.regenerations.read().await.rows.len()
    }
}

#[async_trait]
impl RegenerationRepository for InMemoryRegenerationRepository {
    async fn insert_open(&self, regeneration: &NewRegeneration) -> Result<Regeneration, DomainError> {
        let mut regenerations = self.regenerations.write().await;
        if let Some(open) = regenerations
            .rows
            .iter()
            .find(|r| r.tool_id() == regeneration.tool_id() && r.is_open())
        {
            return Err(DomainError::new(
                ErrorCode::RegenerationAlreadyOpen,
                format!(
                    "Tool {} already has open regeneration {}",
                    regeneration.tool_id(),
                    open.id()
                ),
            ));
        }

        regenerations.last_id += 1;
        let stored = regeneration
            .clone()
            .into_regeneration(RegenerationId::new(regenerations.last_id));
        regenerations.rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_open(&self, tool_id: ToolId) -> Result<Option<Regeneration>, DomainError> {
        let regenerations = self.regenerations.read().await;
        Ok(regenerations
            .rows
            .iter()
            .find(|r| r.tool_id() == tool_id && r.is_open())
            .cloned())
    }

    async fn find_last(&self, tool_id: ToolId) -> Result<Option<Regeneration>, DomainError> {
        let regenerations = self.regenerations.read().await;
        Ok(regenerations
            .rows
            .iter()
            .filter(|r| r.tool_id() == tool_id)
            .max_by_key(|r| r.id())
            .cloned())
    }

    async fn close(&self, id: RegenerationId, stop: Timestamp) -> Result<Regeneration, DomainError> {
        let mut regenerations = self.regenerations.write().await;
        let regeneration = regenerations
            .rows
            .iter_mut()
            .find(|r| r.id() == id && r.is_open())
            .ok_or_else(|| open_not_found(id))?;
        regeneration.complete(stop)?;
        Ok(regeneration.clone())
    }

    async fn delete_open(&self, id: RegenerationId) -> Result<(), DomainError> {
        let mut regenerations = self.regenerations.write().await;
        let position = regenerations
            .rows
            .iter()
            .position(|r| r.id() == id && r.is_open())
            .ok_or_else(|| open_not_found(id))?;
        regenerations.rows.remove(position);
        Ok(())
    }

    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<Regeneration>, DomainError> {
        let regenerations = self.regenerations.read().await;
        let mut listed: Vec<_> = regenerations
            .rows
            .iter()
            .filter(|r| r.tool_id() == tool_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.id().cmp(&a.id()));
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(tool: i64) -> NewRegeneration {
        NewRegeneration::new(ToolId::new(tool), None, None, Timestamp::from_unix_secs(100)).unwrap()
    }

    #[tokio::test]
    async fn second_open_regeneration_conflicts() {
        let repo = InMemoryRegenerationRepository::new();
        repo.insert_open(&start(1)).await.unwrap();

        let err = repo.insert_open(&start(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RegenerationAlreadyOpen);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn other_tools_are_independent() {
        let repo = InMemoryRegenerationRepository::new();
        repo.insert_open(&start(1)).await.unwrap();
        assert!(repo.insert_open(&start(2)).await.is_ok());
    }

    #[tokio::test]
    async fn close_then_reopen_is_allowed() {
        let repo = InMemoryRegenerationRepository::new();
        let first = repo.insert_open(&start(1)).await.unwrap();
        repo.close(first.id(), Timestamp::from_unix_secs(200)).await.unwrap();

        let second = repo.insert_open(&start(1)).await.unwrap();
        assert!(second.id() > first.id());
        assert_eq!(repo.find_last(ToolId::new(1)).await.unwrap().unwrap().id(), second.id());
    }

    #[tokio::test]
    async fn closed_regeneration_cannot_be_deleted() {
        let repo = InMemoryRegenerationRepository::new();
        let regeneration = repo.insert_open(&start(1)).await.unwrap();
        repo.close(regeneration.id(), Timestamp::from_unix_secs(200)).await.unwrap();

        let err = repo.delete_open(regeneration.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RegenerationNotFound);
    }

    #[tokio::test]
    async fn delete_open_removes_record() {
        let repo = InMemoryRegenerationRepository::new();
        let regeneration = repo.insert_open(&start(1)).await.unwrap();
        repo.delete_open(regeneration.id()).await.unwrap();

        assert!(repo.find_open(ToolId::new(1)).await.unwrap().is_none());
        assert!(repo.find_last(ToolId::new(1)).await.unwrap().is_none());
    }
}
