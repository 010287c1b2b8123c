//! Regeneration repository port.
//!
//! # Design
//!
//! - **One open per tool**: `insert_open` must check and insert as a single
//!   atomic step. Postgres does it with a partial unique index, the
//!   in-memory adapter under its write lock.
//! - **Abort deletes**: only open records may be deleted.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RegenerationId, Timestamp, ToolId};
use crate::domain::regeneration::{NewRegeneration, Regeneration};

/// Repository port for regeneration records.
#[async_trait]
pub trait RegenerationRepository: Send + Sync {
    /// Insert an open regeneration.
    ///
    /// # Errors
    ///
    /// - `RegenerationAlreadyOpen` if the tool already has an open one
    /// - `DatabaseError` on persistence failure
    async fn insert_open(&self, regeneration: &NewRegeneration) -> Result<Regeneration, DomainError>;

    /// Find the open regeneration of a tool.
    async fn find_open(&self, tool_id: ToolId) -> Result<Option<Regeneration>, DomainError>;

    /// Find the regeneration of a tool with the highest id, open or completed.
    async fn find_last(&self, tool_id: ToolId) -> Result<Option<Regeneration>, DomainError>;

    /// Set `stop` on an open regeneration.
    ///
    /// # Errors
    ///
    /// - `RegenerationNotFound` if no open regeneration has this id
    /// - `DatabaseError` on persistence failure
    async fn close(&self, id: RegenerationId, stop: Timestamp) -> Result<Regeneration, DomainError>;

    /// Delete an open regeneration.
    ///
    /// # Errors
    ///
    /// - `RegenerationNotFound` if no open regeneration has this id
    /// - `DatabaseError` on persistence failure
    async fn delete_open(&self, id: RegenerationId) -> Result<(), DomainError>;

    /// All regenerations of a tool, newest first.
    async fn list_by_tool(&self, tool_id: ToolId) -> Result<Vec<Regeneration>, DomainError>;
}
