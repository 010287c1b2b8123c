//! Tool repository port.
//!
//! Tools are stored together with their modification history.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PressNumber, ToolId};
use crate::domain::tool::{NewTool, Tool};

/// Repository port for tools.
#[async_trait]
pub trait ToolRepository: Send + Sync {
    /// Insert a tool and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// - `DuplicateTool` if format and code are already taken
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, tool: &NewTool) -> Result<Tool, DomainError>;

    /// Persist data and history of an existing tool.
    ///
    /// # Errors
    ///
    /// - `ToolNotFound` if the tool doesn't exist
    /// - `DuplicateTool` if the new format and code belong to another tool
    /// - `DatabaseError` on persistence failure
    async fn update(&self, tool: &Tool) -> Result<(), DomainError>;

    /// Find a tool by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: ToolId) -> Result<Option<Tool>, DomainError>;

    /// All tools ordered by id.
    async fn list(&self) -> Result<Vec<Tool>, DomainError>;

    /// Tools currently mounted on `press`.
    async fn list_by_press(&self, press: PressNumber) -> Result<Vec<Tool>, DomainError>;
}
