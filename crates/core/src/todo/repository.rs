//! Todo repository trait
//!
//! Defines the interface for todo storage operations.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Todo;
use crate::Result;

/// Repository interface for todo CRUD operations
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Create a new todo
    async fn create(&self, todo: Todo) -> Result<Todo>;

    /// Get a todo by ID
    async fn get(&self, id: Uuid) -> Result<Option<Todo>>;

    /// Get all todos in list order (active by rank, then completed)
    async fn list(&self) -> Result<Vec<Todo>>;

    /// Update an existing todo
    async fn update(&self, todo: Todo) -> Result<Todo>;

    /// Delete a todo by ID, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Get the active todos sorted by rank
    async fn list_active(&self) -> Result<Vec<Todo>>;

    /// Reassign ordering ranks in one batch (used by reorder)
    async fn apply_orders(&self, changes: &[(Uuid, i64)]) -> Result<()>;
}
