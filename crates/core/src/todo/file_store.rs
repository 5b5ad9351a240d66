//! File-backed todo store
//!
//! A single JSON file holds every todo; an in-memory cache fronts it and is
//! written back after each mutation. Stands in for the relational store the
//! app would sit on in production.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::Todo;
use super::ordering;
use super::repository::TodoRepository;
use crate::{Error, Result};

/// Todo store persisted as a JSON file
pub struct FileTodoStore {
    path: PathBuf,
    /// Cached rows, keyed by id; the file is only read at startup
    cache: RwLock<HashMap<Uuid, Todo>>,
}

impl FileTodoStore {
    /// Open the store at `path`, loading any existing rows.
    ///
    /// A missing file is an empty store; it appears on the first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let todos: Vec<Todo> = serde_json::from_str(&content)?;
            todos.into_iter().map(|t| (t.id, t)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Write the whole cache back to disk
    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let todos: Vec<&Todo> = cache.values().collect();
        let content = serde_json::to_string_pretty(&todos)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for FileTodoStore {
    async fn create(&self, todo: Todo) -> Result<Todo> {
        {
            let mut cache = self.cache.write().await;
            if cache.contains_key(&todo.id) {
                return Err(Error::InvalidInput(format!("Duplicate todo id {}", todo.id)));
            }
            cache.insert(todo.id, todo.clone());
        }
        self.persist().await?;
        Ok(todo)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Todo>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let cache = self.cache.read().await;
        let mut todos: Vec<Todo> = cache.values().cloned().collect();
        todos.sort_by(ordering::list_cmp);
        Ok(todos)
    }

    async fn update(&self, mut todo: Todo) -> Result<Todo> {
        todo.updated_at = Utc::now();
        {
            let mut cache = self.cache.write().await;
            if !cache.contains_key(&todo.id) {
                return Err(Error::TodoNotFound(todo.id.to_string()));
            }
            cache.insert(todo.id, todo.clone());
        }
        self.persist().await?;
        Ok(todo)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let removed = {
            let mut cache = self.cache.write().await;
            cache.remove(&id).is_some()
        };
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    async fn list_active(&self) -> Result<Vec<Todo>> {
        let cache = self.cache.read().await;
        let mut todos: Vec<Todo> = cache
            .values()
            .filter(|t| t.is_active())
            .cloned()
            .collect();
        todos.sort_by(ordering::list_cmp);
        Ok(todos)
    }

    async fn apply_orders(&self, changes: &[(Uuid, i64)]) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        {
            let mut cache = self.cache.write().await;
            let now = Utc::now();
            for (id, order) in changes {
                let todo = cache
                    .get_mut(id)
                    .ok_or_else(|| Error::TodoNotFound(id.to_string()))?;
                todo.order = *order;
                todo.updated_at = now;
            }
        }
        self.persist().await?;
        Ok(())
    }
}
