//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use bloom_core::suggest::{SuggestClient, SuggestConfig};
use bloom_core::todo::FileTodoStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub todo_store: FileTodoStore,
    pub suggest_client: SuggestClient,
}

impl AppState {
    /// Create a new AppState with the given data directory
    pub async fn new(data_dir: PathBuf) -> bloom_core::Result<Self> {
        let todos_path = data_dir.join("todos.json");
        let todo_store = FileTodoStore::new(todos_path).await?;
        let suggest_client = SuggestClient::new(SuggestConfig::from_env());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                todo_store,
                suggest_client,
            }),
        })
    }

    /// Get reference to the todo store
    pub fn todo_store(&self) -> &FileTodoStore {
        &self.inner.todo_store
    }

    /// Get reference to the suggestion client
    pub fn suggest_client(&self) -> &SuggestClient {
        &self.inner.suggest_client
    }
}
