//! Client-side list state
//!
//! An in-memory mirror of the server's todo list. Every mutation goes through
//! the API and the affected entries are replaced with the server's returned
//! representation; a failed request leaves the previous state intact and
//! records an error message.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use bloom_core::todo::{ordering, Todo};

use crate::api::{Result, TodoApi, TodoPatch};

/// State container for the todo list, owned by the UI layer
#[derive(Default)]
pub struct TodoListState {
    todos: Vec<Todo>,
    last_error: Option<String>,
}

impl TodoListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// All todos in list order
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Active todos in their manual order
    pub fn active(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|t| t.is_active()).collect()
    }

    /// Completed todos sorted by completion time, optionally filtered to a
    /// single day
    pub fn completed(&self, day: Option<NaiveDate>, ascending: bool) -> Vec<&Todo> {
        let mut completed: Vec<&Todo> = self
            .todos
            .iter()
            .filter(|t| t.completed)
            .filter(|t| match day {
                Some(day) => t
                    .completed_at
                    .map(|at| at.date_naive() == day)
                    .unwrap_or(false),
                None => true,
            })
            .collect();

        completed.sort_by_key(|t| t.completed_at);
        if !ascending {
            completed.reverse();
        }
        completed
    }

    /// Message from the most recent failed request, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the whole list from the server
    pub async fn refresh(&mut self, api: &TodoApi) -> Result<()> {
        match api.fetch_all().await {
            Ok(todos) => {
                self.todos = todos;
                self.last_error = None;
                Ok(())
            }
            Err(e) => self.fail("Failed to fetch todos", e),
        }
    }

    /// Create a todo and merge the server's row into the list
    pub async fn add(
        &mut self,
        api: &TodoApi,
        text: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        match api.create(text, due_date).await {
            Ok(todo) => {
                self.apply_created(todo);
                Ok(())
            }
            Err(e) => self.fail("Failed to add todo", e),
        }
    }

    /// Flip a todo's completion state
    pub async fn toggle(&mut self, api: &TodoApi, id: Uuid) -> Result<()> {
        let Some(todo) = self.todos.iter().find(|t| t.id == id) else {
            return Ok(());
        };

        let patch = TodoPatch {
            completed: Some(!todo.completed),
            ..Default::default()
        };
        match api.update(id, &patch).await {
            Ok(updated) => {
                self.apply_updated(updated);
                Ok(())
            }
            Err(e) => self.fail("Failed to update todo", e),
        }
    }

    /// Set or clear a todo's due date
    pub async fn set_due_date(
        &mut self,
        api: &TodoApi,
        id: Uuid,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let patch = TodoPatch {
            due_date: Some(due_date),
            ..Default::default()
        };
        match api.update(id, &patch).await {
            Ok(updated) => {
                self.apply_updated(updated);
                Ok(())
            }
            Err(e) => self.fail("Failed to update todo", e),
        }
    }

    /// Delete a todo permanently
    pub async fn remove(&mut self, api: &TodoApi, id: Uuid) -> Result<()> {
        match api.delete(id).await {
            Ok(()) => {
                self.apply_removed(id);
                Ok(())
            }
            Err(e) => self.fail("Failed to delete todo", e),
        }
    }

    /// Move an active todo to a position in the active list (drag-and-drop)
    pub async fn move_to(&mut self, api: &TodoApi, id: Uuid, position: usize) -> Result<()> {
        let patch = TodoPatch {
            order: Some(position as i64),
            ..Default::default()
        };
        match api.update(id, &patch).await {
            Ok(moved) => {
                self.apply_move(moved, position);
                Ok(())
            }
            Err(e) => self.fail("Failed to update todo order", e),
        }
    }

    fn fail(&mut self, context: &str, error: crate::ApiError) -> Result<()> {
        self.last_error = Some(format!("{}: {}", context, error));
        Err(error)
    }

    fn apply_created(&mut self, todo: Todo) {
        self.todos.push(todo);
        self.todos.sort_by(ordering::list_cmp);
    }

    fn apply_updated(&mut self, todo: Todo) {
        if let Some(existing) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *existing = todo;
        } else {
            self.todos.push(todo);
        }
        self.todos.sort_by(ordering::list_cmp);
    }

    fn apply_removed(&mut self, id: Uuid) {
        self.todos.retain(|t| t.id != id);
    }

    /// Mirror the server's whole-active-list renumbering locally, then slot
    /// in the server's row for the moved todo.
    fn apply_move(&mut self, moved: Todo, position: usize) {
        let active: Vec<Todo> = self
            .todos
            .iter()
            .filter(|t| t.is_active())
            .cloned()
            .collect();

        for (id, order) in ordering::plan_move(&active, moved.id, position) {
            if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
                todo.order = order;
            }
        }
        self.apply_updated(moved);
    }
}
