//! Todo model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry in the todo list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    /// Manual ordering rank; only meaningful while `completed` is false
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a new active todo with the given text
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            completed_at: None,
            due_date: None,
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the ordering rank
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Set the completion flag, keeping `completed_at` in sync.
    ///
    /// Marking completed always stamps a fresh `completed_at`, even when the
    /// todo was already completed; marking active clears it.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.completed_at = if completed { Some(Utc::now()) } else { None };
    }

    /// True when this todo participates in the manual ordering
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}
