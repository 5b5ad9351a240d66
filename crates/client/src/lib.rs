//! Client library for Todo Bloom
//!
//! This crate contains the UI-facing plumbing:
//! - HTTP client for the REST API
//! - Client-side list state, reconciled from server responses
//! - Debounced, supersedable suggestion fetch
//! - Printable completed-task report

pub mod api;
pub mod report;
pub mod state;
pub mod suggest_input;

pub use api::{ApiError, TodoApi, TodoPatch};
pub use state::TodoListState;
pub use suggest_input::SuggestionInput;
