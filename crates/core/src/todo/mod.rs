//! Todo module
//!
//! This module contains todo-related types and logic.

mod file_store;
mod model;
pub mod ordering;
mod repository;

pub use file_store::FileTodoStore;
pub use model::Todo;
pub use repository::TodoRepository;
