//! Route handlers

pub mod health;
pub mod suggest;
pub mod todos;
