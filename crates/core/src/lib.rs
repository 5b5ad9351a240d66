//! Core library for Todo Bloom
//!
//! This crate contains the core business logic, including:
//! - Todo model and ordering rules
//! - Todo storage
//! - AI suggestion client

pub mod error;
pub mod suggest;
pub mod todo;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
