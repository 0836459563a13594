//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! so the protocol server and the command line share one storage contract.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Project, Task, Label)
//! - `repository`: Trait definitions for data access
//! - `resolver`: Short id prefix resolution for tasks
//! - `sqlite`: SQLx-backed implementation

mod error;
mod models;
mod repository;
pub mod resolver;
pub mod sqlite;

#[cfg(test)]
mod models_test;

pub use error::{DbError, DbResult};
pub use models::*;
pub use repository::*;
pub use resolver::{MIN_PREFIX_LEN, resolve_task};
pub use sqlite::SqliteDatabase;
