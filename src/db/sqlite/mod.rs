//! SQLite implementation of the database traits.
//!
//! This module provides a SQLx-backed implementation of the repository
//! traits defined in the parent module.

mod connection;
mod helpers;
mod label;
mod project;
mod retry;
mod task;

#[cfg(test)]
mod label_test;

pub use connection::{DEFAULT_BUSY_TIMEOUT, SqliteDatabase};
pub use label::SqliteLabelRepository;
pub use project::SqliteProjectRepository;
pub use retry::{RetryPolicy, with_retry};
pub use task::SqliteTaskRepository;
