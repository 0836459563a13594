//! Database error types.
//!
//! This module provides abstracted error types for database operations.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! The error types are storage-backend agnostic; the sqlx classification lives
//! at the bottom of the file.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(toki::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Ambiguous id prefix '{prefix}' matches {}: {}", .candidates.len(), .candidates.join(", "))]
    #[diagnostic(
        code(toki::db::ambiguous),
        help("Use a longer prefix to select a single task")
    )]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("Invalid data: {message}")]
    #[diagnostic(code(toki::db::invalid_data))]
    InvalidData { message: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(toki::db::validation_error))]
    Validation { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(toki::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(toki::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(toki::db::connection_error))]
    Connection { message: String },

    #[error("Constraint violation: {message}")]
    #[diagnostic(code(toki::db::constraint))]
    Constraint { message: String },

    #[error("Database is busy: {message}")]
    #[diagnostic(
        code(toki::db::contention),
        help("Another toki process is writing to the same database; try again")
    )]
    Contention { message: String },
}

impl DbError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Transient failures worth retrying.
    pub fn is_contention(&self) -> bool {
        matches!(self, DbError::Contention { .. })
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// SQLite primary result codes; extended codes carry these in the low byte.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut => DbError::Contention {
                message: e.to_string(),
            },
            sqlx::Error::Database(db_err) => {
                let primary = db_err
                    .code()
                    .and_then(|c| c.parse::<i32>().ok())
                    .map(|c| c & 0xff);
                if matches!(primary, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED)) {
                    DbError::Contention {
                        message: db_err.message().to_string(),
                    }
                } else if db_err.is_unique_violation() {
                    DbError::Constraint {
                        message: translate_unique_violation(db_err.message()),
                    }
                } else if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                    DbError::Constraint {
                        message: db_err.message().to_string(),
                    }
                } else {
                    DbError::Database {
                        message: db_err.message().to_string(),
                    }
                }
            }
            _ => DbError::Database {
                message: e.to_string(),
            },
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration {
            message: e.to_string(),
        }
    }
}

/// Put a store uniqueness report into domain words, keeping the original text.
fn translate_unique_violation(raw: &str) -> String {
    if raw.contains("projects.name") {
        format!("a project with this name already exists ({})", raw)
    } else if raw.contains("labels.name") {
        format!("a label with this name already exists ({})", raw)
    } else {
        raw.to_string()
    }
}
