//! SQLite database connection and migration management.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use super::label::SqliteLabelRepository;
use super::project::SqliteProjectRepository;
use super::retry::RetryPolicy;
use super::task::SqliteTaskRepository;
use crate::db::{Database, DbError, DbResult};

/// Default time a statement waits on another process's lock before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database implementation.
///
/// Provides access to repositories via associated types, avoiding dynamic dispatch.
/// Holds no cached data: every repository call reads the file afresh.
pub struct SqliteDatabase {
    pool: SqlitePool,
    retry: RetryPolicy,
}

impl SqliteDatabase {
    /// Open (creating if needed) a database file with the default busy timeout.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Open a database file, waiting at most `busy_timeout` on a locked file.
    pub async fn open_with_timeout<P: AsRef<Path>>(
        path: P,
        busy_timeout: Duration,
    ) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(busy_timeout.saturating_mul(2))
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: format!("{}: {}", path.as_ref().display(), e),
            })?;

        tracing::debug!(path = %path.as_ref().display(), "Opened database");

        Ok(Self {
            pool,
            retry: RetryPolicy::default(),
        })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// The pool keeps exactly one connection alive for its whole lifetime,
    /// since every new in-memory connection would see an empty database.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            pool,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy used for writes.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Direct pool access for tests and diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Database for SqliteDatabase {
    type Projects<'a> = SqliteProjectRepository<'a>;
    type Tasks<'a> = SqliteTaskRepository<'a>;
    type Labels<'a> = SqliteLabelRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("./data/sql/sqlite").run(&self.pool).await?;
        Ok(())
    }

    fn projects(&self) -> Self::Projects<'_> {
        SqliteProjectRepository {
            pool: &self.pool,
            retry: self.retry,
        }
    }

    fn tasks(&self) -> Self::Tasks<'_> {
        SqliteTaskRepository {
            pool: &self.pool,
            retry: self.retry,
        }
    }

    fn labels(&self) -> Self::Labels<'_> {
        SqliteLabelRepository {
            pool: &self.pool,
            retry: self.retry,
        }
    }
}
