//! SQLite LabelRepository implementation.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use super::retry::{RetryPolicy, with_retry};
use super::task::link_label;
use crate::db::{DbError, DbResult, Label, LabelRepository};

/// SQLx-backed label repository.
pub struct SqliteLabelRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) retry: RetryPolicy,
}

/// Refresh a task's modification time, failing if the task is gone.
/// Taking the write lock first keeps the rest of the transaction from
/// upgrading a read lock mid-way.
async fn touch_task(tx: &mut Transaction<'_, Sqlite>, task_id: &str) -> DbResult<()> {
    let result = sqlx::query("UPDATE tasks SET updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(task_id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Task", task_id));
    }
    Ok(())
}

fn checked_name(name: &str) -> DbResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DbError::Validation {
            message: "Label name cannot be empty".to_string(),
        });
    }
    Ok(name)
}

impl<'a> LabelRepository for SqliteLabelRepository<'a> {
    async fn get_or_create(&self, name: &str) -> DbResult<Label> {
        let name = checked_name(name)?;
        let pool = self.pool;
        with_retry(self.retry, "get or create label", move || async move {
            sqlx::query("INSERT INTO labels (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                .bind(name)
                .execute(pool)
                .await?;
            Ok::<_, DbError>(())
        })
        .await?;

        let (id, name): (i64, String) =
            sqlx::query_as("SELECT id, name FROM labels WHERE name = ?")
                .bind(name)
                .fetch_one(self.pool)
                .await?;
        Ok(Label { id, name })
    }

    async fn list(&self) -> DbResult<Vec<Label>> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM labels ORDER BY name")
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id, name)| Label { id, name }).collect())
    }

    async fn add_to_task(&self, task_id: Uuid, name: &str) -> DbResult<()> {
        let name = checked_name(name)?;
        let pool = self.pool;
        let key = task_id.to_string();
        let key = key.as_str();
        with_retry(self.retry, "add label", move || async move {
            let mut tx = pool.begin().await?;
            touch_task(&mut tx, key).await?;
            link_label(&mut tx, key, name).await?;
            tx.commit().await?;
            Ok::<_, DbError>(())
        })
        .await?;

        tracing::debug!(task_id = %task_id, label = name, "Added label");
        Ok(())
    }

    async fn remove_from_task(&self, task_id: Uuid, name: &str) -> DbResult<()> {
        let name = checked_name(name)?;
        let pool = self.pool;
        let key = task_id.to_string();
        let key = key.as_str();
        with_retry(self.retry, "remove label", move || async move {
            let mut tx = pool.begin().await?;
            touch_task(&mut tx, key).await?;
            sqlx::query(
                "DELETE FROM task_labels WHERE task_id = ? \
                 AND label_id = (SELECT id FROM labels WHERE name = ?)",
            )
            .bind(key)
            .bind(name)
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok::<_, DbError>(())
        })
        .await?;

        tracing::debug!(task_id = %task_id, label = name, "Removed label");
        Ok(())
    }

    async fn for_task(&self, task_id: Uuid) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT l.name FROM task_labels tl JOIN labels l ON l.id = tl.label_id \
             WHERE tl.task_id = ? ORDER BY l.name",
        )
        .bind(task_id.to_string())
        .fetch_all(self.pool)
        .await?;
        Ok(names)
    }
}
