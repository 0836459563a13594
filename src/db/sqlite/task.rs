//! SQLite TaskRepository implementation.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use super::helpers::{TASK_COLUMNS, task_from_row};
use super::retry::{RetryPolicy, with_retry};
use crate::db::{DbError, DbResult, Task, TaskQuery, TaskRepository, normalize_labels};

/// SQLx-backed task repository.
pub struct SqliteTaskRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) retry: RetryPolicy,
}

/// Get-or-create a label and link it to a task inside an open transaction.
pub(crate) async fn link_label(
    tx: &mut Transaction<'_, Sqlite>,
    task_id: &str,
    name: &str,
) -> DbResult<()> {
    sqlx::query("INSERT INTO labels (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut **tx)
        .await?;

    let label_id: i64 = sqlx::query_scalar("SELECT id FROM labels WHERE name = ?")
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;

    sqlx::query("INSERT OR IGNORE INTO task_labels (task_id, label_id) VALUES (?, ?)")
        .bind(task_id)
        .bind(label_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

impl<'a> SqliteTaskRepository<'a> {
    async fn insert(&self, task: &Task, labels: &[String]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        let id = task.id.to_string();

        sqlx::query(
            "INSERT INTO tasks (id, project_id, description, done, priority, notes, due_date, \
             created_at, updated_at, completed_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(task.project_id.to_string())
        .bind(&task.description)
        .bind(task.done)
        .bind(task.priority.map(|p| p.as_str()))
        .bind(&task.notes)
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(task.completed_at)
        .execute(&mut *tx)
        .await?;

        for name in labels {
            link_label(&mut tx, &id, name).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

impl<'a> TaskRepository for SqliteTaskRepository<'a> {
    async fn create(&self, task: &Task) -> DbResult<Task> {
        let labels = normalize_labels(&task.labels);
        let labels = labels.as_slice();
        let repo = self;
        with_retry(self.retry, "create task", move || async move {
            repo.insert(task, labels).await
        })
        .await?;

        tracing::info!(task_id = %task.id, project_id = %task.project_id, "Created task");
        self.get(task.id).await
    }

    async fn get(&self, id: Uuid) -> DbResult<Task> {
        let sql = format!("SELECT {} FROM tasks t WHERE t.id = ?", TASK_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Task", id))?;
        task_from_row(&row)
    }

    async fn find_by_prefix(&self, prefix: &str) -> DbResult<Vec<Task>> {
        // GLOB is case-sensitive, unlike LIKE; the prefix holds no wildcards.
        let sql = format!(
            "SELECT {} FROM tasks t WHERE t.id GLOB ? ORDER BY t.id",
            TASK_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(format!("{}*", prefix))
            .fetch_all(self.pool)
            .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn list(&self, query: &TaskQuery) -> DbResult<Vec<Task>> {
        let mut conditions: Vec<String> = vec![];
        let mut bind_values: Vec<String> = vec![];

        if let Some(project_id) = query.project_id {
            conditions.push("t.project_id = ?".to_string());
            bind_values.push(project_id.to_string());
        }
        if let Some(done) = query.done {
            conditions.push(format!("t.done = {}", i32::from(done)));
        }
        if let Some(priority) = query.priority {
            conditions.push("t.priority = ?".to_string());
            bind_values.push(priority.as_str().to_string());
        }

        // Label filtering requires a join; DISTINCT keeps one row per task.
        let from_clause = if let Some(label) = &query.label {
            conditions.push("l.name = ?".to_string());
            bind_values.push(label.trim().to_string());
            "FROM tasks t \
             JOIN task_labels tl ON tl.task_id = t.id \
             JOIN labels l ON l.id = tl.label_id"
        } else {
            "FROM tasks t"
        };

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT DISTINCT {} {} {} ORDER BY t.created_at DESC, t.id",
            TASK_COLUMNS, from_clause, where_clause
        );

        let mut sql_query = sqlx::query(&sql);
        for value in &bind_values {
            sql_query = sql_query.bind(value);
        }

        let rows = sql_query.fetch_all(self.pool).await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn update(&self, task: &Task) -> DbResult<Task> {
        let pool = self.pool;
        let updated_at = Utc::now();
        let result = with_retry(self.retry, "update task", move || async move {
            Ok::<_, DbError>(sqlx::query(
                "UPDATE tasks SET project_id = ?, description = ?, done = ?, priority = ?, \
                 notes = ?, due_date = ?, completed_at = ?, updated_at = ? WHERE id = ?",
            )
            .bind(task.project_id.to_string())
            .bind(&task.description)
            .bind(task.done)
            .bind(task.priority.map(|p| p.as_str()))
            .bind(&task.notes)
            .bind(task.due_date)
            .bind(task.completed_at)
            .bind(updated_at)
            .bind(task.id.to_string())
            .execute(pool)
            .await?)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", task.id));
        }

        tracing::debug!(task_id = %task.id, done = task.done, "Updated task");
        self.get(task.id).await
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let pool = self.pool;
        let key = id.to_string();
        let key = key.as_str();
        let result = with_retry(self.retry, "delete task", move || async move {
            Ok::<_, DbError>(sqlx::query("DELETE FROM tasks WHERE id = ?")
                .bind(key)
                .execute(pool)
                .await?)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }

        tracing::info!(task_id = %id, "Deleted task");
        Ok(())
    }
}
