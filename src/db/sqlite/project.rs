//! SQLite ProjectRepository implementation.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::helpers::{PROJECT_COLUMNS, project_from_row};
use super::retry::{RetryPolicy, with_retry};
use crate::db::{DbError, DbResult, Project, ProjectRepository};

/// SQLx-backed project repository.
pub struct SqliteProjectRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) retry: RetryPolicy,
}

impl<'a> SqliteProjectRepository<'a> {
    async fn fetch_one_where(&self, column: &str, value: &str, key: &str) -> DbResult<Project> {
        let sql = format!("SELECT {} FROM projects WHERE {} = ?", PROJECT_COLUMNS, column);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Project", key))?;
        project_from_row(&row)
    }
}

impl<'a> ProjectRepository for SqliteProjectRepository<'a> {
    async fn create(&self, project: &Project) -> DbResult<Project> {
        let pool = self.pool;
        with_retry(self.retry, "create project", move || async move {
            sqlx::query(
                "INSERT INTO projects (id, name, directory_path, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(project.id.to_string())
            .bind(&project.name)
            .bind(&project.directory_path)
            .bind(project.created_at)
            .execute(pool)
            .await?;
            Ok::<_, DbError>(())
        })
        .await?;

        tracing::info!(project_id = %project.id, name = %project.name, "Created project");
        Ok(project.clone())
    }

    async fn get(&self, id: Uuid) -> DbResult<Project> {
        let id = id.to_string();
        self.fetch_one_where("id", &id, &id).await
    }

    async fn get_by_name(&self, name: &str) -> DbResult<Project> {
        self.fetch_one_where("name", name, name).await
    }

    async fn get_by_path(&self, path: &str) -> DbResult<Project> {
        self.fetch_one_where("directory_path", path, path).await
    }

    async fn list(&self) -> DbResult<Vec<Project>> {
        let sql = format!("SELECT {} FROM projects ORDER BY name", PROJECT_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        rows.iter().map(project_from_row).collect()
    }

    async fn update(&self, project: &Project) -> DbResult<Project> {
        let pool = self.pool;
        let result = with_retry(self.retry, "update project", move || async move {
            Ok::<_, DbError>(
                sqlx::query("UPDATE projects SET name = ?, directory_path = ? WHERE id = ?")
                    .bind(&project.name)
                    .bind(&project.directory_path)
                    .bind(project.id.to_string())
                    .execute(pool)
                    .await?,
            )
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Project", project.id));
        }

        self.get(project.id).await
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let pool = self.pool;
        let key = id.to_string();
        let key = key.as_str();
        let result = with_retry(self.retry, "delete project", move || async move {
            Ok::<_, DbError>(sqlx::query("DELETE FROM projects WHERE id = ?")
                .bind(key)
                .execute(pool)
                .await?)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Project", id));
        }

        tracing::info!(project_id = %id, "Deleted project");
        Ok(())
    }

    async fn get_or_create(&self, name: &str) -> DbResult<Project> {
        let pool = self.pool;
        let candidate = Project::new(name, None);
        let candidate = &candidate;
        // A concurrent creator wins the insert; both sides then read the same row.
        let inserted = with_retry(self.retry, "get or create project", move || async move {
            Ok::<_, DbError>(sqlx::query(
                "INSERT INTO projects (id, name, directory_path, created_at) VALUES (?, ?, NULL, ?) \
                 ON CONFLICT(name) DO NOTHING",
            )
            .bind(candidate.id.to_string())
            .bind(&candidate.name)
            .bind(candidate.created_at)
            .execute(pool)
            .await?
            .rows_affected())
        })
        .await?;

        if inserted > 0 {
            tracing::info!(project_id = %candidate.id, name, "Created project on first use");
        }

        self.get_by_name(name).await
    }
}
