//! Shared row mapping for SQLite repositories.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::types::Json;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::db::{DbError, DbResult, Priority, Project, Task};

pub(crate) const PROJECT_COLUMNS: &str = "id, name, directory_path, created_at";

/// Task columns plus the sorted-later label names as a JSON array.
pub(crate) const TASK_COLUMNS: &str = "t.id AS id, t.project_id AS project_id, \
     t.description AS description, t.done AS done, t.priority AS priority, \
     t.notes AS notes, t.due_date AS due_date, t.created_at AS created_at, \
     t.updated_at AS updated_at, t.completed_at AS completed_at, \
     (SELECT json_group_array(lb.name) FROM task_labels lt \
      JOIN labels lb ON lb.id = lt.label_id WHERE lt.task_id = t.id) AS labels";

pub(crate) fn parse_uuid(raw: &str) -> DbResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| DbError::InvalidData {
        message: format!("stored id '{}' is not a UUID: {}", raw, e),
    })
}

pub(crate) fn project_from_row(row: &SqliteRow) -> DbResult<Project> {
    let id: String = row.try_get("id")?;
    Ok(Project {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        directory_path: row.try_get("directory_path")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

pub(crate) fn task_from_row(row: &SqliteRow) -> DbResult<Task> {
    let id: String = row.try_get("id")?;
    let project_id: String = row.try_get("project_id")?;

    let priority = row
        .try_get::<Option<String>, _>("priority")?
        .map(|p| p.parse::<Priority>())
        .transpose()
        .map_err(|message| DbError::InvalidData { message })?;

    let Json(mut labels): Json<Vec<String>> = row.try_get("labels")?;
    labels.sort();

    Ok(Task {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        description: row.try_get("description")?,
        done: row.try_get("done")?,
        priority,
        notes: row.try_get("notes")?,
        due_date: row.try_get("due_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        completed_at: row.try_get("completed_at")?,
        labels,
    })
}
