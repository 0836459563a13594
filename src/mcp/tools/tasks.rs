//! MCP tools for Task management.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::db::{
    DEFAULT_PROJECT_NAME, Database, Priority, ProjectRepository, Task, TaskQuery, TaskRepository,
    normalize_labels, parse_due_date, resolve_task, validate_description,
};
use crate::mcp::error::ToolError;
use crate::mcp::schema::{ParamKind, ParamSpec, ToolSpec};
use crate::mcp::tools::to_json;

const PRIORITY: ParamKind = ParamKind::Enum(Priority::NAMES);
const TASK_ID_HELP: &str =
    "Task ID: the full UUID or a unique prefix of at least 6 hex digits (as shown by list_tasks)";

// =============================================================================
// Declarations
// =============================================================================

pub static CREATE_TASK: ToolSpec = ToolSpec {
    name: "create_task",
    description: "Create a new task. Without project_id the task goes into the 'default' project, \
                  which is created on first use. Returns the task including its labels.",
    params: &[
        ParamSpec::required(
            "description",
            ParamKind::String,
            "What needs to be done (at least 3 characters)",
        ),
        ParamSpec::optional(
            "project_id",
            ParamKind::Uuid,
            "Project ID. Use list_projects to find existing projects.",
        ),
        ParamSpec::optional("priority", PRIORITY, "Priority: low, medium or high"),
        ParamSpec::optional(
            "labels",
            ParamKind::StringList,
            "Labels to attach (created on first use)",
        ),
        ParamSpec::optional("notes", ParamKind::String, "Free-form notes"),
        ParamSpec::optional(
            "due_date",
            ParamKind::DateTime,
            "Due date as RFC 3339 (2025-01-31T17:00:00Z) or YYYY-MM-DD",
        ),
    ],
};

pub static GET_TASK: ToolSpec = ToolSpec {
    name: "get_task",
    description: "Get a single task by ID or unique ID prefix.",
    params: &[ParamSpec::required("task_id", ParamKind::TaskRef, TASK_ID_HELP)],
};

pub static LIST_TASKS: ToolSpec = ToolSpec {
    name: "list_tasks",
    description: "List tasks, newest first. All filters are optional and combined with AND. \
                  Use this to look up task IDs before updating tasks.",
    params: &[
        ParamSpec::optional("project_id", ParamKind::Uuid, "Only tasks of this project"),
        ParamSpec::optional("done", ParamKind::Boolean, "true: completed only, false: pending only"),
        ParamSpec::optional("priority", PRIORITY, "Only tasks with this priority"),
        ParamSpec::optional("label", ParamKind::String, "Only tasks carrying this label"),
        ParamSpec::optional(
            "overdue",
            ParamKind::Boolean,
            "true: only overdue tasks (pending, due before today), false: exclude them",
        ),
    ],
};

pub static UPDATE_TASK: ToolSpec = ToolSpec {
    name: "update_task",
    description: "Update description, priority, notes or due date of a task. \
                  Only supplied fields change; an empty notes string clears the notes.",
    params: &[
        ParamSpec::required("task_id", ParamKind::TaskRef, TASK_ID_HELP),
        ParamSpec::optional("description", ParamKind::String, "New description"),
        ParamSpec::optional("priority", PRIORITY, "New priority: low, medium or high"),
        ParamSpec::optional("notes", ParamKind::String, "New notes"),
        ParamSpec::optional(
            "due_date",
            ParamKind::DateTime,
            "New due date as RFC 3339 or YYYY-MM-DD",
        ),
    ],
};

pub static MARK_DONE: ToolSpec = ToolSpec {
    name: "mark_done",
    description: "Mark a task as completed. Sets completed_at.",
    params: &[ParamSpec::required("task_id", ParamKind::TaskRef, TASK_ID_HELP)],
};

pub static MARK_UNDONE: ToolSpec = ToolSpec {
    name: "mark_undone",
    description: "Reopen a completed task. Clears completed_at.",
    params: &[ParamSpec::required("task_id", ParamKind::TaskRef, TASK_ID_HELP)],
};

pub static DELETE_TASK: ToolSpec = ToolSpec {
    name: "delete_task",
    description: "Delete a task permanently, together with its label associations.",
    params: &[ParamSpec::required("task_id", ParamKind::TaskRef, TASK_ID_HELP)],
};

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTaskParams {
    pub description: String,
    pub project_id: Option<Uuid>,
    pub priority: Option<Priority>,
    pub labels: Option<Vec<String>>,
    pub notes: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListTasksParams {
    pub project_id: Option<Uuid>,
    pub done: Option<bool>,
    pub priority: Option<Priority>,
    pub label: Option<String>,
    pub overdue: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskRefParams {
    pub task_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTaskParams {
    pub task_id: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub due_date: Option<String>,
}

// =============================================================================
// Task Tools
// =============================================================================

pub struct TaskTools<D: Database> {
    db: Arc<D>,
}

impl<D: Database + 'static> TaskTools<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    async fn resolve(&self, task_id: &str) -> Result<Task, ToolError> {
        Ok(resolve_task(&self.db.tasks(), task_id).await?)
    }

    pub async fn create_task(&self, params: CreateTaskParams) -> Result<Value, ToolError> {
        let description = validate_description(&params.description).map_err(ToolError::validation)?;
        let due_date = params
            .due_date
            .as_deref()
            .map(parse_due_date)
            .transpose()
            .map_err(ToolError::validation)?;

        let project = match params.project_id {
            Some(id) => self.db.projects().get(id).await?,
            None => self.db.projects().get_or_create(DEFAULT_PROJECT_NAME).await?,
        };

        let mut task = Task::new(project.id, description);
        task.priority = params.priority;
        task.notes = params.notes.filter(|n| !n.trim().is_empty());
        task.due_date = due_date;
        task.labels = normalize_labels(params.labels.unwrap_or_default());

        let created = self.db.tasks().create(&task).await?;
        to_json(&created)
    }

    pub async fn get_task(&self, params: TaskRefParams) -> Result<Value, ToolError> {
        let task = self.resolve(&params.task_id).await?;
        to_json(&task)
    }

    pub async fn list_tasks(&self, params: ListTasksParams) -> Result<Value, ToolError> {
        let query = TaskQuery {
            project_id: params.project_id,
            done: params.done,
            priority: params.priority,
            label: params.label.clone(),
        };

        let mut tasks = self.db.tasks().list(&query).await?;
        if let Some(overdue) = params.overdue {
            let now = Utc::now();
            tasks.retain(|t| t.is_overdue(now) == overdue);
        }

        let mut filters = Map::new();
        if let Some(id) = params.project_id {
            filters.insert("project_id".to_string(), json!(id));
        }
        if let Some(done) = params.done {
            filters.insert("done".to_string(), json!(done));
        }
        if let Some(priority) = params.priority {
            filters.insert("priority".to_string(), json!(priority));
        }
        if let Some(label) = params.label {
            filters.insert("label".to_string(), json!(label));
        }
        if let Some(overdue) = params.overdue {
            filters.insert("overdue".to_string(), json!(overdue));
        }

        Ok(json!({
            "tasks": tasks,
            "count": tasks.len(),
            "filters": filters,
        }))
    }

    pub async fn update_task(&self, params: UpdateTaskParams) -> Result<Value, ToolError> {
        if params.description.is_none()
            && params.priority.is_none()
            && params.notes.is_none()
            && params.due_date.is_none()
        {
            return Err(ToolError::validation(
                "Nothing to update: supply description, priority, notes or due_date",
            ));
        }

        let mut task = self.resolve(&params.task_id).await?;

        if let Some(description) = &params.description {
            task.description = validate_description(description).map_err(ToolError::validation)?;
        }
        if let Some(priority) = params.priority {
            task.priority = Some(priority);
        }
        if let Some(notes) = params.notes {
            task.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        if let Some(due) = &params.due_date {
            task.due_date = Some(parse_due_date(due).map_err(ToolError::validation)?);
        }

        let updated = self.db.tasks().update(&task).await?;
        to_json(&updated)
    }

    pub async fn mark_done(&self, params: TaskRefParams) -> Result<Value, ToolError> {
        let mut task = self.resolve(&params.task_id).await?;
        task.mark_done(Utc::now());
        let updated = self.db.tasks().update(&task).await?;
        tracing::info!(task_id = %updated.id, "Task marked done");
        to_json(&updated)
    }

    pub async fn mark_undone(&self, params: TaskRefParams) -> Result<Value, ToolError> {
        let mut task = self.resolve(&params.task_id).await?;
        task.mark_undone(Utc::now());
        let updated = self.db.tasks().update(&task).await?;
        tracing::info!(task_id = %updated.id, "Task reopened");
        to_json(&updated)
    }

    pub async fn delete_task(&self, params: TaskRefParams) -> Result<Value, ToolError> {
        let task = self.resolve(&params.task_id).await?;
        self.db.tasks().delete(task.id).await?;

        Ok(json!({
            "success": true,
            "message": format!("Task '{}' deleted", task.description),
            "task_id": task.id,
        }))
    }
}
