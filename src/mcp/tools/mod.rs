//! MCP tool implementations
//!
//! Tool handlers are organized by entity type. Each module declares its
//! tools as [`ToolSpec`] constants and implements one async handler per tool
//! taking a typed parameter struct. [`Tools::call`] validates raw arguments
//! against the declaration, deserializes them and routes to the handler.

mod labels;
mod projects;
mod tasks;


use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::db::Database;
use crate::mcp::error::ToolError;
use crate::mcp::schema::ToolSpec;

pub use labels::{AddLabelParams, LabelTools, RemoveLabelParams};
pub use projects::{CreateProjectParams, DeleteProjectParams, ProjectTools, UpdateProjectParams};
pub use tasks::{CreateTaskParams, ListTasksParams, TaskRefParams, TaskTools, UpdateTaskParams};

/// Every tool the server advertises, in listing order.
pub static TOOLS: &[&ToolSpec] = &[
    &tasks::CREATE_TASK,
    &tasks::GET_TASK,
    &tasks::LIST_TASKS,
    &tasks::UPDATE_TASK,
    &tasks::MARK_DONE,
    &tasks::MARK_UNDONE,
    &tasks::DELETE_TASK,
    &labels::ADD_LABEL,
    &labels::REMOVE_LABEL,
    &labels::LIST_LABELS,
    &projects::CREATE_PROJECT,
    &projects::LIST_PROJECTS,
    &projects::UPDATE_PROJECT,
    &projects::DELETE_PROJECT,
];

pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().copied().find(|spec| spec.name == name)
}

/// Deserialize already-validated arguments into a handler's parameter struct.
pub(crate) fn parse_params<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::validation(format!("Invalid arguments: {}", e)))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Internal {
        message: e.to_string(),
    })
}

/// All tool handlers over one shared database handle.
pub struct Tools<D: Database> {
    pub tasks: TaskTools<D>,
    pub projects: ProjectTools<D>,
    pub labels: LabelTools<D>,
}

impl<D: Database + 'static> Tools<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self {
            tasks: TaskTools::new(Arc::clone(&db)),
            projects: ProjectTools::new(Arc::clone(&db)),
            labels: LabelTools::new(db),
        }
    }

    /// Validate, parse and run a tool call.
    pub async fn call(&self, name: &str, args: Map<String, Value>) -> Result<Value, ToolError> {
        let spec = find_tool(name)
            .ok_or_else(|| ToolError::validation(format!("Unknown tool '{}'", name)))?;
        spec.validate(&args)?;

        tracing::info!(tool = name, "Calling tool");

        match spec.name {
            "create_task" => self.tasks.create_task(parse_params(args)?).await,
            "get_task" => self.tasks.get_task(parse_params(args)?).await,
            "list_tasks" => self.tasks.list_tasks(parse_params(args)?).await,
            "update_task" => self.tasks.update_task(parse_params(args)?).await,
            "mark_done" => self.tasks.mark_done(parse_params(args)?).await,
            "mark_undone" => self.tasks.mark_undone(parse_params(args)?).await,
            "delete_task" => self.tasks.delete_task(parse_params(args)?).await,
            "add_label" => self.labels.add_label(parse_params(args)?).await,
            "remove_label" => self.labels.remove_label(parse_params(args)?).await,
            "list_labels" => self.labels.list_labels().await,
            "create_project" => self.projects.create_project(parse_params(args)?).await,
            "list_projects" => self.projects.list_projects().await,
            "update_project" => self.projects.update_project(parse_params(args)?).await,
            "delete_project" => self.projects.delete_project(parse_params(args)?).await,
            other => Err(ToolError::Internal {
                message: format!("Tool '{}' is declared but has no handler", other),
            }),
        }
    }
}
