//! MCP tools for Project management.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::db::{Database, Project, ProjectRepository, normalize_project_path};
use crate::mcp::error::ToolError;
use crate::mcp::schema::{ParamKind, ParamSpec, ToolSpec};
use crate::mcp::tools::to_json;

pub static CREATE_PROJECT: ToolSpec = ToolSpec {
    name: "create_project",
    description: "Create a project. Names are unique. A project may be tied to an absolute \
                  directory so the command line picks it up automatically inside that directory.",
    params: &[
        ParamSpec::required("name", ParamKind::String, "Unique project name"),
        ParamSpec::optional("path", ParamKind::String, "Absolute directory path"),
    ],
};

pub static LIST_PROJECTS: ToolSpec = ToolSpec {
    name: "list_projects",
    description: "List all projects ordered by name. Use this to find project IDs.",
    params: &[],
};

pub static UPDATE_PROJECT: ToolSpec = ToolSpec {
    name: "update_project",
    description: "Rename a project or change its directory. Only supplied fields change.",
    params: &[
        ParamSpec::required("project_id", ParamKind::Uuid, "Project ID"),
        ParamSpec::optional("name", ParamKind::String, "New unique name"),
        ParamSpec::optional("path", ParamKind::String, "New absolute directory path"),
    ],
};

pub static DELETE_PROJECT: ToolSpec = ToolSpec {
    name: "delete_project",
    description: "Delete a project. All of its tasks are deleted with it.",
    params: &[ParamSpec::required("project_id", ParamKind::Uuid, "Project ID")],
};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateProjectParams {
    pub name: String,
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProjectParams {
    pub project_id: Uuid,
    pub name: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteProjectParams {
    pub project_id: Uuid,
}

fn checked_name(name: &str) -> Result<String, ToolError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::validation("Project name cannot be empty"));
    }
    Ok(name.to_string())
}

fn checked_path(path: &str) -> Result<String, ToolError> {
    let trimmed = Path::new(path.trim());
    if !trimmed.is_absolute() {
        return Err(ToolError::validation(format!(
            "Project path '{}' must be absolute",
            path
        )));
    }
    Ok(normalize_project_path(trimmed)
        .to_string_lossy()
        .into_owned())
}

pub struct ProjectTools<D: Database> {
    db: Arc<D>,
}

impl<D: Database + 'static> ProjectTools<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub async fn create_project(&self, params: CreateProjectParams) -> Result<Value, ToolError> {
        let name = checked_name(&params.name)?;
        let path = params.path.as_deref().map(checked_path).transpose()?;

        let project = self.db.projects().create(&Project::new(name, path)).await?;
        to_json(&project)
    }

    pub async fn list_projects(&self) -> Result<Value, ToolError> {
        let projects = self.db.projects().list().await?;
        Ok(json!({
            "projects": projects,
            "count": projects.len(),
        }))
    }

    pub async fn update_project(&self, params: UpdateProjectParams) -> Result<Value, ToolError> {
        if params.name.is_none() && params.path.is_none() {
            return Err(ToolError::validation(
                "Nothing to update: supply name or path",
            ));
        }

        let mut project = self.db.projects().get(params.project_id).await?;
        if let Some(name) = &params.name {
            project.name = checked_name(name)?;
        }
        if let Some(path) = &params.path {
            project.directory_path = Some(checked_path(path)?);
        }

        let updated = self.db.projects().update(&project).await?;
        to_json(&updated)
    }

    pub async fn delete_project(&self, params: DeleteProjectParams) -> Result<Value, ToolError> {
        let project = self.db.projects().get(params.project_id).await?;
        self.db.projects().delete(project.id).await?;

        Ok(json!({
            "success": true,
            "message": format!("Project '{}' and all its tasks deleted", project.name),
            "project_id": project.id,
        }))
    }
}
