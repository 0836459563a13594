//! MCP tools for attaching labels to tasks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::db::{Database, LabelRepository, TaskRepository, resolve_task};
use crate::mcp::error::ToolError;
use crate::mcp::schema::{ParamKind, ParamSpec, ToolSpec};
use crate::mcp::tools::to_json;

const TASK_ID_HELP: &str = "Task ID: the full UUID or a unique prefix of at least 6 hex digits";

pub static ADD_LABEL: ToolSpec = ToolSpec {
    name: "add_label",
    description: "Attach a label to a task. The label is created on first use; \
                  adding a label twice has no further effect.",
    params: &[
        ParamSpec::required("task_id", ParamKind::TaskRef, TASK_ID_HELP),
        ParamSpec::required("label", ParamKind::String, "Label name"),
    ],
};

pub static REMOVE_LABEL: ToolSpec = ToolSpec {
    name: "remove_label",
    description: "Detach a label from a task. The label stays available for other tasks.",
    params: &[
        ParamSpec::required("task_id", ParamKind::TaskRef, TASK_ID_HELP),
        ParamSpec::required("label", ParamKind::String, "Label name"),
    ],
};

pub static LIST_LABELS: ToolSpec = ToolSpec {
    name: "list_labels",
    description: "List every label that has ever been used, ordered by name.",
    params: &[],
};

#[derive(Debug, Serialize, Deserialize)]
pub struct AddLabelParams {
    pub task_id: String,
    pub label: String,
}

pub type RemoveLabelParams = AddLabelParams;

pub struct LabelTools<D: Database> {
    db: Arc<D>,
}

impl<D: Database + 'static> LabelTools<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub async fn add_label(&self, params: AddLabelParams) -> Result<Value, ToolError> {
        let task = resolve_task(&self.db.tasks(), &params.task_id).await?;
        self.db.labels().add_to_task(task.id, &params.label).await?;
        let updated = self.db.tasks().get(task.id).await?;
        to_json(&updated)
    }

    pub async fn remove_label(&self, params: RemoveLabelParams) -> Result<Value, ToolError> {
        let task = resolve_task(&self.db.tasks(), &params.task_id).await?;
        self.db
            .labels()
            .remove_from_task(task.id, &params.label)
            .await?;
        let updated = self.db.tasks().get(task.id).await?;
        to_json(&updated)
    }

    pub async fn list_labels(&self) -> Result<Value, ToolError> {
        let labels = self.db.labels().list().await?;
        Ok(json!({
            "labels": labels,
            "count": labels.len(),
        }))
    }
}
