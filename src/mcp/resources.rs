//! Read-only resources.
//!
//! Every resource is a fixed view over the same predicates `list_tasks`
//! supports, wrapped in one envelope:
//!
//! ```json
//! {
//!   "metadata": { "timestamp": "...", "count": 3, "resource_uri": "toki://tasks/pending", "filters": {"done": false} },
//!   "data": [ ... ],
//!   "links": { "overdue": "toki://tasks/overdue", ... }
//! }
//! ```
//!
//! Nothing is cached; each read goes back to the store.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use crate::db::{
    Database, DbResult, LabelRepository, Priority, ProjectRepository, TaskQuery, TaskRepository,
};
use crate::stats::collect_stats;

pub const MIME_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec {
    pub uri: &'static str,
    /// Short name used as the key in `links`.
    pub name: &'static str,
    pub description: &'static str,
}

pub static RESOURCES: &[ResourceSpec] = &[
    ResourceSpec {
        uri: "toki://projects",
        name: "projects",
        description: "All projects ordered by name",
    },
    ResourceSpec {
        uri: "toki://tasks",
        name: "tasks",
        description: "All tasks, newest first",
    },
    ResourceSpec {
        uri: "toki://tasks/pending",
        name: "pending",
        description: "Tasks that are not done yet",
    },
    ResourceSpec {
        uri: "toki://tasks/overdue",
        name: "overdue",
        description: "Pending tasks whose due day lies before today (UTC)",
    },
    ResourceSpec {
        uri: "toki://tasks/high-priority",
        name: "high_priority",
        description: "Tasks with priority high",
    },
    ResourceSpec {
        uri: "toki://labels",
        name: "labels",
        description: "Every label in use, ordered by name",
    },
    ResourceSpec {
        uri: "toki://stats",
        name: "stats",
        description: "Task counts by status, priority and project, plus the oldest pending task",
    },
];

pub fn find_resource(uri: &str) -> Option<&'static ResourceSpec> {
    RESOURCES.iter().find(|r| r.uri == uri)
}

fn links(current: &str) -> Map<String, Value> {
    RESOURCES
        .iter()
        .filter(|r| r.uri != current)
        .map(|r| (r.name.to_string(), json!(r.uri)))
        .collect()
}

fn envelope(uri: &str, now: DateTime<Utc>, count: usize, filters: Value, data: Value) -> Value {
    json!({
        "metadata": {
            "timestamp": now,
            "count": count,
            "resource_uri": uri,
            "filters": filters,
        },
        "data": data,
        "links": links(uri),
    })
}

/// Read a resource by URI. `Ok(None)` means the URI is not a known resource.
pub async fn read_resource<D: Database>(
    db: &D,
    uri: &str,
    now: DateTime<Utc>,
) -> DbResult<Option<Value>> {
    let Some(spec) = find_resource(uri) else {
        return Ok(None);
    };
    tracing::debug!(uri = spec.uri, "Reading resource");

    let body = match spec.name {
        "projects" => {
            let projects = db.projects().list().await?;
            envelope(spec.uri, now, projects.len(), json!({}), json!(projects))
        }
        "labels" => {
            let labels = db.labels().list().await?;
            envelope(spec.uri, now, labels.len(), json!({}), json!(labels))
        }
        "stats" => {
            let stats = collect_stats(db, now).await?;
            envelope(spec.uri, now, stats.summary.total, json!({}), json!(stats))
        }
        "tasks" => {
            let tasks = db.tasks().list(&TaskQuery::default()).await?;
            envelope(spec.uri, now, tasks.len(), json!({}), json!(tasks))
        }
        "pending" => {
            let query = TaskQuery {
                done: Some(false),
                ..Default::default()
            };
            let tasks = db.tasks().list(&query).await?;
            envelope(spec.uri, now, tasks.len(), json!({"done": false}), json!(tasks))
        }
        "overdue" => {
            let query = TaskQuery {
                done: Some(false),
                ..Default::default()
            };
            let mut tasks = db.tasks().list(&query).await?;
            tasks.retain(|t| t.is_overdue(now));
            envelope(
                spec.uri,
                now,
                tasks.len(),
                json!({"done": false, "overdue": true}),
                json!(tasks),
            )
        }
        "high_priority" => {
            let query = TaskQuery {
                priority: Some(Priority::High),
                ..Default::default()
            };
            let tasks = db.tasks().list(&query).await?;
            envelope(
                spec.uri,
                now,
                tasks.len(),
                json!({"priority": Priority::High}),
                json!(tasks),
            )
        }
        _ => return Ok(None),
    };

    Ok(Some(body))
}
