//! Summary statistics over the whole task set.
//!
//! Nothing here is cached: [`collect_stats`] reads every task and project from
//! the store on each call, so a second process writing to the same file is
//! always reflected.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{Database, DbResult, Project, ProjectRepository, Task, TaskQuery, TaskRepository};

#[cfg(test)]
mod stats_test;

/// Histogram key for tasks without a priority.
pub const NO_PRIORITY_KEY: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub summary: Summary,
    pub by_priority: BTreeMap<String, usize>,
    pub by_project: Vec<ProjectCount>,
    pub oldest_pending: Option<OldestPending>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCount {
    pub project_id: Uuid,
    pub project_name: String,
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OldestPending {
    pub id: Uuid,
    pub description: String,
    pub age_days: i64,
}

/// Compute statistics in a single pass over `tasks`.
///
/// Projects without tasks do not appear in `by_project`; tasks whose project
/// is missing from `projects` are listed under an empty name.
pub fn compute_stats(tasks: &[Task], projects: &[Project], now: DateTime<Utc>) -> Stats {
    let mut summary = Summary {
        total: 0,
        pending: 0,
        completed: 0,
        overdue: 0,
    };
    let mut by_priority: BTreeMap<String, usize> = BTreeMap::new();
    let mut project_counts: Vec<(Uuid, usize)> = Vec::new();
    let mut project_slots: HashMap<Uuid, usize> = HashMap::new();
    let mut oldest: Option<&Task> = None;

    for task in tasks {
        summary.total += 1;
        if task.done {
            summary.completed += 1;
        } else {
            summary.pending += 1;
            if oldest.is_none_or(|o| task.created_at < o.created_at) {
                oldest = Some(task);
            }
        }
        if task.is_overdue(now) {
            summary.overdue += 1;
        }

        let key = task
            .priority
            .map(|p| p.as_str())
            .unwrap_or(NO_PRIORITY_KEY);
        *by_priority.entry(key.to_string()).or_default() += 1;

        let slot = *project_slots.entry(task.project_id).or_insert_with(|| {
            project_counts.push((task.project_id, 0));
            project_counts.len() - 1
        });
        project_counts[slot].1 += 1;
    }

    // Stable sort: equal counts keep the order the scan first met them.
    project_counts.sort_by(|a, b| b.1.cmp(&a.1));

    let names: HashMap<Uuid, &str> = projects.iter().map(|p| (p.id, p.name.as_str())).collect();
    let by_project = project_counts
        .into_iter()
        .map(|(project_id, task_count)| ProjectCount {
            project_id,
            project_name: names.get(&project_id).copied().unwrap_or_default().to_string(),
            task_count,
        })
        .collect();

    let oldest_pending = oldest.map(|t| OldestPending {
        id: t.id,
        description: t.description.clone(),
        age_days: (now - t.created_at).num_days(),
    });

    Stats {
        summary,
        by_priority,
        by_project,
        oldest_pending,
    }
}

/// Load the current task set and project list and compute statistics.
pub async fn collect_stats<D: Database>(db: &D, now: DateTime<Utc>) -> DbResult<Stats> {
    let tasks = db.tasks().list(&TaskQuery::default()).await?;
    let projects = db.projects().list().await?;
    tracing::debug!(tasks = tasks.len(), projects = projects.len(), "Computing stats");
    Ok(compute_stats(&tasks, &projects, now))
}
