//! Human-readable rendering of tasks and projects.

use chrono::{DateTime, Utc};
use tabled::{Table, Tabled};
use uuid::Uuid;

use crate::cli::utils::{apply_table_style, format_labels, truncate_with_ellipsis};
use crate::db::{Project, Task};

/// Characters of the id shown in listings.
pub const SHORT_ID_LEN: usize = 6;

const DESCRIPTION_WIDTH: usize = 50;

#[derive(Tabled)]
pub(crate) struct TaskDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Done")]
    pub(crate) done: String,
    #[tabled(rename = "Priority")]
    pub(crate) priority: String,
    #[tabled(rename = "Description")]
    pub(crate) description: String,
    #[tabled(rename = "Due")]
    pub(crate) due: String,
    #[tabled(rename = "Labels")]
    pub(crate) labels: String,
}

impl TaskDisplay {
    pub(crate) fn new(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.short_id(SHORT_ID_LEN),
            done: if task.done { "✓" } else { "" }.to_string(),
            priority: task
                .priority
                .map(|p| p.as_str().to_uppercase())
                .unwrap_or_else(|| "-".to_string()),
            description: truncate_with_ellipsis(&task.description, DESCRIPTION_WIDTH),
            due: format_due(task, now).unwrap_or_else(|| "-".to_string()),
            labels: format_labels(&task.labels),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct ProjectDisplay {
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Path")]
    pub(crate) path: String,
    #[tabled(rename = "ID")]
    pub(crate) id: String,
}

impl From<&Project> for ProjectDisplay {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            path: project
                .directory_path
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            id: project.id.to_string(),
        }
    }
}

/// Due date as `YYYY-MM-DD`, marked when the task is overdue.
pub fn format_due(task: &Task, now: DateTime<Utc>) -> Option<String> {
    let due = task.due_date?;
    let day = due.format("%Y-%m-%d").to_string();
    if task.is_overdue(now) {
        Some(format!("{} (overdue)", day))
    } else {
        Some(day)
    }
}

/// One task as a short block: id, priority and description, then due date and labels.
pub fn format_task(task: &Task, now: DateTime<Utc>) -> String {
    let mut line = String::from("  ");
    if task.done {
        line.push_str("✓ ");
    }
    line.push_str(&task.short_id(SHORT_ID_LEN));
    line.push_str("  ");
    if let Some(priority) = task.priority {
        line.push_str(&format!("[{}] ", priority.as_str().to_uppercase()));
    }
    line.push_str(&task.description);

    let mut metadata = Vec::new();
    if let Some(due) = format_due(task, now) {
        metadata.push(format!("Due: {}", due));
    }
    if !task.labels.is_empty() {
        metadata.push(format!("Labels: {}", task.labels.join(", ")));
    }
    if !metadata.is_empty() {
        line.push_str("\n          ");
        line.push_str(&metadata.join(" | "));
    }
    line
}

pub fn format_project_header(project: &Project) -> String {
    match &project.directory_path {
        Some(path) => format!("PROJECT: {} ({})", project.name, path),
        None => format!("PROJECT: {}", project.name),
    }
}

/// Tasks grouped by project, in the order projects first appear in `tasks`.
pub fn format_task_table(tasks: &[Task], projects: &[Project], now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return "No tasks found. Add one with 'toki add <description>'".to_string();
    }

    let mut groups: Vec<(Uuid, Vec<&Task>)> = Vec::new();
    for task in tasks {
        match groups.iter_mut().find(|(id, _)| *id == task.project_id) {
            Some((_, items)) => items.push(task),
            None => groups.push((task.project_id, vec![task])),
        }
    }

    let mut sections = Vec::new();
    for (project_id, items) in &groups {
        let header = projects
            .iter()
            .find(|p| p.id == *project_id)
            .map(format_project_header)
            .unwrap_or_else(|| format!("PROJECT: {}", project_id));
        let rows: Vec<TaskDisplay> = items.iter().map(|t| TaskDisplay::new(t, now)).collect();
        let mut table = Table::new(rows);
        apply_table_style(&mut table);
        sections.push(format!("{}\n{}", header, table));
    }

    let pending = tasks.iter().filter(|t| !t.done).count();
    sections.push(format!(
        "{} task(s), {} pending, across {} project(s)",
        tasks.len(),
        pending,
        groups.len()
    ));
    sections.join("\n\n")
}

pub fn format_project_table(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects yet. Create one with 'toki project add <name>'".to_string();
    }

    let rows: Vec<ProjectDisplay> = projects.iter().map(ProjectDisplay::from).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    table.to_string()
}
