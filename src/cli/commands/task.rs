use std::path::Path;

use chrono::{DateTime, Utc};
use tabled::builder::Builder;

use crate::cli::context::{detect_project, project_by_name, resolve_project};
use crate::cli::error::{CliError, CliResult};
use crate::cli::format::{format_due, format_task, format_task_table};
use crate::cli::utils::{apply_table_style, format_labels, parse_labels};
use crate::db::{
    Database, Priority, ProjectRepository, Task, TaskQuery, TaskRepository, parse_due_date,
    resolve_task, validate_description,
};

/// Options for `toki add`
#[derive(Debug, Default)]
pub struct AddOptions<'a> {
    pub project: Option<&'a str>,
    pub priority: Option<Priority>,
    pub labels: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub due: Option<&'a str>,
}

/// Create a task in the project picked from the flag or the working directory.
pub async fn add_task<D: Database>(
    db: &D,
    description: &str,
    options: AddOptions<'_>,
    cwd: &Path,
    now: DateTime<Utc>,
) -> CliResult<String> {
    let description = validate_description(description).map_err(CliError::invalid_input)?;
    let due_date = options
        .due
        .map(parse_due_date)
        .transpose()
        .map_err(CliError::invalid_input)?;

    let context = resolve_project(db, options.project, cwd).await?;

    let mut task = Task::new(context.project.id, description);
    task.priority = options.priority;
    task.notes = options
        .notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    task.due_date = due_date;
    task.labels = parse_labels(options.labels);

    let created = db.tasks().create(&task).await?;

    let mut out = String::new();
    if context.created {
        out.push_str(&format!("✓ Created project '{}'\n", context.project.name));
    }
    out.push_str(&format!(
        "✓ Added task to '{}'\n{}",
        context.project.name,
        format_task(&created, now)
    ));
    Ok(out)
}

/// Filters for `toki list`
#[derive(Debug, Default)]
pub struct ListFilter<'a> {
    pub project: Option<&'a str>,
    /// Ignore the repository context and list every project.
    pub all_projects: bool,
    pub done: Option<bool>,
    pub priority: Option<Priority>,
    pub label: Option<&'a str>,
    pub overdue: bool,
}

/// List tasks. Inside a linked repository only that project is shown unless
/// another project or `all_projects` is requested.
pub async fn list_tasks<D: Database>(
    db: &D,
    filter: ListFilter<'_>,
    cwd: &Path,
    now: DateTime<Utc>,
    format: &str,
) -> CliResult<String> {
    let project_id = match filter.project {
        Some(name) => Some(project_by_name(db, name).await?.id),
        None if filter.all_projects => None,
        None => detect_project(db, cwd).await?.map(|p| p.id),
    };

    let query = TaskQuery {
        project_id,
        done: if filter.overdue { Some(false) } else { filter.done },
        priority: filter.priority,
        label: filter.label.map(|l| l.trim().to_lowercase()),
    };

    let mut tasks = db.tasks().list(&query).await?;
    if filter.overdue {
        tasks.retain(|t| t.is_overdue(now));
    }

    match format {
        "json" => Ok(serde_json::to_string_pretty(&tasks)?),
        _ => {
            let projects = db.projects().list().await?;
            Ok(format_task_table(&tasks, &projects, now))
        }
    }
}

/// Show every field of one task.
pub async fn show_task<D: Database>(
    db: &D,
    id: &str,
    now: DateTime<Utc>,
    format: &str,
) -> CliResult<String> {
    let task = resolve_task(&db.tasks(), id).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&task)?),
        _ => {
            let project = db.projects().get(task.project_id).await?;
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            builder.push_record(["ID", &task.id.to_string()]);
            builder.push_record(["Project", &project.name]);
            builder.push_record(["Description", &task.description]);
            builder.push_record(["Done", if task.done { "yes" } else { "no" }]);
            builder.push_record([
                "Priority",
                task.priority.map(|p| p.as_str()).unwrap_or("-"),
            ]);
            builder.push_record(["Notes", task.notes.as_deref().unwrap_or("-")]);
            builder.push_record([
                "Due",
                &format_due(&task, now).unwrap_or_else(|| "-".to_string()),
            ]);
            builder.push_record(["Labels", &format_labels(&task.labels)]);
            builder.push_record(["Created", &task.created_at.to_rfc3339()]);
            builder.push_record(["Updated", &task.updated_at.to_rfc3339()]);
            builder.push_record([
                "Completed",
                &task
                    .completed_at
                    .map(|c| c.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string()),
            ]);

            let mut table = builder.build();
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Mark each task done, stopping at the first id that does not resolve.
pub async fn done_tasks<D: Database>(
    db: &D,
    ids: &[String],
    now: DateTime<Utc>,
) -> CliResult<String> {
    let mut lines = Vec::new();
    for id in ids {
        let mut task = resolve_task(&db.tasks(), id).await?;
        task.mark_done(now);
        let task = db.tasks().update(&task).await?;
        lines.push(format!("✓ Marked done: {}", format_task(&task, now)));
    }
    Ok(lines.join("\n"))
}

pub async fn undone_tasks<D: Database>(
    db: &D,
    ids: &[String],
    now: DateTime<Utc>,
) -> CliResult<String> {
    let mut lines = Vec::new();
    for id in ids {
        let mut task = resolve_task(&db.tasks(), id).await?;
        task.mark_undone(now);
        let task = db.tasks().update(&task).await?;
        lines.push(format!("✓ Marked not done: {}", format_task(&task, now)));
    }
    Ok(lines.join("\n"))
}

pub async fn remove_task<D: Database>(db: &D, id: &str) -> CliResult<String> {
    let task = resolve_task(&db.tasks(), id).await?;
    db.tasks().delete(task.id).await?;
    Ok(format!("✓ Removed task: {}", task.description))
}

/// Changes for `toki edit`. An empty `notes` clears the notes.
#[derive(Debug, Default)]
pub struct EditOptions<'a> {
    pub description: Option<&'a str>,
    pub priority: Option<Priority>,
    pub notes: Option<&'a str>,
    pub due: Option<&'a str>,
}

pub async fn edit_task<D: Database>(
    db: &D,
    id: &str,
    options: EditOptions<'_>,
    now: DateTime<Utc>,
) -> CliResult<String> {
    if options.description.is_none()
        && options.priority.is_none()
        && options.notes.is_none()
        && options.due.is_none()
    {
        return Err(CliError::invalid_input(
            "Nothing to change: pass --description, --priority, --notes or --due",
        ));
    }

    let mut task = resolve_task(&db.tasks(), id).await?;
    if let Some(description) = options.description {
        task.description = validate_description(description).map_err(CliError::invalid_input)?;
    }
    if let Some(priority) = options.priority {
        task.priority = Some(priority);
    }
    if let Some(notes) = options.notes {
        let notes = notes.trim();
        task.notes = (!notes.is_empty()).then(|| notes.to_string());
    }
    if let Some(due) = options.due {
        task.due_date = Some(parse_due_date(due).map_err(CliError::invalid_input)?);
    }

    let task = db.tasks().update(&task).await?;
    Ok(format!("✓ Updated task\n{}", format_task(&task, now)))
}
