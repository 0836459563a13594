use std::path::Path;

use crate::cli::context::{find_git_root, normalize_path, project_by_name};
use crate::cli::error::CliResult;
use crate::cli::format::format_project_table;
use crate::db::{Database, Project, ProjectRepository};

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Create a project, optionally tied to a directory.
pub async fn add_project<D: Database>(
    db: &D,
    name: &str,
    path: Option<&Path>,
    cwd: &Path,
) -> CliResult<String> {
    let directory = path.map(|p| path_string(&normalize_path(p, cwd)));
    let project = db
        .projects()
        .create(&Project::new(name.trim(), directory))
        .await?;

    let mut out = format!("✓ Created project '{}'", project.name);
    if let Some(path) = &project.directory_path {
        out.push_str(&format!("\n  Path: {}", path));
    }
    Ok(out)
}

pub async fn list_projects<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let projects = db.projects().list().await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&projects)?),
        _ => Ok(format_project_table(&projects)),
    }
}

/// Delete a project together with all of its tasks.
pub async fn remove_project<D: Database>(db: &D, name: &str) -> CliResult<String> {
    let project = project_by_name(db, name).await?;
    db.projects().delete(project.id).await?;
    Ok(format!("✓ Removed project '{}' and its tasks", project.name))
}

/// Tie an existing project to a directory: the given path, else the
/// repository root around `cwd`, else `cwd` itself.
pub async fn link_project<D: Database>(
    db: &D,
    name: &str,
    path: Option<&Path>,
    cwd: &Path,
) -> CliResult<String> {
    let mut project = project_by_name(db, name).await?;
    let directory = match path {
        Some(p) => normalize_path(p, cwd),
        None => find_git_root(cwd).unwrap_or_else(|| normalize_path(cwd, cwd)),
    };
    project.directory_path = Some(path_string(&directory));

    let project = db.projects().update(&project).await?;
    Ok(format!(
        "✓ Linked project '{}' to {}",
        project.name,
        project.directory_path.as_deref().unwrap_or("-")
    ))
}
