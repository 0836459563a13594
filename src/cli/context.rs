//! Project context detection.
//!
//! Inside a git repository the command line works on the project linked to
//! the repository root, creating one named after the root directory on first
//! use. Outside of any repository it falls back to the `default` project.

use std::path::{Path, PathBuf};

use crate::cli::error::{CliError, CliResult};
use crate::db::{
    DEFAULT_PROJECT_NAME, Database, DbError, DbResult, Project, ProjectRepository,
    normalize_project_path,
};

/// Walk up from `start` looking for a `.git` entry. The result is in stored project-path form.
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    let start = absolute(start);
    let root = start.ancestors().find(|dir| dir.join(".git").exists())?;
    Some(normalize_project_path(root))
}

/// Make `path` absolute against the working directory, then normalize it for storage.
pub fn normalize_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_project_path(path)
    } else {
        normalize_project_path(&cwd.join(path))
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// The project linked to the repository containing `cwd`, if any.
pub async fn detect_project<D: Database>(db: &D, cwd: &Path) -> DbResult<Option<Project>> {
    let Some(root) = find_git_root(cwd) else {
        return Ok(None);
    };
    match db.projects().get_by_path(&path_str(&root)).await {
        Ok(project) => Ok(Some(project)),
        Err(DbError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Look a project up by its name, reporting a miss in CLI terms.
pub async fn project_by_name<D: Database>(db: &D, name: &str) -> CliResult<Project> {
    match db.projects().get_by_name(name).await {
        Ok(project) => Ok(project),
        Err(DbError::NotFound { .. }) => Err(CliError::ProjectNotFound {
            name: name.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Project a new task goes into.
#[derive(Debug)]
pub struct ProjectContext {
    pub project: Project,
    /// The project was created for the current repository just now.
    pub created: bool,
}

/// Pick the project for a command: explicit name, then repository, then `default`.
pub async fn resolve_project<D: Database>(
    db: &D,
    name: Option<&str>,
    cwd: &Path,
) -> CliResult<ProjectContext> {
    if let Some(name) = name {
        let project = project_by_name(db, name).await?;
        return Ok(ProjectContext {
            project,
            created: false,
        });
    }

    let Some(root) = find_git_root(cwd) else {
        let project = db.projects().get_or_create(DEFAULT_PROJECT_NAME).await?;
        return Ok(ProjectContext {
            project,
            created: false,
        });
    };

    let root_str = path_str(&root);
    match db.projects().get_by_path(&root_str).await {
        Ok(project) => Ok(ProjectContext {
            project,
            created: false,
        }),
        Err(DbError::NotFound { .. }) => {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
            let project = Project::new(name.clone(), Some(root_str.clone()));
            match db.projects().create(&project).await {
                Ok(project) => {
                    tracing::info!(name = %project.name, path = %root_str, "Created project for repository");
                    Ok(ProjectContext {
                        project,
                        created: true,
                    })
                }
                Err(DbError::Constraint { .. }) => Err(CliError::UnlinkedRepository {
                    name,
                    root: root_str,
                }),
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}
