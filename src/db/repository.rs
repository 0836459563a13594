//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//! Every returned future is `Send` so handlers generic over [`Database`]
//! can run on a multi-threaded runtime.

use std::future::Future;

use uuid::Uuid;

use crate::db::{
    DbResult,
    models::{Label, Project, Task, TaskQuery},
};

/// Repository for Project operations.
pub trait ProjectRepository {
    /// Create a new project. Fails with a constraint error on a duplicate name.
    fn create(&self, project: &Project) -> impl Future<Output = DbResult<Project>> + Send;

    /// Get a project by ID.
    fn get(&self, id: Uuid) -> impl Future<Output = DbResult<Project>> + Send;

    /// Get a project by its unique name.
    fn get_by_name(&self, name: &str) -> impl Future<Output = DbResult<Project>> + Send;

    /// Get the project associated with a directory.
    fn get_by_path(&self, path: &str) -> impl Future<Output = DbResult<Project>> + Send;

    /// Get all projects ordered by name.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Project>>> + Send;

    /// Update name and directory of an existing project.
    fn update(&self, project: &Project) -> impl Future<Output = DbResult<Project>> + Send;

    /// Delete a project and, by cascade, its tasks and their label links.
    fn delete(&self, id: Uuid) -> impl Future<Output = DbResult<()>> + Send;

    /// Look up a project by name, creating it when absent.
    fn get_or_create(&self, name: &str) -> impl Future<Output = DbResult<Project>> + Send;
}

/// Repository for Task operations.
pub trait TaskRepository {
    /// Create a task together with its labels.
    fn create(&self, task: &Task) -> impl Future<Output = DbResult<Task>> + Send;

    /// Get a task by ID.
    fn get(&self, id: Uuid) -> impl Future<Output = DbResult<Task>> + Send;

    /// Get every task whose canonical id starts with `prefix` (case-sensitive).
    fn find_by_prefix(&self, prefix: &str) -> impl Future<Output = DbResult<Vec<Task>>> + Send;

    /// List tasks matching all supplied predicates, newest first.
    fn list(&self, query: &TaskQuery) -> impl Future<Output = DbResult<Vec<Task>>> + Send;

    /// Persist field changes and refresh `updated_at`. Labels are not touched.
    fn update(&self, task: &Task) -> impl Future<Output = DbResult<Task>> + Send;

    /// Delete a task by ID.
    fn delete(&self, id: Uuid) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for Label operations.
pub trait LabelRepository {
    /// Look up a label by name, creating it when absent.
    fn get_or_create(&self, name: &str) -> impl Future<Output = DbResult<Label>> + Send;

    /// Get all labels ordered by name.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Label>>> + Send;

    /// Attach a label to a task. Attaching twice leaves a single link.
    fn add_to_task(&self, task_id: Uuid, name: &str)
    -> impl Future<Output = DbResult<()>> + Send;

    /// Detach a label from a task. The label itself is kept.
    fn remove_from_task(
        &self,
        task_id: Uuid,
        name: &str,
    ) -> impl Future<Output = DbResult<()>> + Send;

    /// Label names attached to a task, sorted.
    fn for_task(&self, task_id: Uuid) -> impl Future<Output = DbResult<Vec<String>>> + Send;
}

/// Combined database interface.
///
/// Repositories are handed out through associated types, avoiding dynamic dispatch.
pub trait Database: Send + Sync {
    type Projects<'a>: ProjectRepository + Send + Sync
    where
        Self: 'a;
    type Tasks<'a>: TaskRepository + Send + Sync
    where
        Self: 'a;
    type Labels<'a>: LabelRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the project repository.
    fn projects(&self) -> Self::Projects<'_>;

    /// Get the task repository.
    fn tasks(&self) -> Self::Tasks<'_>;

    /// Get the label repository.
    fn labels(&self) -> Self::Labels<'_>;
}
