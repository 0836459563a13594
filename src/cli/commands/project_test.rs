use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::cli::commands::project::*;
use crate::cli::error::CliError;
use crate::db::{Database, DbError, ProjectRepository, SqliteDatabase};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_project_normalizes_relative_path() {
    let db = setup_db().await;
    let tmp = TempDir::new().expect("temp dir");
    fs::create_dir_all(tmp.path().join("code")).expect("create dir");
    let cwd = tmp.path().canonicalize().expect("canonical cwd");

    let output = add_project(&db, "code", Some(Path::new("code")), &cwd)
        .await
        .expect("add should succeed");
    assert!(output.contains("Created project 'code'"));

    let project = db
        .projects()
        .get_by_name("code")
        .await
        .expect("project exists");
    assert_eq!(
        project.directory_path,
        Some(cwd.join("code").to_string_lossy().into_owned())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_duplicate_project_fails() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");

    add_project(&db, "dup", None, cwd.path())
        .await
        .expect("add should succeed");
    let err = add_project(&db, "dup", None, cwd.path())
        .await
        .expect_err("duplicate must fail");
    assert!(matches!(err, CliError::Db(DbError::Constraint { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_projects_table_and_json() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");

    let empty = list_projects(&db, "table").await.expect("list");
    assert!(empty.contains("No projects yet"));

    add_project(&db, "alpha", None, cwd.path())
        .await
        .expect("add should succeed");
    let table = list_projects(&db, "table").await.expect("list");
    assert!(table.contains("alpha"));

    let json = list_projects(&db, "json").await.expect("list");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("json output");
    assert_eq!(parsed[0]["name"], "alpha");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_link_project_uses_repository_root() {
    let db = setup_db().await;
    let tmp = TempDir::new().expect("temp dir");
    let root = tmp.path().join("repo");
    fs::create_dir_all(root.join(".git")).expect("create .git");
    fs::create_dir_all(root.join("nested")).expect("create dir");
    let root = root.canonicalize().expect("canonical root");

    add_project(&db, "repo", None, tmp.path())
        .await
        .expect("add should succeed");
    link_project(&db, "repo", None, &root.join("nested"))
        .await
        .expect("link should succeed");

    let linked = db
        .projects()
        .get_by_path(&root.to_string_lossy())
        .await
        .expect("project found by path");
    assert_eq!(linked.name, "repo");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_project() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");
    add_project(&db, "gone", None, cwd.path())
        .await
        .expect("add should succeed");

    remove_project(&db, "gone").await.expect("remove should succeed");
    let err = remove_project(&db, "gone")
        .await
        .expect_err("second remove must fail");
    assert!(matches!(err, CliError::ProjectNotFound { .. }));
}
