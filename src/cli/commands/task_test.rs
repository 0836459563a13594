use std::fs;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use crate::cli::commands::task::*;
use crate::cli::error::CliError;
use crate::db::{
    Database, DbError, Priority, Project, ProjectRepository, SqliteDatabase, TaskQuery,
    TaskRepository,
};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db.projects()
        .create(&Project::new("work", None))
        .await
        .expect("Create project should succeed");
    db
}

fn work() -> AddOptions<'static> {
    AddOptions {
        project: Some("work"),
        ..Default::default()
    }
}

async fn only_task_id(db: &SqliteDatabase) -> String {
    let tasks = db
        .tasks()
        .list(&TaskQuery::default())
        .await
        .expect("list should succeed");
    assert_eq!(tasks.len(), 1);
    tasks[0].short_id(6)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_task_with_metadata() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");

    let output = add_task(
        &db,
        "write the report",
        AddOptions {
            project: Some("work"),
            priority: Some(Priority::High),
            labels: Some("Docs, urgent"),
            notes: Some("  due friday  "),
            due: Some("2030-01-31"),
        },
        cwd.path(),
        Utc::now(),
    )
    .await
    .expect("add should succeed");
    assert!(output.contains("Added task to 'work'"));
    assert!(output.contains("[HIGH] write the report"));

    let tasks = db
        .tasks()
        .list(&TaskQuery::default())
        .await
        .expect("list should succeed");
    let task = &tasks[0];
    assert_eq!(task.labels, vec!["docs", "urgent"]);
    assert_eq!(task.notes.as_deref(), Some("due friday"));
    assert_eq!(
        task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        Some("2030-01-31".to_string())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_task_rejects_short_description() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");

    let err = add_task(&db, "ab", work(), cwd.path(), Utc::now())
        .await
        .expect_err("short description must fail");
    assert!(matches!(err, CliError::InvalidInput { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_task_in_repository_creates_project() {
    let db = setup_db().await;
    let tmp = TempDir::new().expect("temp dir");
    let root = tmp.path().join("toki-repo");
    fs::create_dir_all(root.join(".git")).expect("create .git");

    let output = add_task(&db, "fix the build", AddOptions::default(), &root, Utc::now())
        .await
        .expect("add should succeed");
    assert!(output.contains("Created project 'toki-repo'"), "{}", output);

    let project = db
        .projects()
        .get_by_name("toki-repo")
        .await
        .expect("repository project exists");
    assert!(project.directory_path.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_done_and_undone_by_prefix() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");
    add_task(&db, "buy milk", work(), cwd.path(), Utc::now())
        .await
        .expect("add should succeed");
    let id = only_task_id(&db).await;

    let output = done_tasks(&db, &[id.clone()], Utc::now())
        .await
        .expect("done should succeed");
    assert!(output.contains("Marked done"));
    let listed = db
        .tasks()
        .list(&TaskQuery {
            done: Some(true),
            ..Default::default()
        })
        .await
        .expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert!(listed[0].completed_at.is_some());

    undone_tasks(&db, &[id], Utc::now())
        .await
        .expect("undone should succeed");
    let tasks = db
        .tasks()
        .list(&TaskQuery::default())
        .await
        .expect("list should succeed");
    assert!(!tasks[0].done);
    assert!(tasks[0].completed_at.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_done_with_unknown_prefix_is_not_found() {
    let db = setup_db().await;

    let err = done_tasks(&db, &["ffffff".to_string()], Utc::now())
        .await
        .expect_err("unknown prefix must fail");
    assert!(matches!(err, CliError::Db(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_tasks_filters_and_formats() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");
    let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d").to_string();

    add_task(
        &db,
        "late one",
        AddOptions {
            project: Some("work"),
            due: Some(yesterday.as_str()),
            ..Default::default()
        },
        cwd.path(),
        Utc::now(),
    )
    .await
    .expect("add should succeed");
    add_task(
        &db,
        "on time",
        AddOptions {
            project: Some("work"),
            labels: Some("home"),
            ..Default::default()
        },
        cwd.path(),
        Utc::now(),
    )
    .await
    .expect("add should succeed");

    let table = list_tasks(
        &db,
        ListFilter {
            all_projects: true,
            ..Default::default()
        },
        cwd.path(),
        Utc::now(),
        "table",
    )
    .await
    .expect("list should succeed");
    assert!(table.contains("PROJECT: work"));
    assert!(table.contains("(overdue)"));
    assert!(table.contains("2 task(s), 2 pending"));

    let overdue = list_tasks(
        &db,
        ListFilter {
            all_projects: true,
            overdue: true,
            ..Default::default()
        },
        cwd.path(),
        Utc::now(),
        "json",
    )
    .await
    .expect("list should succeed");
    let overdue: serde_json::Value = serde_json::from_str(&overdue).expect("json output");
    assert_eq!(overdue.as_array().map(|a| a.len()), Some(1));
    assert_eq!(overdue[0]["description"], "late one");

    let labelled = list_tasks(
        &db,
        ListFilter {
            project: Some("work"),
            label: Some("HOME"),
            ..Default::default()
        },
        cwd.path(),
        Utc::now(),
        "json",
    )
    .await
    .expect("list should succeed");
    let labelled: serde_json::Value = serde_json::from_str(&labelled).expect("json output");
    assert_eq!(labelled[0]["description"], "on time");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_edit_and_show_task() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");
    add_task(&db, "rough draft", work(), cwd.path(), Utc::now())
        .await
        .expect("add should succeed");
    let id = only_task_id(&db).await;

    let err = edit_task(&db, &id, EditOptions::default(), Utc::now())
        .await
        .expect_err("empty edit must fail");
    assert!(matches!(err, CliError::InvalidInput { .. }));

    edit_task(
        &db,
        &id,
        EditOptions {
            description: Some("final draft"),
            priority: Some(Priority::Medium),
            notes: Some("send to Ana"),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .expect("edit should succeed");

    let shown = show_task(&db, &id, Utc::now(), "table")
        .await
        .expect("show should succeed");
    assert!(shown.contains("final draft"));
    assert!(shown.contains("medium"));
    assert!(shown.contains("send to Ana"));
    assert!(shown.contains("work"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_task() {
    let db = setup_db().await;
    let cwd = TempDir::new().expect("temp dir");
    add_task(&db, "temporary", work(), cwd.path(), Utc::now())
        .await
        .expect("add should succeed");
    let id = only_task_id(&db).await;

    let output = remove_task(&db, &id).await.expect("remove should succeed");
    assert!(output.contains("temporary"));
    assert!(
        db.tasks()
            .list(&TaskQuery::default())
            .await
            .expect("list should succeed")
            .is_empty()
    );
}
