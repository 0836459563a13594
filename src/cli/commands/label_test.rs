use chrono::Utc;

use crate::cli::commands::label::*;
use crate::cli::error::CliError;
use crate::db::{Database, Project, ProjectRepository, SqliteDatabase, Task, TaskRepository};

async fn setup() -> (SqliteDatabase, String) {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    let project = db
        .projects()
        .create(&Project::new("p", None))
        .await
        .expect("Create project should succeed");
    let task = db
        .tasks()
        .create(&Task::new(project.id, "label me"))
        .await
        .expect("Create task should succeed");
    (db, task.short_id(8))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_label_lowercases_and_is_idempotent() {
    let (db, id) = setup().await;

    add_label(&db, &id, "Urgent", Utc::now())
        .await
        .expect("add should succeed");
    let output = add_label(&db, &id, "urgent", Utc::now())
        .await
        .expect("add should succeed");
    assert!(output.contains("Labels: urgent"), "{}", output);

    let listed = list_labels(&db, "json").await.expect("list");
    let parsed: serde_json::Value = serde_json::from_str(&listed).expect("json output");
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(1));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_label() {
    let (db, id) = setup().await;
    add_label(&db, &id, "home", Utc::now())
        .await
        .expect("add should succeed");

    let output = remove_label(&db, &id, "HOME", Utc::now())
        .await
        .expect("remove should succeed");
    assert!(!output.contains("Labels:"), "{}", output);

    let table = list_labels(&db, "table").await.expect("list");
    assert!(table.contains("home"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blank_label_is_rejected() {
    let (db, id) = setup().await;

    let err = add_label(&db, &id, "   ", Utc::now())
        .await
        .expect_err("blank label must fail");
    assert!(matches!(err, CliError::InvalidInput { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_labels_empty() {
    let (db, _id) = setup().await;
    let table = list_labels(&db, "table").await.expect("list");
    assert_eq!(table, "No labels yet.");
}
