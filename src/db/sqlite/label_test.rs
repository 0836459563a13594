//! Tests for SqliteLabelRepository.

use uuid::Uuid;

use crate::db::{
    Database, DbError, LabelRepository, Project, ProjectRepository, SqliteDatabase, Task,
    TaskRepository,
};

async fn setup_with_task() -> (SqliteDatabase, Task) {
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
    (db, task)
}

async fn link_count(db: &SqliteDatabase, task: &Task) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM task_labels WHERE task_id = ?")
        .bind(task.id.to_string())
        .fetch_one(db.pool())
        .await
        .expect("Count should succeed")
}

#[tokio::test(flavor = "multi_thread")]
async fn get_or_create_is_deduplicated() {
    let (db, _) = setup_with_task().await;

    let first = db.labels().get_or_create("bug").await.expect("create");
    let second = db.labels().get_or_create("  bug ").await.expect("lookup");

    assert_eq!(first, second);
    assert_eq!(db.labels().list().await.expect("list").len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_label_name_is_rejected() {
    let (db, task) = setup_with_task().await;
    assert!(matches!(
        db.labels().add_to_task(task.id, "   ").await,
        Err(DbError::Validation { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn adding_same_label_twice_leaves_one_association() {
    let (db, task) = setup_with_task().await;

    db.labels().add_to_task(task.id, "urgent").await.expect("first add");
    db.labels().add_to_task(task.id, "urgent").await.expect("second add");

    assert_eq!(link_count(&db, &task).await, 1);
    assert_eq!(
        db.labels().for_task(task.id).await.expect("for_task"),
        vec!["urgent"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn add_label_refreshes_task_timestamp() {
    let (db, task) = setup_with_task().await;

    db.labels().add_to_task(task.id, "later").await.expect("add");

    let reloaded = db.tasks().get(task.id).await.expect("get");
    assert!(reloaded.updated_at >= task.updated_at);
    assert_eq!(reloaded.labels, vec!["later"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_label_keeps_the_label_itself() {
    let (db, task) = setup_with_task().await;
    db.labels().add_to_task(task.id, "temp").await.expect("add");

    db.labels()
        .remove_from_task(task.id, "temp")
        .await
        .expect("remove");

    assert_eq!(link_count(&db, &task).await, 0);
    let names: Vec<String> = db
        .labels()
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, vec!["temp"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn removing_absent_label_is_harmless() {
    let (db, task) = setup_with_task().await;
    db.labels()
        .remove_from_task(task.id, "never-added")
        .await
        .expect("remove should succeed silently");
}

#[tokio::test(flavor = "multi_thread")]
async fn label_operations_on_missing_task_return_not_found() {
    let (db, _) = setup_with_task().await;
    let ghost = Uuid::new_v4();

    assert!(matches!(
        db.labels().add_to_task(ghost, "x").await,
        Err(DbError::NotFound { .. })
    ));
    assert!(matches!(
        db.labels().remove_from_task(ghost, "x").await,
        Err(DbError::NotFound { .. })
    ));
    // The failed add rolled back, so no label was left behind.
    assert!(db.labels().list().await.expect("list").is_empty());
}
