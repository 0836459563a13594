//! Tests for the statistics engine.

use chrono::{DateTime, Duration, TimeZone, Utc};
use quickcheck::{Arbitrary, Gen};
use uuid::Uuid;

use super::{NO_PRIORITY_KEY, collect_stats, compute_stats};
use crate::db::{
    Database, Priority, Project, ProjectRepository, SqliteDatabase, Task, TaskRepository,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn task(project: &Project, description: &str, created_days_ago: i64) -> Task {
    let mut t = Task::new(project.id, description);
    t.created_at = now() - Duration::days(created_days_ago);
    t.updated_at = t.created_at;
    t
}

#[test]
fn empty_task_set() {
    let stats = compute_stats(&[], &[], now());
    assert_eq!(stats.summary.total, 0);
    assert!(stats.by_priority.is_empty());
    assert!(stats.by_project.is_empty());
    assert!(stats.oldest_pending.is_none());
}

#[test]
fn counts_status_priority_and_overdue() {
    let p = Project::new("p", None);
    let mut a = task(&p, "a", 3);
    a.priority = Some(Priority::High);
    a.due_date = Some(now() - Duration::days(1));
    let mut b = task(&p, "b", 2);
    b.priority = Some(Priority::High);
    b.mark_done(now());
    let c = task(&p, "c", 1);
    let mut d = task(&p, "d", 1);
    // Due earlier today: not overdue yet.
    d.due_date = Some(now() - Duration::hours(2));

    let stats = compute_stats(&[a, b, c, d], std::slice::from_ref(&p), now());

    assert_eq!(stats.summary.total, 4);
    assert_eq!(stats.summary.pending, 3);
    assert_eq!(stats.summary.completed, 1);
    assert_eq!(stats.summary.overdue, 1);
    assert_eq!(stats.by_priority.get("high"), Some(&2));
    assert_eq!(stats.by_priority.get(NO_PRIORITY_KEY), Some(&2));
    assert_eq!(stats.by_priority.get("low"), None);
}

#[test]
fn completed_past_due_tasks_are_not_overdue() {
    let p = Project::new("p", None);
    let mut t = task(&p, "late but done", 10);
    t.due_date = Some(now() - Duration::days(5));
    t.mark_done(now());

    let stats = compute_stats(&[t], &[p], now());
    assert_eq!(stats.summary.overdue, 0);
}

#[test]
fn projects_sorted_by_count_with_ties_in_scan_order() {
    let small = Project::new("small", None);
    let big = Project::new("big", None);
    let tie = Project::new("tie", None);
    let tasks = vec![
        task(&small, "s1", 1),
        task(&big, "b1", 1),
        task(&tie, "t1", 1),
        task(&big, "b2", 1),
    ];

    let stats = compute_stats(&tasks, &[small.clone(), big.clone(), tie.clone()], now());

    let order: Vec<(&str, usize)> = stats
        .by_project
        .iter()
        .map(|p| (p.project_name.as_str(), p.task_count))
        .collect();
    assert_eq!(order, vec![("big", 2), ("small", 1), ("tie", 1)]);
}

#[test]
fn oldest_pending_ignores_completed_tasks() {
    let p = Project::new("p", None);
    let mut ancient = task(&p, "ancient but done", 30);
    ancient.mark_done(now());
    let old = task(&p, "old", 7);
    let fresh = task(&p, "fresh", 0);

    let stats = compute_stats(&[fresh, ancient, old.clone()], &[p], now());

    let oldest = stats.oldest_pending.expect("pending task exists");
    assert_eq!(oldest.id, old.id);
    assert_eq!(oldest.description, "old");
    assert_eq!(oldest.age_days, 7);
}

#[test]
fn no_pending_tasks_means_no_oldest() {
    let p = Project::new("p", None);
    let mut t = task(&p, "finished", 1);
    t.mark_done(now());
    assert!(compute_stats(&[t], &[p], now()).oldest_pending.is_none());
}

#[derive(Debug, Clone)]
struct Flags(Vec<(bool, u8, i8)>);

impl Arbitrary for Flags {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 40;
        Flags(
            (0..len)
                .map(|_| (bool::arbitrary(g), u8::arbitrary(g), i8::arbitrary(g)))
                .collect(),
        )
    }
}

#[quickcheck_macros::quickcheck]
fn prop_total_is_pending_plus_completed(flags: Flags) -> bool {
    let p = Project::new("p", None);
    let tasks: Vec<Task> = flags
        .0
        .iter()
        .map(|&(done, priority, due_offset)| {
            let mut t = task(&p, "generated", 1);
            t.priority = match priority % 4 {
                0 => None,
                n => Some(Priority::ALL[(n - 1) as usize]),
            };
            t.due_date = Some(now() + Duration::days(due_offset as i64));
            if done {
                t.mark_done(now());
            }
            t
        })
        .collect();

    let stats = compute_stats(&tasks, std::slice::from_ref(&p), now());
    let histogram_total: usize = stats.by_priority.values().sum();
    let project_total: usize = stats.by_project.iter().map(|p| p.task_count).sum();

    stats.summary.total == stats.summary.pending + stats.summary.completed
        && stats.summary.total == tasks.len()
        && stats.summary.overdue <= stats.summary.pending
        && histogram_total == tasks.len()
        && project_total == tasks.len()
}

#[tokio::test(flavor = "multi_thread")]
async fn collect_stats_reflects_latest_writes() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    let p = db
        .projects()
        .create(&Project::new("p", None))
        .await
        .expect("Create should succeed");

    db.tasks()
        .create(&Task::new(p.id, "first"))
        .await
        .expect("Create should succeed");
    let before = collect_stats(&db, Utc::now()).await.expect("stats");
    assert_eq!(before.summary.total, 1);

    db.tasks()
        .create(&Task::new(p.id, "second"))
        .await
        .expect("Create should succeed");
    let after = collect_stats(&db, Utc::now()).await.expect("stats");
    assert_eq!(after.summary.total, 2);
    assert_eq!(after.by_project[0].project_name, "p");
    assert_eq!(after.by_project[0].task_count, 2);
}

#[test]
fn unknown_project_gets_empty_name() {
    let orphan = Task::new(Uuid::new_v4(), "orphan");
    let stats = compute_stats(&[orphan], &[], now());
    assert_eq!(stats.by_project[0].project_name, "");
}
