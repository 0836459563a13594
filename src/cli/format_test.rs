//! Tests for task and project rendering.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::cli::format::*;
use crate::db::{Priority, Project, Task};

fn task(description: &str) -> Task {
    let mut task = Task::new(Uuid::new_v4(), description);
    task.id = Uuid::parse_str("abcdef12-0000-4000-8000-000000000001").expect("valid uuid");
    task
}

#[test]
fn due_yesterday_is_marked_overdue() {
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let mut t = task("file taxes");
    t.due_date = Some(now - Duration::days(1));

    assert_eq!(format_due(&t, now).as_deref(), Some("2025-03-09 (overdue)"));
}

#[test]
fn due_earlier_today_is_not_overdue() {
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
    let mut t = task("file taxes");
    t.due_date = Some(Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());

    assert_eq!(format_due(&t, now).as_deref(), Some("2025-03-10"));
}

#[test]
fn done_task_is_never_overdue() {
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let mut t = task("file taxes");
    t.due_date = Some(now - Duration::days(3));
    t.mark_done(now);

    assert_eq!(format_due(&t, now).as_deref(), Some("2025-03-07"));
}

#[test]
fn format_task_shows_short_id_priority_and_metadata() {
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let mut t = task("buy milk");
    t.priority = Some(Priority::High);
    t.labels = vec!["home".to_string(), "shop".to_string()];

    let out = format_task(&t, now);
    assert!(out.starts_with("  abcdef  [HIGH] buy milk"), "{}", out);
    assert!(out.contains("Labels: home, shop"));
    assert!(!out.contains("Due:"));
}

#[test]
fn table_groups_by_project() {
    let now = Utc::now();
    let alpha = Project::new("alpha", Some("/src/alpha".to_string()));
    let beta = Project::new("beta", None);
    let tasks = vec![
        Task::new(alpha.id, "first"),
        Task::new(beta.id, "second"),
        Task::new(alpha.id, "third"),
    ];

    let out = format_task_table(&tasks, &[alpha, beta], now);
    assert!(out.contains("PROJECT: alpha (/src/alpha)"));
    assert!(out.contains("PROJECT: beta"));
    assert!(out.contains("3 task(s), 3 pending, across 2 project(s)"));
    assert!(out.find("first") < out.find("second"));
}

#[test]
fn empty_listings_have_hints() {
    assert!(format_task_table(&[], &[], Utc::now()).contains("toki add"));
    assert!(format_project_table(&[]).contains("toki project add"));
}
