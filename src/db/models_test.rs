//! Tests for domain models.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::db::models::*;

fn at(y: i32, m: u32, d: u32, h: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[test]
fn priority_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    let parsed: Priority = serde_json::from_str("\"medium\"").unwrap();
    assert_eq!(parsed, Priority::Medium);
}

#[test]
fn priority_from_str_rejects_unknown_values() {
    assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
    let err = "urgent".parse::<Priority>().unwrap_err();
    assert!(err.contains("low, medium, high"));
    assert!("HIGH".parse::<Priority>().is_err());
}

#[test]
fn new_task_is_pending() {
    let task = Task::new(Uuid::new_v4(), "something");
    assert!(!task.done);
    assert!(task.completed_at.is_none());
    assert_eq!(task.created_at, task.updated_at);
}

#[test]
fn completion_flag_and_timestamp_move_together() {
    let mut task = Task::new(Uuid::new_v4(), "toggle");
    let now = at(2025, 5, 1, 9);

    task.mark_done(now);
    assert!(task.done);
    assert_eq!(task.completed_at, Some(now));
    assert_eq!(task.updated_at, now);

    let later = at(2025, 5, 2, 9);
    task.mark_undone(later);
    assert!(!task.done);
    assert!(task.completed_at.is_none());
    assert_eq!(task.updated_at, later);
}

#[test]
fn overdue_is_day_truncated() {
    let mut task = Task::new(Uuid::new_v4(), "due");
    let now = at(2025, 5, 10, 15);

    task.due_date = Some(at(2025, 5, 10, 9));
    assert!(!task.is_overdue(now), "due earlier today is not overdue yet");

    task.due_date = Some(at(2025, 5, 9, 23));
    assert!(task.is_overdue(now));

    task.mark_done(now);
    assert!(!task.is_overdue(now), "completed tasks are never overdue");
}

#[test]
fn task_without_due_date_is_never_overdue() {
    let task = Task::new(Uuid::new_v4(), "someday");
    assert!(!task.is_overdue(Utc::now()));
}

#[test]
fn description_is_trimmed_and_checked() {
    assert_eq!(validate_description("  buy milk "), Ok("buy milk".to_string()));
    assert!(validate_description("  ab  ").is_err());
    assert!(validate_description("").is_err());
}

#[test]
fn due_date_accepts_rfc3339_and_plain_days() {
    assert_eq!(
        parse_due_date("2025-01-31").unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap()
    );
    assert_eq!(
        parse_due_date("2025-01-31T17:00:00+02:00").unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 31, 15, 0, 0).unwrap()
    );
    assert!(parse_due_date("tomorrow").is_err());
}

#[test]
fn labels_are_normalized() {
    assert_eq!(
        normalize_labels(["b", " a", "", "b", "a "]),
        vec!["b".to_string(), "a".to_string()]
    );
}

#[test]
fn short_id_takes_prefix() {
    let mut task = Task::new(Uuid::new_v4(), "id");
    task.id = Uuid::parse_str("0123abcd-0000-4000-8000-000000000000").unwrap();
    assert_eq!(task.short_id(6), "0123ab");
}

#[test]
fn empty_query_has_no_predicates() {
    assert!(TaskQuery::default().is_empty());
    assert!(
        !TaskQuery {
            done: Some(false),
            ..Default::default()
        }
        .is_empty()
    );
}

#[test]
fn missing_project_paths_are_cleaned_lexically() {
    use std::path::{Path, PathBuf};

    let base = "/nonexistent-toki-root/work/repo";
    assert_eq!(
        normalize_project_path(Path::new("/nonexistent-toki-root/work/repo/")),
        PathBuf::from(base)
    );
    assert_eq!(
        normalize_project_path(Path::new("/nonexistent-toki-root/work/./other/../repo")),
        PathBuf::from(base)
    );
}

#[test]
fn existing_project_paths_are_canonicalized() {
    let dir = tempfile::tempdir().expect("tempdir");
    let canonical = dir.path().canonicalize().expect("canonicalize");

    let with_detour = dir.path().join("sub").join("..");
    std::fs::create_dir(dir.path().join("sub")).expect("mkdir");
    assert_eq!(normalize_project_path(&with_detour), canonical);
}
