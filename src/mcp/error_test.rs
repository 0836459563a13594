//! Tests for structured tool errors.

use rmcp::model::RawContent;
use serde_json::{Value, json};

use crate::db::DbError;
use crate::mcp::error::ToolError;

#[test]
fn not_found_carries_listing_hint() {
    let err = ToolError::from(DbError::not_found("Task", "abcdef"));

    assert_eq!(err.kind(), "not_found");
    assert_eq!(
        err.to_json(),
        json!({
            "error": {
                "kind": "not_found",
                "message": "Task 'abcdef' not found",
                "hint": "Use list_tasks to see available tasks",
            }
        })
    );
}

#[test]
fn ambiguous_lists_candidates() {
    let err = ToolError::from(DbError::Ambiguous {
        prefix: "abcdef".to_string(),
        candidates: vec!["abcdef01".to_string(), "abcdef02".to_string()],
    });

    let body = err.to_json();
    assert_eq!(body["error"]["kind"], "ambiguous");
    assert_eq!(body["error"]["candidates"], json!(["abcdef01", "abcdef02"]));
    let message = body["error"]["message"].as_str().expect("message");
    assert!(message.contains("abcdef01"));
    assert!(message.contains("abcdef02"));
}

#[test]
fn store_errors_map_to_kinds() {
    let cases = [
        (
            DbError::Constraint {
                message: "a project with this name already exists".to_string(),
            },
            "constraint",
        ),
        (
            DbError::Contention {
                message: "database is locked".to_string(),
            },
            "contention",
        ),
        (
            DbError::Validation {
                message: "too short".to_string(),
            },
            "validation",
        ),
        (
            DbError::Database {
                message: "disk I/O error".to_string(),
            },
            "internal",
        ),
    ];

    for (db_err, kind) in cases {
        assert_eq!(ToolError::from(db_err).kind(), kind);
    }
}

#[test]
fn call_result_is_flagged_as_error() {
    let result = ToolError::validation("Missing required parameter 'task_id'").into_call_result();

    assert_eq!(result.is_error, Some(true));
    assert_eq!(result.content.len(), 1);
    let text = match &result.content[0].raw {
        RawContent::Text(text) => text.text.as_str(),
        _ => panic!("Expected text content"),
    };
    let body: Value = serde_json::from_str(text).expect("error body is JSON");
    assert_eq!(body["error"]["kind"], "validation");
    assert!(body["error"].get("hint").is_none());
}
