//! Structured tool errors.
//!
//! A failed tool call is still a completed call: the error travels back as a
//! `CallToolResult` flagged `is_error`, whose text is a JSON object
//! `{"error": {"kind", "message", ...}}`. Protocol-level failures (unknown
//! tool, unknown resource) use rmcp's own error type instead.

use miette::Diagnostic;
use rmcp::model::{CallToolResult, Content};
use serde_json::{Value, json};
use thiserror::Error;

use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum ToolError {
    #[error("{message}")]
    #[diagnostic(code(toki::mcp::validation))]
    Validation { message: String },

    #[error("{message}")]
    #[diagnostic(code(toki::mcp::not_found))]
    NotFound {
        message: String,
        hint: Option<String>,
    },

    #[error("Id prefix '{prefix}' is ambiguous, it matches: {}", .candidates.join(", "))]
    #[diagnostic(code(toki::mcp::ambiguous))]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(toki::mcp::constraint))]
    Constraint { message: String },

    #[error("{message}")]
    #[diagnostic(code(toki::mcp::contention))]
    Contention { message: String },

    #[error("{message}")]
    #[diagnostic(code(toki::mcp::internal))]
    Internal { message: String },
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation { .. } => "validation",
            ToolError::NotFound { .. } => "not_found",
            ToolError::Ambiguous { .. } => "ambiguous",
            ToolError::Constraint { .. } => "constraint",
            ToolError::Contention { .. } => "contention",
            ToolError::Internal { .. } => "internal",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match self {
            ToolError::NotFound {
                hint: Some(hint), ..
            } => {
                body["hint"] = json!(hint);
            }
            ToolError::Ambiguous { candidates, .. } => {
                body["candidates"] = json!(candidates);
                body["hint"] = json!("Retry with a longer prefix of one of the candidates");
            }
            ToolError::Contention { .. } => {
                body["hint"] = json!("The database is busy; retry the same call");
            }
            _ => {}
        }
        json!({ "error": body })
    }

    pub fn into_call_result(self) -> CallToolResult {
        let text = serde_json::to_string_pretty(&self.to_json())
            .unwrap_or_else(|_| format!("{{\"error\":{{\"message\":\"{}\"}}}}", self.kind()));
        CallToolResult::error(vec![Content::text(text)])
    }
}

/// Which listing tool helps a caller recover from a miss.
fn listing_hint(entity_type: &str) -> Option<String> {
    let tool = match entity_type {
        "Task" => "list_tasks",
        "Project" => "list_projects",
        "Label" => "list_labels",
        _ => return None,
    };
    Some(format!(
        "Use {} to see available {}s",
        tool,
        entity_type.to_lowercase()
    ))
}

impl From<DbError> for ToolError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity_type, id } => ToolError::NotFound {
                message: format!("{} '{}' not found", entity_type, id),
                hint: listing_hint(&entity_type),
            },
            DbError::Ambiguous { prefix, candidates } => {
                ToolError::Ambiguous { prefix, candidates }
            }
            DbError::Validation { message } => ToolError::Validation { message },
            DbError::Constraint { message } => ToolError::Constraint { message },
            DbError::Contention { message } => ToolError::Contention { message },
            other => {
                tracing::error!(error = %other, "Tool call failed");
                ToolError::Internal {
                    message: other.to_string(),
                }
            }
        }
    }
}
