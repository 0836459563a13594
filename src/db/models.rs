//! Domain models for the toki database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum length of a trimmed task description.
pub const MIN_DESCRIPTION_LEN: usize = 3;

/// Name of the project tasks fall back to when none is given.
pub const DEFAULT_PROJECT_NAME: &str = "default";

// =============================================================================
// Query Types
// =============================================================================

/// Query for Tasks. Every supplied predicate is AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Filter by owning project.
    pub project_id: Option<Uuid>,
    /// Filter by completion flag.
    pub done: Option<bool>,
    /// Filter by priority.
    pub priority: Option<Priority>,
    /// Filter by label name (exact match).
    pub label: Option<String>,
}

impl TaskQuery {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A named container for tasks, optionally tied to a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub directory_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, directory_path: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            directory_path,
            created_at: Utc::now(),
        }
    }
}

/// A unit of work owned by exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub description: String,
    pub done: bool,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Label names, sorted.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Task {
    pub fn new(project_id: Uuid, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            description: description.into(),
            done: false,
            priority: None,
            notes: None,
            due_date: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            labels: Vec::new(),
        }
    }

    /// Completion flag and timestamp always move together.
    pub fn mark_done(&mut self, now: DateTime<Utc>) {
        self.done = true;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    pub fn mark_undone(&mut self, now: DateTime<Utc>) {
        self.done = false;
        self.completed_at = None;
        self.updated_at = now;
    }

    /// A task is overdue once its due day (UTC) lies strictly before today.
    /// Anything due today is not overdue yet.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) if !self.done => due.date_naive() < now.date_naive(),
            _ => false,
        }
    }

    /// First characters of the id, as shown in listings.
    pub fn short_id(&self, len: usize) -> String {
        self.id.to_string().chars().take(len).collect()
    }
}

/// A globally scoped, deduplicated tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
    pub const NAMES: &'static [&'static str] = &["low", "medium", "high"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!(
                "Invalid priority '{}': must be one of {}",
                s,
                Priority::NAMES.join(", ")
            )),
        }
    }
}

// =============================================================================
// Input helpers shared by both front ends
// =============================================================================

/// Check and normalize a task description.
pub fn validate_description(description: &str) -> Result<String, String> {
    let trimmed = description.trim();
    if trimmed.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(format!(
            "Description must be at least {} characters",
            MIN_DESCRIPTION_LEN
        ));
    }
    Ok(trimmed.to_string())
}

/// Parse a due date given as RFC 3339 or as a bare `YYYY-MM-DD` day (midnight UTC).
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| {
            format!(
                "Invalid date '{}': use RFC 3339 (2025-01-31T17:00:00Z) or YYYY-MM-DD",
                input
            )
        })
}

/// Stored form of a project directory, shared by every front end so a path
/// linked through one is found by the other.
///
/// Existing directories are canonicalized (symlinks resolved). Paths that do
/// not exist are cleaned lexically: `.` dropped, `..` applied, trailing
/// separators removed.
pub fn normalize_project_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                clean.pop();
            }
            other => clean.push(other.as_os_str()),
        }
    }
    clean
}

/// Trim label names and drop empties and duplicates, keeping first-seen order.
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref().trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}
