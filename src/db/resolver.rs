//! Resolution of user-supplied task ids.
//!
//! Callers may pass a full UUID or any prefix of its canonical lowercase form
//! holding at least [`MIN_PREFIX_LEN`] hex digits. The lookup is pushed down to the
//! store as a prefix query.

use uuid::Uuid;

use crate::db::{DbError, DbResult, Task, TaskRepository};

/// Fewest hex digits a prefix must carry.
pub const MIN_PREFIX_LEN: usize = 6;

/// Characters shown for each candidate of an ambiguous prefix.
pub const CANDIDATE_LEN: usize = 8;

/// Check that `input` is shaped like an id prefix without touching the store.
///
/// Ids are stored in lowercase, so only `0-9`, `a-f` and `-` are accepted, and
/// only the hex digits count toward [`MIN_PREFIX_LEN`].
pub fn validate_prefix(input: &str) -> DbResult<&str> {
    let prefix = input.trim();
    if !prefix.chars().all(is_id_char) {
        return Err(DbError::Validation {
            message: format!(
                "Task id '{}' is malformed: only lowercase hexadecimal digits and '-' are allowed",
                prefix
            ),
        });
    }
    let digits = prefix.chars().filter(|c| *c != '-').count();
    if digits < MIN_PREFIX_LEN {
        return Err(DbError::Validation {
            message: format!(
                "Task id prefix '{}' is too short: at least {} hexadecimal digits required",
                prefix, MIN_PREFIX_LEN
            ),
        });
    }
    Ok(prefix)
}

/// JSON Schema pattern accepting exactly what [`validate_prefix`] accepts.
pub fn prefix_pattern() -> String {
    format!("^(?:-*[0-9a-f]){{{},}}[0-9a-f-]*$", MIN_PREFIX_LEN)
}

fn is_id_char(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='f' | '-')
}

/// Resolve a full id or unique prefix to exactly one task.
pub async fn resolve_task<R>(repo: &R, input: &str) -> DbResult<Task>
where
    R: TaskRepository + Sync,
{
    let prefix = validate_prefix(input)?;

    if let Ok(id) = Uuid::try_parse(prefix)
        && id.to_string() == prefix
    {
        return repo.get(id).await;
    }

    let mut matches = repo.find_by_prefix(prefix).await?;
    match matches.len() {
        0 => Err(DbError::not_found("Task", prefix)),
        1 => Ok(matches.remove(0)),
        _ => {
            tracing::debug!(prefix, count = matches.len(), "Ambiguous task prefix");
            Err(DbError::Ambiguous {
                prefix: prefix.to_string(),
                candidates: matches.iter().map(|t| t.short_id(CANDIDATE_LEN)).collect(),
            })
        }
    }
}
