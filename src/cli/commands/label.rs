use chrono::{DateTime, Utc};
use tabled::{Table, Tabled};

use crate::cli::error::{CliError, CliResult};
use crate::cli::format::format_task;
use crate::cli::utils::apply_table_style;
use crate::db::{Database, Label, LabelRepository, TaskRepository, resolve_task};

#[derive(Tabled)]
struct LabelDisplay {
    #[tabled(rename = "Label")]
    name: String,
}

impl From<&Label> for LabelDisplay {
    fn from(label: &Label) -> Self {
        Self {
            name: label.name.clone(),
        }
    }
}

fn label_name(label: &str) -> CliResult<String> {
    let name = label.trim().to_lowercase();
    if name.is_empty() {
        return Err(CliError::invalid_input("Label name cannot be empty"));
    }
    Ok(name)
}

pub async fn add_label<D: Database>(
    db: &D,
    id: &str,
    label: &str,
    now: DateTime<Utc>,
) -> CliResult<String> {
    let name = label_name(label)?;
    let task = resolve_task(&db.tasks(), id).await?;
    db.labels().add_to_task(task.id, &name).await?;
    let task = db.tasks().get(task.id).await?;
    Ok(format!("✓ Added label '{}'\n{}", name, format_task(&task, now)))
}

pub async fn remove_label<D: Database>(
    db: &D,
    id: &str,
    label: &str,
    now: DateTime<Utc>,
) -> CliResult<String> {
    let name = label_name(label)?;
    let task = resolve_task(&db.tasks(), id).await?;
    db.labels().remove_from_task(task.id, &name).await?;
    let task = db.tasks().get(task.id).await?;
    Ok(format!("✓ Removed label '{}'\n{}", name, format_task(&task, now)))
}

pub async fn list_labels<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let labels = db.labels().list().await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&labels)?),
        _ => {
            if labels.is_empty() {
                return Ok("No labels yet.".to_string());
            }
            let rows: Vec<LabelDisplay> = labels.iter().map(LabelDisplay::from).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}
