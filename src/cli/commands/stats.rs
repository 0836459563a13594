use chrono::{DateTime, Utc};
use tabled::builder::Builder;

use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, truncate_with_ellipsis};
use crate::db::Database;
use crate::stats::collect_stats;

pub async fn show_stats<D: Database>(
    db: &D,
    now: DateTime<Utc>,
    format: &str,
) -> CliResult<String> {
    let stats = collect_stats(db, now).await?;

    if format == "json" {
        return Ok(serde_json::to_string_pretty(&stats)?);
    }

    let summary = stats.summary;
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Count"]);
    builder.push_record(["Total".to_string(), summary.total.to_string()]);
    builder.push_record(["Pending".to_string(), summary.pending.to_string()]);
    builder.push_record(["Completed".to_string(), summary.completed.to_string()]);
    builder.push_record(["Overdue".to_string(), summary.overdue.to_string()]);
    for (priority, count) in &stats.by_priority {
        builder.push_record([format!("Priority {}", priority), count.to_string()]);
    }
    let mut table = builder.build();
    apply_table_style(&mut table);

    let mut sections = vec![table.to_string()];

    if !stats.by_project.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Project", "Tasks"]);
        for entry in &stats.by_project {
            builder.push_record([entry.project_name.clone(), entry.task_count.to_string()]);
        }
        let mut table = builder.build();
        apply_table_style(&mut table);
        sections.push(table.to_string());
    }

    if let Some(oldest) = &stats.oldest_pending {
        sections.push(format!(
            "Oldest pending: {} {} ({} days old)",
            oldest.id.to_string().chars().take(6).collect::<String>(),
            truncate_with_ellipsis(&oldest.description, 50),
            oldest.age_days
        ));
    }

    Ok(sections.join("\n\n"))
}
