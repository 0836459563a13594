//! Command line front end.
//!
//! Every command works directly on the shared database through the same
//! repositories, resolver and stats engine the MCP server uses. `toki serve`
//! hands the database to the MCP server instead.

mod commands;
pub mod context;
pub mod error;
pub mod format;
pub mod utils;

#[cfg(test)]
mod format_test;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::{Database, Priority, SqliteDatabase};
use crate::mcp;

use self::commands::task::{AddOptions, EditOptions, ListFilter};
use self::error::{CliError, CliResult};

#[derive(Parser, Debug)]
#[command(name = "toki")]
#[command(author, version, about = "Git-aware task tracker shared with AI agents", long_about = None)]
pub struct Cli {
    /// Database file (default: TOKI_DB env or $XDG_DATA_HOME/toki/toki.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    #[command(visible_alias = "a")]
    Add {
        /// What needs to be done
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
        /// Project name (default: the current repository's project)
        #[arg(short, long)]
        project: Option<String>,
        /// Priority (low, medium, high)
        #[arg(long)]
        priority: Option<Priority>,
        /// Comma-separated labels
        #[arg(short, long)]
        labels: Option<String>,
        /// Additional notes
        #[arg(long)]
        notes: Option<String>,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks
    #[command(visible_alias = "ls")]
    List {
        /// Only tasks of this project
        #[arg(short, long)]
        project: Option<String>,
        /// Tasks of every project, ignoring the current repository
        #[arg(short, long, conflicts_with = "project")]
        all: bool,
        /// Completed tasks only
        #[arg(long, conflicts_with = "pending")]
        done: bool,
        /// Pending tasks only
        #[arg(long)]
        pending: bool,
        /// Only tasks with this priority
        #[arg(long)]
        priority: Option<Priority>,
        /// Only tasks with this label
        #[arg(short, long)]
        label: Option<String>,
        /// Only overdue tasks
        #[arg(long)]
        overdue: bool,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one task in detail
    Show {
        /// Task id or unique prefix (6+ characters)
        id: String,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Mark tasks as done
    #[command(visible_alias = "d")]
    Done {
        /// Task ids or unique prefixes
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Mark tasks as not done
    #[command(visible_alias = "ud")]
    Undone {
        /// Task ids or unique prefixes
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Delete a task
    #[command(visible_alias = "rm")]
    Remove {
        /// Task id or unique prefix
        id: String,
    },
    /// Change a task
    Edit {
        /// Task id or unique prefix
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        /// New notes; an empty string clears them
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Label management commands
    Label {
        #[command(subcommand)]
        command: LabelCommands,
    },
    /// Project management commands
    #[command(visible_alias = "p")]
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Summary statistics
    Stats {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Run the MCP server on stdio
    Serve,
}

#[derive(Subcommand, Debug)]
pub enum LabelCommands {
    /// Attach a label to a task
    Add { id: String, label: String },
    /// Detach a label from a task
    #[command(visible_alias = "rm")]
    Remove { id: String, label: String },
    /// List all labels
    List {
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    Add {
        name: String,
        /// Directory to associate with the project
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// List projects
    #[command(visible_alias = "ls")]
    List {
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Delete a project and all of its tasks
    #[command(visible_alias = "rm")]
    Remove { name: String },
    /// Associate a project with a directory (default: current repository root)
    Link {
        name: String,
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Install the stderr subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run one command against `db`. Returns the text to print.
pub async fn execute<D: Database + 'static>(
    db: Arc<D>,
    command: Commands,
    cwd: &Path,
) -> CliResult<String> {
    let now = Utc::now();
    let db_ref = db.as_ref();

    match command {
        Commands::Add {
            description,
            project,
            priority,
            labels,
            notes,
            due,
        } => {
            let options = AddOptions {
                project: project.as_deref(),
                priority,
                labels: labels.as_deref(),
                notes: notes.as_deref(),
                due: due.as_deref(),
            };
            commands::task::add_task(db_ref, &description.join(" "), options, cwd, now).await
        }
        Commands::List {
            project,
            all,
            done,
            pending,
            priority,
            label,
            overdue,
            format,
        } => {
            let filter = ListFilter {
                project: project.as_deref(),
                all_projects: all,
                done: match (done, pending) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                priority,
                label: label.as_deref(),
                overdue,
            };
            commands::task::list_tasks(db_ref, filter, cwd, now, &format).await
        }
        Commands::Show { id, format } => {
            commands::task::show_task(db_ref, &id, now, &format).await
        }
        Commands::Done { ids } => commands::task::done_tasks(db_ref, &ids, now).await,
        Commands::Undone { ids } => commands::task::undone_tasks(db_ref, &ids, now).await,
        Commands::Remove { id } => commands::task::remove_task(db_ref, &id).await,
        Commands::Edit {
            id,
            description,
            priority,
            notes,
            due,
        } => {
            let options = EditOptions {
                description: description.as_deref(),
                priority,
                notes: notes.as_deref(),
                due: due.as_deref(),
            };
            commands::task::edit_task(db_ref, &id, options, now).await
        }
        Commands::Label { command } => match command {
            LabelCommands::Add { id, label } => {
                commands::label::add_label(db_ref, &id, &label, now).await
            }
            LabelCommands::Remove { id, label } => {
                commands::label::remove_label(db_ref, &id, &label, now).await
            }
            LabelCommands::List { format } => commands::label::list_labels(db_ref, &format).await,
        },
        Commands::Project { command } => match command {
            ProjectCommands::Add { name, path } => {
                commands::project::add_project(db_ref, &name, path.as_deref(), cwd).await
            }
            ProjectCommands::List { format } => {
                commands::project::list_projects(db_ref, &format).await
            }
            ProjectCommands::Remove { name } => {
                commands::project::remove_project(db_ref, &name).await
            }
            ProjectCommands::Link { name, path } => {
                commands::project::link_project(db_ref, &name, path.as_deref(), cwd).await
            }
        },
        Commands::Stats { format } => commands::stats::show_stats(db_ref, now, &format).await,
        Commands::Serve => {
            mcp::serve_stdio(db).await?;
            Ok(String::new())
        }
    }
}

/// Parse arguments, open the configured database and run the command.
pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List {
        project: None,
        all: false,
        done: false,
        pending: true,
        priority: None,
        label: None,
        overdue: false,
        format: "table".to_string(),
    });

    // The server logs its lifecycle; plain commands stay quiet unless asked.
    let default_filter = if matches!(command, Commands::Serve) {
        "toki=info"
    } else {
        "toki=warn"
    };
    init_tracing(default_filter);

    let config = Config::resolve(cli.db).map_err(CliError::from)?;
    tracing::debug!(path = %config.db_path.display(), "Opening database");

    if let Some(parent) = config.db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(CliError::from)?;
    }

    let db = SqliteDatabase::open_with_timeout(&config.db_path, config.busy_timeout)
        .await
        .map_err(CliError::from)?
        .with_retry_policy(config.retry);
    db.migrate().await.map_err(CliError::from)?;

    let cwd = std::env::current_dir().map_err(CliError::from)?;
    let output = execute(Arc::new(db), command, &cwd).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
