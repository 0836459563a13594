use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("{message}")]
    #[diagnostic(code(toki::cli::invalid_input))]
    InvalidInput { message: String },

    #[error("Project '{name}' not found")]
    #[diagnostic(
        code(toki::cli::project_not_found),
        help("See existing projects with: toki project list")
    )]
    ProjectNotFound { name: String },

    #[error("Repository '{root}' has no project and the name '{name}' is already taken")]
    #[diagnostic(
        code(toki::cli::unlinked_repository),
        help("Link the repository explicitly: toki project link <name> --path <repository>")
    )]
    UnlinkedRepository { name: String, root: String },

    #[error("I/O error: {0}")]
    #[diagnostic(code(toki::cli::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(toki::cli::output))]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
