//! Runtime configuration.
//!
//! The database path is resolved from, highest precedence first: the `--db`
//! flag, `TOKI_DB`, then `$XDG_DATA_HOME/toki/toki.db` (falling back to
//! `~/.local/share/toki/toki.db`). Lock handling is tuned through
//! `TOKI_BUSY_TIMEOUT_MS` and `TOKI_MAX_RETRIES`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use crate::db::sqlite::{DEFAULT_BUSY_TIMEOUT, RetryPolicy};


pub const DB_ENV: &str = "TOKI_DB";
pub const BUSY_TIMEOUT_ENV: &str = "TOKI_BUSY_TIMEOUT_MS";
pub const MAX_RETRIES_ENV: &str = "TOKI_MAX_RETRIES";

const APP_DIR: &str = "toki";
const DB_FILE: &str = "toki.db";

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Cannot determine the data directory")]
    #[diagnostic(
        code(toki::config::no_data_dir),
        help("Set XDG_DATA_HOME or HOME, or pass --db / TOKI_DB explicitly")
    )]
    NoDataDir,

    #[error("Invalid value '{value}' for {var}: expected a non-negative integer")]
    #[diagnostic(code(toki::config::invalid_number))]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn resolve(db_flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_lookup(db_flag, |key| env::var(key).ok())
    }

    /// Resolve configuration with a custom variable lookup.
    pub fn from_lookup<F>(db_flag: Option<PathBuf>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = match db_flag {
            Some(path) => path,
            None => match var(DB_ENV) {
                Some(path) => PathBuf::from(path),
                None => data_dir(&var)?.join(DB_FILE),
            },
        };

        let busy_timeout = match var(BUSY_TIMEOUT_ENV) {
            Some(raw) => Duration::from_millis(parse_number::<u64>(BUSY_TIMEOUT_ENV, &raw)?),
            None => DEFAULT_BUSY_TIMEOUT,
        };

        let mut retry = RetryPolicy::default();
        if let Some(raw) = var(MAX_RETRIES_ENV) {
            // At least one attempt is always made.
            retry.max_attempts = parse_number::<u32>(MAX_RETRIES_ENV, &raw)?.max(1);
        }

        Ok(Self {
            db_path,
            busy_timeout,
            retry,
        })
    }
}

fn data_dir<F>(var: &F) -> Result<PathBuf, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let data_home = match var("XDG_DATA_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(var("HOME").ok_or(ConfigError::NoDataDir)?).join(".local/share"),
    };
    Ok(data_home.join(APP_DIR))
}

fn parse_number<N: FromStr>(var: &'static str, raw: &str) -> Result<N, ConfigError> {
    raw.trim()
        .parse::<N>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: raw.to_string(),
        })
}
