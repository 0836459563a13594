//! toki: a git-aware task tracker.
//!
//! One SQLite file is shared by two front ends: the `toki` command line and
//! an MCP server (`toki serve`) used by AI agents. Both go through the same
//! repositories in [`db`].

pub mod cli;
pub mod config;
pub mod db;
pub mod mcp;
pub mod stats;
