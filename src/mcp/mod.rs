//! Model Context Protocol (MCP) server implementation
//!
//! Exposes the task store to automated agents over stdio.
//!
//! - **schema**: declarative parameter specs and the generic validator
//! - **tools**: one handler struct per entity, generic over `D: Database`
//! - **resources**: fixed read-only views in a shared envelope
//! - **prompts**: workflow templates for planning and reporting
//! - **error**: structured tool errors returned as `is_error` results
//! - **server**: the rmcp `ServerHandler`
//! - **service**: stdio transport

pub mod error;
pub mod prompts;
pub mod resources;
pub mod schema;
pub mod server;
mod service;
pub mod tools;

#[cfg(test)]
mod error_test;

pub use error::ToolError;
pub use server::TokiServer;
pub use service::serve_stdio;
