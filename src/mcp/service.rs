//! stdio transport for the MCP server.
//!
//! The server speaks JSON-RPC over stdin/stdout, so nothing else may write to
//! stdout while it runs. Logging goes to stderr.

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};

use crate::db::Database;

use super::server::TokiServer;

/// Serve until the client closes the connection.
pub async fn serve_stdio<D: Database + 'static>(db: Arc<D>) -> std::io::Result<()> {
    let server = TokiServer::<D>::new(db);
    tracing::info!("MCP server listening on stdio");

    let service = server
        .serve(stdio())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let reason = service
        .waiting()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!(?reason, "MCP server stopped");
    Ok(())
}
