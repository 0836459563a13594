//! MCP server implementation
//!
//! Bridges rmcp's [`ServerHandler`] to the crate's own tool, resource and
//! prompt registries. Tool failures come back as `is_error` results; unknown
//! tools, resources and prompts are protocol errors.

use std::sync::Arc;

use chrono::Utc;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParams, CallToolResult, Content, GetPromptRequestParams,
        GetPromptResult, Implementation, ListPromptsResult, ListResourcesResult, ListToolsResult,
        PaginatedRequestParams, Prompt, PromptArgument, PromptMessage, PromptMessageRole,
        RawResource, ReadResourceRequestParams, ReadResourceResult, ResourceContents,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use serde_json::{Map, Value, json};

use crate::db::{Database, DbError};

use super::prompts::{PROMPTS, find_prompt};
use super::resources::{self, MIME_TYPE, RESOURCES};
use super::tools::{TOOLS, Tools, find_tool};

const INSTRUCTIONS: &str = "toki - a task tracker shared with the toki command line. \
    Use list_tasks and list_projects to discover ids; task ids may be shortened to any \
    unique prefix of at least 6 hex digits. Read toki://stats for an overview, and see \
    the prompts for common workflows.";

/// Protocol error for a failed resource read.
///
/// A busy database is reported separately so clients know the same read may
/// succeed when retried.
pub fn resource_error(uri: &str, err: DbError) -> McpError {
    match err {
        DbError::Contention { .. } => {
            tracing::warn!(uri, error = %err, "Resource read hit a busy database");
            McpError::internal_error(
                format!("Database is busy while reading '{}'; retry the read", uri),
                Some(json!({ "kind": "contention", "retryable": true, "uri": uri })),
            )
        }
        other => {
            tracing::error!(uri, error = %other, "Resource read failed");
            McpError::internal_error(
                format!("Failed to read '{}': {}", uri, other),
                Some(json!({ "kind": "internal", "retryable": false, "uri": uri })),
            )
        }
    }
}

/// Main MCP server coordinator
///
/// Generic over `D: Database`; the same handle is shared with every tool handler.
pub struct TokiServer<D: Database> {
    db: Arc<D>,
    tools: Tools<D>,
}

impl<D: Database + 'static> TokiServer<D> {
    pub fn new(db: impl Into<Arc<D>>) -> Self {
        let db = db.into();
        Self {
            tools: Tools::new(Arc::clone(&db)),
            db,
        }
    }

    pub fn tool_list(&self) -> ListToolsResult {
        let tools = TOOLS
            .iter()
            .map(|spec| Tool::new(spec.name, spec.description, Arc::new(spec.input_schema())))
            .collect();
        ListToolsResult::with_all_items(tools)
    }

    pub fn resource_list(&self) -> ListResourcesResult {
        let resources = RESOURCES
            .iter()
            .map(|spec| {
                RawResource::new(spec.uri, spec.name)
                    .with_description(spec.description)
                    .with_mime_type(MIME_TYPE)
                    .no_annotation()
            })
            .collect();
        ListResourcesResult::with_all_items(resources)
    }

    pub fn prompt_list(&self) -> ListPromptsResult {
        let prompts = PROMPTS
            .iter()
            .map(|spec| {
                let arguments = spec.argument.map(|arg| {
                    vec![
                        PromptArgument::new(arg.name)
                            .with_description(arg.description)
                            .with_required(false),
                    ]
                });
                Prompt::new(spec.name, Some(spec.description), arguments)
            })
            .collect();
        ListPromptsResult::with_all_items(prompts)
    }

    /// Run one tool call. Only an unknown tool name is a protocol error.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        if find_tool(name).is_none() {
            return Err(McpError::invalid_params(
                format!("Unknown tool '{}'", name),
                None,
            ));
        }

        match self.tools.call(name, arguments.unwrap_or_default()).await {
            Ok(value) => {
                let text = serde_json::to_string_pretty(&value)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(err) => {
                tracing::warn!(tool = name, kind = err.kind(), error = %err, "Tool call failed");
                Ok(err.into_call_result())
            }
        }
    }

    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let body = resources::read_resource(self.db.as_ref(), uri, Utc::now())
            .await
            .map_err(|e| resource_error(uri, e))?
            .ok_or_else(|| {
                McpError::resource_not_found(
                    format!("Unknown resource '{}'", uri),
                    Some(json!({ "uri": uri })),
                )
            })?;

        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult::new(vec![
            ResourceContents::text(text, uri).with_mime_type(MIME_TYPE),
        ]))
    }

    /// Render a workflow prompt. Unknown names and bad arguments are invalid params.
    pub fn prompt(
        &self,
        name: &str,
        arguments: Option<&Map<String, Value>>,
    ) -> Result<GetPromptResult, McpError> {
        let spec = find_prompt(name).ok_or_else(|| {
            McpError::invalid_params(
                format!("Unknown prompt '{}'", name),
                Some(json!({ "available": PROMPTS.iter().map(|p| p.name).collect::<Vec<_>>() })),
            )
        })?;
        let rendered = spec
            .render(arguments)
            .map_err(|message| McpError::invalid_params(message, None))?;

        Ok(GetPromptResult::new(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            rendered.text,
        )])
        .with_description(rendered.description))
    }
}

impl<D: Database + 'static> ServerHandler for TokiServer<D> {
    fn get_info(&self) -> ServerInfo {
        let capabilities = ServerCapabilities::builder()
            .enable_prompts()
            .enable_resources()
            .enable_tools()
            .build();
        ServerInfo::new(capabilities)
            .with_server_info(Implementation::new(
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
            ))
            .with_instructions(INSTRUCTIONS)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(self.tool_list())
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(self.resource_list())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read(&request.uri).await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(self.prompt_list())
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.prompt(&request.name, request.arguments.as_ref())
    }
}
