//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    BarcodeChecksumParams, BarcodeLookupParams, checksum_impl,
    cache::{CacheGetParams, get_impl},
    lookup_impl,
};

use returncheck_core::LookupEngine;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mcp-return-check.
#[derive(Clone)]
pub struct ReturnCheckServer {
    engine: LookupEngine,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ReturnCheckServer {
    /// Create a new server handler around a lookup engine.
    pub fn new(engine: LookupEngine) -> Self {
        Self { engine, tool_router: Self::tool_router() }
    }

    /// Check a barcode against the deposit return scheme.
    ///
    /// The request's cancellation token is threaded through, so a client
    /// cancel aborts the registry call.
    #[tool(
        description = "Check whether a drink container barcode is part of the Re-turn deposit return scheme. Answers from a 24h cache, the live registry, or a stale cached answer when the registry is down."
    )]
    async fn barcode_lookup(
        &self, params: Parameters<BarcodeLookupParams>, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.engine, params.0, &context.ct).await
    }

    #[tool(description = "Validate a barcode's GS1 check digit. Offline; reports the expected digit.")]
    async fn barcode_checksum(&self, params: Parameters<BarcodeChecksumParams>) -> Result<CallToolResult, McpError> {
        checksum_impl(params.0).await
    }

    #[tool(description = "Show the cached scheme observation for an exact barcode key, with its freshness.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.engine.store().as_ref(), params.0).await
    }
}

impl ServerHandler for ReturnCheckServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-return-check".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Deposit return scheme lookups. Use barcode_lookup for membership, barcode_checksum for offline \
                 check digit validation."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
