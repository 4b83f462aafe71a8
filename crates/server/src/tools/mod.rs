//! MCP tool implementations.
//!
//! This module contains all tools exposed by the return-check server.

pub mod barcode_checksum;
pub mod barcode_lookup;
pub mod cache;

pub use barcode_checksum::{BarcodeChecksumParams, checksum_impl};
pub use barcode_lookup::{BarcodeLookupParams, lookup_impl};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ToolError;

/// Wrap a payload as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(|e| ToolError::Serialization(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
