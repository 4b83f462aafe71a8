//! Structured errors raised by the tool layer itself.
//!
//! Lookup failures convert through `returncheck_core`; these cover
//! problems with tool parameters and output encoding.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Structured errors for the return-check server.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid input parameters (e.g., empty barcode).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Tool output could not be encoded.
    #[error("SERIALIZATION_FAILED: {0}")]
    Serialization(String),
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let (code, message) = match &err {
            ToolError::InvalidInput(msg) => (-32602, msg.clone()),
            ToolError::Serialization(msg) => (-32603, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
