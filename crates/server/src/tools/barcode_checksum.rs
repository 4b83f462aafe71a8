//! barcode_checksum tool implementation.
//!
//! Pure GS1 check digit validation; no cache or network access.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use returncheck_core::ChecksumReport;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::ToolError;

/// Parameters for the barcode_checksum tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BarcodeChecksumParams {
    /// Barcode digits, check digit included.
    #[serde(rename = "barcodeNo", alias = "barcode_no")]
    pub barcode_no: String,
}

/// Implementation of the barcode_checksum tool.
pub async fn checksum_impl(params: BarcodeChecksumParams) -> Result<CallToolResult, McpError> {
    let code = params.barcode_no.trim();
    if code.is_empty() {
        return Err(ToolError::InvalidInput("barcodeNo cannot be empty".into()).into());
    }

    json_result(&ChecksumReport::for_code(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_checksum_impl_valid() {
        let params = BarcodeChecksumParams { barcode_no: "036000291452".into() };
        assert!(checksum_impl(params).await.is_ok());
    }

    #[tokio::test]
    async fn test_checksum_impl_invalid_digit_still_reports() {
        let params = BarcodeChecksumParams { barcode_no: "036000291453".into() };
        assert!(checksum_impl(params).await.is_ok());
    }

    #[tokio::test]
    async fn test_checksum_impl_empty() {
        let params = BarcodeChecksumParams { barcode_no: "  ".into() };
        let err = checksum_impl(params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
