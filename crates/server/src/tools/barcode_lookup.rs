//! barcode_lookup tool implementation.
//!
//! Answers whether a drink container barcode is part of the deposit return
//! scheme, cache first.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use returncheck_core::{BarcodeResponse, LookupEngine};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::json_result;

/// Parameters for the barcode_lookup tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BarcodeLookupParams {
    /// Barcode digits as printed on the container (EAN-13, UPC-A, EAN-8 or
    /// UPC-E). Leading zeros are significant.
    #[serde(rename = "barcodeNo", alias = "barcode_no", default)]
    pub barcode_no: Option<String>,
}

/// Implementation of the barcode_lookup tool.
///
/// Failures carry the structured failure payload in the error's `data`.
pub async fn lookup_impl(
    engine: &LookupEngine, params: BarcodeLookupParams, cancel: &CancellationToken,
) -> Result<CallToolResult, McpError> {
    let barcode_no = params.barcode_no.unwrap_or_default();
    let outcome = engine.lookup(&barcode_no, cancel).await?;

    json_result(&BarcodeResponse::from(&outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{FixedRegistry, engine_with, payload};
    use returncheck_core::UpstreamResult;

    fn params(code: &str) -> BarcodeLookupParams {
        BarcodeLookupParams { barcode_no: Some(code.to_string()) }
    }

    #[test]
    fn test_params_field_name() {
        let params: BarcodeLookupParams = serde_json::from_str(r#"{"barcodeNo":"5000112637922"}"#).unwrap();
        assert_eq!(params.barcode_no.as_deref(), Some("5000112637922"));

        let params: BarcodeLookupParams = serde_json::from_str(r#"{"barcode_no":"5000112637922"}"#).unwrap();
        assert_eq!(params.barcode_no.as_deref(), Some("5000112637922"));

        let params: BarcodeLookupParams = serde_json::from_str("{}").unwrap();
        assert!(params.barcode_no.is_none());
    }

    #[tokio::test]
    async fn test_lookup_impl_caches_answer() {
        let engine = engine_with(FixedRegistry::new(UpstreamResult::Matched)).await;

        let result = lookup_impl(&engine, params("5000112637922"), &CancellationToken::new())
            .await
            .unwrap();

        let body = payload(&result);
        assert_eq!(body["success"], true);
        assert_eq!(body["isPartOfReturnScheme"], true);
        assert_eq!(body["responseFrom"], "api");
        assert_eq!(body["barcodeNo"], "5000112637922");
        assert_eq!(body["barcodeValidChecksum"], true);

        let record = engine.store().get("5000112637922").await.unwrap().unwrap();
        assert!(record.is_part_of_scheme);
    }

    #[tokio::test]
    async fn test_lookup_impl_keeps_leading_zeros() {
        let engine = engine_with(FixedRegistry::new(UpstreamResult::NotMatched)).await;

        let result = lookup_impl(&engine, params("036000291452"), &CancellationToken::new())
            .await
            .unwrap();

        let body = payload(&result);
        assert_eq!(body["barcodeNo"], "036000291452");
        assert_eq!(body["isPartOfReturnScheme"], false);
        assert_eq!(body["responseFrom"], "api");

        let second = lookup_impl(&engine, params("036000291452"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(payload(&second)["responseFrom"], "cache");
    }

    #[tokio::test]
    async fn test_lookup_impl_missing_barcode() {
        let engine = engine_with(FixedRegistry::new(UpstreamResult::Matched)).await;

        let err = lookup_impl(&engine, BarcodeLookupParams::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);

        let data = err.data.unwrap();
        assert_eq!(data["success"], false);
        assert_eq!(data["reason"], "BarcodeNotProvided");
    }

    #[tokio::test]
    async fn test_lookup_impl_non_numeric() {
        let engine = engine_with(FixedRegistry::new(UpstreamResult::Matched)).await;

        let err = lookup_impl(&engine, params("50001126x7922"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.data.unwrap()["reason"], "BarcodeNotNumeric");
    }

    #[tokio::test]
    async fn test_lookup_impl_registry_down() {
        let engine = engine_with(FixedRegistry::new(UpstreamResult::Unavailable {
            reason: "status 503 (Service Unavailable)".into(),
            status: Some(503),
        }))
        .await;

        let err = lookup_impl(&engine, params("5000112637922"), &CancellationToken::new())
            .await
            .unwrap_err();
        let data = err.data.unwrap();
        assert_eq!(data["reason"], "InvalidResponseFromAPI");
        assert_eq!(data["statusCode"], 503);
    }
}
