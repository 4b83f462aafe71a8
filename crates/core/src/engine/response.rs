//! Wire payloads for lookup results.
//!
//! Field names follow the legacy HTTP API so existing clients keep working.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{LookupOutcome, ResponseSource};
use crate::LookupFailure;

/// Successful lookup payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeResponse {
    /// Always true.
    pub success: bool,
    pub is_part_of_return_scheme: bool,
    /// Where the answer came from: cache, api or stale_cache_fallback.
    pub response_from: ResponseSource,
    /// The barcode as supplied.
    pub barcode_no: String,
    /// The key that produced the answer (zero-padded for UPC-A when that form matched).
    pub resolved_barcode_no: String,
    pub barcode_valid_checksum: bool,
    pub query_time_ms: f64,
}

impl From<&LookupOutcome> for BarcodeResponse {
    fn from(outcome: &LookupOutcome) -> Self {
        Self {
            success: true,
            is_part_of_return_scheme: outcome.is_part_of_scheme,
            response_from: outcome.source,
            barcode_no: outcome.barcode_no.clone(),
            resolved_barcode_no: outcome.resolved_key.clone(),
            barcode_valid_checksum: outcome.checksum_valid,
            query_time_ms: outcome.query_time_ms(),
        }
    }
}

/// Failed lookup payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    /// Always false.
    pub success: bool,
    pub message: String,
    /// Machine-readable reason, e.g. BarcodeNotNumeric.
    pub reason: String,
    pub barcode_no: String,
    pub barcode_valid_checksum: bool,
    pub query_time_ms: f64,
    /// Registry HTTP status for upstream failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl From<&LookupFailure> for FailureResponse {
    fn from(failure: &LookupFailure) -> Self {
        Self {
            success: false,
            message: failure.error.to_string(),
            reason: failure.error.reason().to_string(),
            barcode_no: failure.barcode_no.clone(),
            barcode_valid_checksum: failure.checksum_valid,
            query_time_ms: failure.query_time_ms(),
            status_code: failure.error.status(),
        }
    }
}
