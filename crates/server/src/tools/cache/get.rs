//! cache_get tool implementation.
//!
//! Shows the stored observation for one cache key without touching the
//! registry.

use chrono::SecondsFormat;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use returncheck_core::{BarcodeRecord, CacheStore, Error, cache::cache_ttl};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Exact cache key. A 12-digit code is usually stored zero-padded.
    #[serde(rename = "barcodeNo", alias = "barcode_no")]
    pub barcode_no: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheGetOutput {
    pub barcode_no: String,
    pub is_part_of_return_scheme: bool,
    /// RFC 3339 time the observation was written.
    pub observed_at: String,
    /// RFC 3339 time the record stops being served without a refresh.
    pub expires_at: String,
    pub fresh: bool,
}

impl From<&BarcodeRecord> for CacheGetOutput {
    fn from(record: &BarcodeRecord) -> Self {
        Self {
            barcode_no: record.code.clone(),
            is_part_of_return_scheme: record.is_part_of_scheme,
            observed_at: record.observed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            expires_at: (record.observed_at + cache_ttl()).to_rfc3339_opts(SecondsFormat::Millis, true),
            fresh: record.is_fresh(),
        }
    }
}

/// Implementation of the cache_get tool.
pub async fn get_impl(store: &dyn CacheStore, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let record = store
        .get(&params.barcode_no)
        .await?
        .ok_or_else(|| Error::CacheMiss(params.barcode_no.clone()))?;

    json_result(&CacheGetOutput::from(&record))
}
