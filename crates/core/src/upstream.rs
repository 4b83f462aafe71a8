//! The scheme registry as seen by the lookup engine.
//!
//! Transport details stay behind [`SchemeRegistry`]; the engine only ever
//! reasons about the four [`UpstreamResult`] outcomes.

use async_trait::async_trait;

/// Classified answer from one registry call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamResult {
    /// The registry affirms membership for exactly this code string.
    Matched,
    /// The registry affirms non-membership.
    NotMatched,
    /// The call completed but the payload matched neither answer.
    Indeterminate,
    /// The call itself failed (network, timeout, non-success status).
    Unavailable {
        /// Human-readable detail for logs and error payloads.
        reason: String,
        /// HTTP status, when the registry returned one.
        status: Option<u16>,
    },
}

impl UpstreamResult {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        UpstreamResult::Unavailable { reason: reason.into(), status: None }
    }
}

/// Something that can be asked whether a barcode belongs to the scheme.
#[async_trait]
pub trait SchemeRegistry: Send + Sync {
    /// Query the registry for `code` exactly as given.
    async fn query(&self, code: &str) -> UpstreamResult;
}
