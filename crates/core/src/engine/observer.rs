//! Structured lookup events.
//!
//! The engine reports what happened through a [`LookupObserver`] instead of
//! logging directly. [`TracingObserver`] is the default and writes each
//! event as a `tracing` record whose `msg_type` matches the legacy log
//! lines.

use super::LookupOutcome;
use crate::{Error, LookupError, LookupFailure};

/// Which cache operation degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Read,
    Write,
}

/// Something the engine wants reported.
#[derive(Debug)]
pub enum LookupEvent<'a> {
    /// Input rejected before any cache or registry access.
    Rejected(&'a LookupFailure),
    /// A lookup produced an answer.
    Resolved(&'a LookupOutcome),
    /// A lookup ended without an answer.
    Failed(&'a LookupFailure),
    /// The padded key came back negative; the original key is next.
    FormatRetry { primary: &'a str, alternate: &'a str },
    /// A stale record answered because the refresh failed.
    StaleFallback { key: &'a str, cause: &'a LookupError },
    /// The alternate key could not be resolved; the primary answer stands.
    AlternateFailed { key: &'a str, cause: &'a LookupError },
    /// The cache store failed; the lookup carried on without it.
    StorageDegraded { key: &'a str, op: StorageOp, error: &'a Error },
}

/// Receives lookup events.
pub trait LookupObserver: Send + Sync {
    fn on_event(&self, event: &LookupEvent<'_>);
}

/// Writes lookup events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LookupObserver for TracingObserver {
    fn on_event(&self, event: &LookupEvent<'_>) {
        match event {
            LookupEvent::Rejected(failure) => tracing::warn!(
                msg_type = "BarcodeRequestInvalid",
                barcode_no = %failure.barcode_no,
                query_time_ms = failure.query_time_ms(),
                reason = failure.error.reason(),
                "rejected barcode request"
            ),
            LookupEvent::Resolved(outcome) => tracing::info!(
                msg_type = "BarcodeRequestSuccess",
                barcode_no = %outcome.barcode_no,
                resolved_barcode_no = %outcome.resolved_key,
                query_time_ms = outcome.query_time_ms(),
                barcode_valid_checksum = outcome.checksum_valid,
                is_part_of_return_scheme = outcome.is_part_of_scheme,
                response_from = outcome.source.as_str(),
                "barcode lookup answered"
            ),
            LookupEvent::Failed(failure) => tracing::error!(
                msg_type = "BarcodeRequestFailure",
                barcode_no = %failure.barcode_no,
                query_time_ms = failure.query_time_ms(),
                barcode_valid_checksum = failure.checksum_valid,
                reason = failure.error.reason(),
                status_code = failure.error.status(),
                error = %failure.error,
                "barcode lookup failed"
            ),
            LookupEvent::FormatRetry { primary, alternate } => {
                tracing::debug!(primary, alternate, "padded UPC-A key not in scheme, retrying original")
            }
            LookupEvent::StaleFallback { key, cause } => tracing::info!(
                msg_type = "BarcodeRequestFailureWithStaleCacheFallback",
                key,
                reason = cause.reason(),
                status_code = cause.status(),
                error = %cause,
                "serving stale cache entry"
            ),
            LookupEvent::AlternateFailed { key, cause } => tracing::warn!(
                key,
                reason = cause.reason(),
                error = %cause,
                "alternate key lookup failed, keeping primary answer"
            ),
            LookupEvent::StorageDegraded { key, op, error } => tracing::warn!(
                key,
                op = ?op,
                error = %error,
                "cache store unavailable, continuing without it"
            ),
        }
    }
}
