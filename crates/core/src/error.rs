//! Unified error types for return-check.
//!
//! [`Error`] covers storage and startup failures. [`LookupError`] is the
//! request-level taxonomy a caller of the lookup engine can observe, and
//! [`LookupFailure`] wraps it with the diagnostic context every failed
//! lookup reports.

use std::time::Duration;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::engine::FailureResponse;

/// Unified error types for cache storage and startup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No cache entry found for the given barcode.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Reading or writing the cache file failed.
    #[error("CACHE_ERROR: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The cache mapping could not be encoded.
    #[error("CACHE_ERROR: serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io { context: context.into(), source }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Io { .. } | Error::Serialization(_) => (-32002, err.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

/// Why a barcode lookup did not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The barcode parameter was missing or empty.
    #[error("'barcodeNo' is required.")]
    BarcodeNotProvided,

    /// The barcode contained something other than ASCII digits.
    #[error("'barcodeNo' must be a number.")]
    BarcodeNotNumeric,

    /// The registry answered but the payload matched neither marker.
    #[error("Got ok response from API, but was unable to parse it.")]
    UpstreamUnparseable,

    /// The registry call failed outright.
    #[error("Invalid Response from Re-Turn API - {detail}")]
    UpstreamUnavailable { detail: String, status: Option<u16> },

    /// The caller gave up before the lookup finished.
    #[error("lookup cancelled before completion")]
    Cancelled,
}

impl LookupError {
    /// Machine-readable reason reported to callers and in logs.
    pub fn reason(&self) -> &'static str {
        match self {
            LookupError::BarcodeNotProvided => "BarcodeNotProvided",
            LookupError::BarcodeNotNumeric => "BarcodeNotNumeric",
            LookupError::UpstreamUnparseable => "ValidResponseButCouldNotParse",
            LookupError::UpstreamUnavailable { .. } => "InvalidResponseFromAPI",
            LookupError::Cancelled => "Cancelled",
        }
    }

    /// True for errors caused by the request itself rather than by the registry.
    pub fn is_client_error(&self) -> bool {
        matches!(self, LookupError::BarcodeNotProvided | LookupError::BarcodeNotNumeric)
    }

    /// Upstream HTTP status, when the registry returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            LookupError::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }

    fn rpc_code(&self) -> i32 {
        match self {
            LookupError::BarcodeNotProvided | LookupError::BarcodeNotNumeric => -32602,
            LookupError::UpstreamUnparseable => -32013,
            LookupError::UpstreamUnavailable { .. } => -32008,
            LookupError::Cancelled => -32800,
        }
    }
}

/// A failed lookup together with the context gathered before it failed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error}")]
pub struct LookupFailure {
    pub error: LookupError,
    /// The barcode exactly as the caller supplied it.
    pub barcode_no: String,
    pub checksum_valid: bool,
    pub elapsed: Duration,
}

impl LookupFailure {
    pub fn query_time_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl From<LookupFailure> for McpError {
    fn from(failure: LookupFailure) -> Self {
        let code = failure.error.rpc_code();
        let message = failure.error.to_string();
        let data = serde_json::to_value(FailureResponse::from(&failure)).ok();

        McpError { code: ErrorCode(code), message: message.into(), data }
    }
}
