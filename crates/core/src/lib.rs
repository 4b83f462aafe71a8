//! Core types and shared functionality for return-check.
//!
//! This crate provides:
//! - GS1 check digit validation
//! - Barcode membership cache with JSON file and SQLite backends
//! - The upstream registry capability and the lookup engine driving it
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod checksum;
pub mod config;
pub mod engine;
pub mod error;
pub mod upstream;

pub use cache::{BarcodeRecord, CacheStore, JsonFileStore, SqliteStore, open_store};
pub use checksum::{ChecksumReport, compute_check_digit, is_valid_checksum};
pub use config::{AppConfig, CacheBackend};
pub use engine::{
    BarcodeResponse, FailureResponse, LookupEngine, LookupEvent, LookupObserver, LookupOutcome, ResponseSource,
    TracingObserver,
};
pub use error::{Error, LookupError, LookupFailure};
pub use upstream::{SchemeRegistry, UpstreamResult};
