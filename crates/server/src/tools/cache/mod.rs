//! Cache-related MCP tools.
//!
//! Read-only inspection of the barcode cache; records are never deleted.

pub mod get;

pub use get::{CacheGetParams, get_impl};
