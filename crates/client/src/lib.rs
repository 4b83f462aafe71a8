//! Client code for return-check.
//!
//! This crate provides the HTTP adapter for the Re-turn scheme registry,
//! implementing the core [`SchemeRegistry`](returncheck_core::SchemeRegistry)
//! capability the lookup engine consumes.

pub mod registry;

pub use registry::{RegistryClient, RegistryConfig, RegistryError, classify};
