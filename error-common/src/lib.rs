//! Common error handling utilities for Eventline Engine
//!
//! This module provides the standardized service-level error type and error
//! codes used across Eventline Engine crates. Domain crates carry their own
//! thiserror enums; this crate covers the shared concerns at the binary
//! edges (startup, networking, configuration).

pub mod codes;
pub mod types;

pub use types::*;
