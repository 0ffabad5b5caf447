//! Tracing/logging setup shared by every portal process.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::{DEFAULT_FILTER, init, init_with_filter};
