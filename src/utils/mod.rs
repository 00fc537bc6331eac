//! Shared helpers used across layers.

/// Mapping of transport and file failures into the error taxonomy
pub mod error_helpers;

/// Subscriber setup for log output
pub mod logging;

/// Display-width aware text helpers
pub mod text;
