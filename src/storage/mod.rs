//! Storage layer for sick-search
//!
//! Handles configuration management and session-scoped key/value storage
//! used for recent-search persistence.

use crate::error::StorageError;

pub mod config;
pub mod session;

type Result<T> = std::result::Result<T, StorageError>;
