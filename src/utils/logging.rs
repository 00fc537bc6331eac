//! Log output setup for the binary.
//!
//! Library code logs through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter, which also bridges `log` records. In TUI
//! mode the terminal belongs to the interface, so records go to a file.

use crate::error::StorageError;
use crate::utils::error_helpers::convert_file_error;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "sick_search=debug"
    } else {
        "sick_search=info"
    }
}

pub fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Calling this twice is a no-op.
pub fn init_logging(verbose: bool, target: &LogTarget) -> Result<(), StorageError> {
    let filter = build_filter(verbose);

    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| convert_file_error(e, parent))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| convert_file_error(e, path))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    if installed.is_err() {
        log::debug!("Logger already initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "sick_search=info");
        assert_eq!(default_directive(true), "sick_search=debug");
    }

    #[test]
    fn test_file_target_creates_log_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("sick-search.log");

        init_logging(false, &LogTarget::File(path.clone())).unwrap();
        assert!(path.exists());
    }
}
