pub use error::AppError;

/// Main architecture layers (dependency flow: CLI/TUI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Search behavior
pub mod storage; // Configuration and session storage
pub mod tui; // Terminal search box

/// Support modules (used across layers)
pub mod api; // Lookup service client
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub use crate::api::models::Candidate;
pub use crate::core::{SearchController, SearchKey, SearchState, SearchView};

pub type Result<T> = std::result::Result<T, AppError>;
