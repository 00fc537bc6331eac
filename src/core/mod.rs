//! Search behavior: timing, caching, history, selection and orchestration.

pub mod cache;
pub mod controller;
pub mod debounce;
pub mod navigator;
pub mod pointer;
pub mod recent;
pub mod services;
pub mod session;

pub use controller::{ControllerOptions, SearchController, SearchKey};
pub use session::{CommittedSearch, Focus, SearchState, SearchView};
