//! Live state of one search box and the snapshot handed to presentation.

use crate::api::models::Candidate;

/// Lifecycle of the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    /// No query; nothing shown
    #[default]
    Idle,
    /// Keystroke received, waiting for the quiet period
    Debouncing,
    /// Request in flight
    Fetching,
    /// Candidates (possibly none) shown
    Settled,
    /// Lookup failed; empty list plus error flag
    Failed,
}

impl SearchState {
    pub fn label(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Debouncing => "typing",
            SearchState::Fetching => "searching",
            SearchState::Settled => "ready",
            SearchState::Failed => "failed",
        }
    }
}

/// Where keyboard focus sits inside the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    List,
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    /// Raw input text as typed
    pub query: String,
    pub candidates: Vec<Candidate>,
    pub loading: bool,
    /// Message of the last failed lookup; `Some` is the error flag
    pub error: Option<String>,
    /// Identity of the most recently issued fetch
    pub generation: u64,
    pub state: SearchState,
}

impl SearchSession {
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A search finalized by Enter, the search button, or a pointer click.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedSearch {
    pub query: String,
    pub candidate: Option<Candidate>,
}

/// Everything the presentation layer needs to render one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub state: SearchState,
    pub loading: bool,
    pub error: bool,
    pub error_message: Option<String>,
    pub candidates: Vec<Candidate>,
    /// Highlighted candidate, to be indicated and scrolled into view
    pub selected: Option<usize>,
    pub recent: Vec<String>,
    pub focus: Focus,
    pub list_open: bool,
    pub last_commit: Option<CommittedSearch>,
}

impl SearchView {
    /// True once the user has typed something worth showing results for.
    pub fn has_search_started(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.selected.and_then(|i| self.candidates.get(i))
    }
}
