//! Search orchestration for one search box.
//!
//! The controller is the single owner of its [`SearchSession`]. Timers and
//! network requests run as tokio tasks, but they never touch the session:
//! they post a [`ControllerEvent`] back over an mpsc channel and the owner
//! applies it from `drain_events` / `process_next`, so every mutation happens
//! on the caller's loop.
//!
//! ## Staleness guard
//!
//! Each fetch captures the generation number current when it was issued. A
//! completion is applied only if its generation is still the latest one, the
//! session is still `Fetching`, and the controller has not been torn down.
//! Everything else is dropped, including results that arrive "correctly"
//! but late. In-flight requests are never aborted at the transport level.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::models::Candidate;
use crate::core::cache::{DEFAULT_RESULT_TTL, ResultCache};
use crate::core::debounce::Debouncer;
use crate::core::navigator::{KeyboardNavigator, NavKey, NavOutcome};
use crate::core::pointer::{PointerHub, PointerPress, PointerSubscription, Region};
use crate::core::recent::RecentSearchStore;
use crate::core::services::LookupService;
use crate::core::session::{
    CommittedSearch, Focus, SearchSession, SearchState, SearchView,
};
use crate::error::ApiError;

/// Keys the search box understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub debounce: Duration,
    pub cache_ttl: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(crate::storage::config::DEFAULT_DEBOUNCE_MS),
            cache_ttl: DEFAULT_RESULT_TTL,
        }
    }
}

/// Messages posted back to the controller by its background tasks.
#[derive(Debug)]
pub enum ControllerEvent {
    /// Timer armed by input change number `trigger` ran out
    DebounceElapsed { trigger: u64, query: String },
    FetchCompleted {
        generation: u64,
        query: String,
        result: Result<Vec<Candidate>, ApiError>,
    },
    PointerPressed(PointerPress),
}

pub struct SearchController {
    lookup: Arc<dyn LookupService>,
    cache: ResultCache,
    recent: RecentSearchStore,
    options: ControllerOptions,
    session: SearchSession,
    navigator: KeyboardNavigator,
    debouncer: Debouncer<(u64, String)>,
    /// Bumped on every debounced input change
    debounce_seq: u64,
    /// Trigger id of the armed timer; older timers are ignored
    pending_trigger: Option<u64>,
    recent_entries: Vec<String>,
    focus: Focus,
    list_open: bool,
    hit_regions: Vec<Region>,
    last_commit: Option<CommittedSearch>,
    torn_down: bool,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    pointer_subscription: Option<PointerSubscription>,
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("session", &self.session)
            .field("selected", &self.navigator.selected())
            .field("focus", &self.focus)
            .field("list_open", &self.list_open)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl SearchController {
    /// Mount a search box. Recent searches are loaded once, here.
    pub fn new(
        lookup: Arc<dyn LookupService>,
        cache: ResultCache,
        recent: RecentSearchStore,
        options: ControllerOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let debounce_tx = events_tx.clone();
        let debouncer = Debouncer::new(options.debounce, move |(trigger, query): (u64, String)| {
            let _ = debounce_tx.send(ControllerEvent::DebounceElapsed { trigger, query });
        });

        let recent_entries = recent.load();

        Self {
            lookup,
            cache,
            recent,
            options,
            session: SearchSession::default(),
            navigator: KeyboardNavigator::new(),
            debouncer,
            debounce_seq: 0,
            pending_trigger: None,
            recent_entries,
            focus: Focus::Input,
            list_open: false,
            hit_regions: Vec::new(),
            last_commit: None,
            torn_down: false,
            events_tx,
            events_rx,
            pointer_subscription: None,
        }
    }

    /// Listen for presses on the shared pointer target.
    ///
    /// The subscription lives until `teardown` or drop. Attaching again
    /// replaces the previous subscription.
    pub fn attach_pointer(&mut self, hub: &PointerHub) {
        if self.torn_down {
            return;
        }
        let tx = self.events_tx.clone();
        self.pointer_subscription = Some(hub.subscribe(move |press| {
            let _ = tx.send(ControllerEvent::PointerPressed(press));
        }));
    }

    /// Screen regions that belong to this search box (input and list).
    pub fn set_hit_regions(&mut self, regions: Vec<Region>) {
        self.hit_regions = regions;
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn state(&self) -> SearchState {
        self.session.state
    }

    pub fn generation(&self) -> u64 {
        self.session.generation
    }

    pub fn selected(&self) -> Option<usize> {
        self.navigator.selected()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_list_open(&self) -> bool {
        self.list_open
    }

    pub fn recent_searches(&self) -> &[String] {
        &self.recent_entries
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn view(&self) -> SearchView {
        SearchView {
            query: self.session.query.clone(),
            state: self.session.state,
            loading: self.session.loading,
            error: self.session.has_error(),
            error_message: self.session.error.clone(),
            candidates: self.session.candidates.clone(),
            selected: self.navigator.selected(),
            recent: self.recent_entries.clone(),
            focus: self.focus,
            list_open: self.list_open,
            last_commit: self.last_commit.clone(),
        }
    }

    /// Input text changed.
    ///
    /// Empty (after trimming) clears the candidates right away and cancels
    /// any armed timer; anything else restarts the debounce window.
    pub fn on_input_change(&mut self, text: &str) {
        if self.torn_down {
            return;
        }

        self.session.query = text.to_string();
        self.focus = Focus::Input;
        self.list_open = true;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.debouncer.cancel();
            self.pending_trigger = None;
            self.enter_idle();
            return;
        }

        if self.session.state == SearchState::Fetching {
            log::debug!(
                "Input changed during fetch #{}; its result will be dropped",
                self.session.generation
            );
        }
        self.session.state = SearchState::Debouncing;
        self.session.loading = false;
        self.navigator.set_enabled(true);
        self.debounce_seq += 1;
        self.pending_trigger = Some(self.debounce_seq);
        self.debouncer.trigger((self.debounce_seq, trimmed.to_string()));
    }

    pub fn on_key_down(&mut self, key: SearchKey) -> bool {
        if self.torn_down {
            return false;
        }

        let nav_key = match key {
            SearchKey::Escape => {
                self.close_list();
                return true;
            }
            SearchKey::Enter if self.navigator.selected().is_none() => {
                self.on_commit(None);
                return true;
            }
            SearchKey::Enter => NavKey::Enter,
            SearchKey::ArrowUp => NavKey::Up,
            SearchKey::ArrowDown => NavKey::Down,
        };

        match self.navigator.handle(nav_key) {
            NavOutcome::Ignored => false,
            NavOutcome::Highlight(index) => {
                self.list_open = true;
                self.focus = if index.is_some() {
                    Focus::List
                } else {
                    Focus::Input
                };
                true
            }
            NavOutcome::ReturnFocus => {
                self.focus = Focus::Input;
                true
            }
            NavOutcome::Commit(index) => {
                let candidate = self.session.candidates.get(index).cloned();
                if candidate.is_some() {
                    self.on_commit(candidate);
                }
                true
            }
        }
    }

    /// Pointer moved over a candidate row.
    pub fn on_hover(&mut self, index: usize) {
        if self.torn_down {
            return;
        }
        if let NavOutcome::Highlight(Some(_)) = self.navigator.hover(index) {
            self.focus = Focus::List;
        }
    }

    /// Finalize a search and record it into recent searches.
    ///
    /// With a candidate, its name becomes the input text and is recorded.
    /// Without one, the trimmed input is recorded. The list closes either way.
    pub fn on_commit(&mut self, candidate: Option<Candidate>) {
        if self.torn_down {
            return;
        }

        let query = match &candidate {
            Some(c) => c.name.clone(),
            None => self.session.trimmed_query().to_string(),
        };
        if query.is_empty() {
            return;
        }

        if let Err(e) = self.recent.record(&query) {
            log::warn!("Failed to persist recent search '{}': {}", query, e);
        }
        self.recent_entries = self.recent.entries();

        if let Some(c) = &candidate {
            self.session.query = c.name.clone();
        }
        log::debug!("Committed search '{}'", query);
        self.last_commit = Some(CommittedSearch { query, candidate });
        self.close_list();
    }

    /// Pointer activation of a recent-search entry: search it right away.
    pub fn select_recent(&mut self, index: usize) {
        if self.torn_down {
            return;
        }
        let Some(query) = self.recent_entries.get(index).cloned() else {
            return;
        };

        self.debouncer.cancel();
        self.pending_trigger = None;
        self.session.query = query.clone();
        self.focus = Focus::Input;
        self.list_open = true;
        self.begin_fetch(query);
    }

    pub fn on_focus(&mut self) {
        if self.torn_down {
            return;
        }
        self.focus = Focus::Input;
        self.list_open = true;
    }

    pub fn on_blur(&mut self) {
        self.close_list();
    }

    pub fn on_outside_click(&mut self) {
        self.close_list();
    }

    /// Unmount: cancel the timer, release the pointer subscription, and make
    /// every outstanding completion non-committing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.debouncer.cancel();
        self.pending_trigger = None;
        self.pointer_subscription = None;
        self.session.loading = false;
        self.list_open = false;
        log::debug!(
            "Search box torn down at generation #{}",
            self.session.generation
        );
    }

    /// Apply every event that is ready without waiting. Returns how many ran.
    pub fn drain_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next background event and apply it.
    ///
    /// Once torn down nothing is awaited: ready events are drained and the
    /// call returns.
    pub async fn process_next(&mut self) {
        if self.torn_down {
            self.drain_events();
            return;
        }
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::DebounceElapsed { trigger, query } => {
                self.on_debounce_elapsed(trigger, query)
            }
            ControllerEvent::FetchCompleted {
                generation,
                query,
                result,
            } => self.complete_fetch(generation, &query, result),
            ControllerEvent::PointerPressed(press) => self.on_pointer_pressed(press),
        }
    }

    fn on_debounce_elapsed(&mut self, trigger: u64, query: String) {
        if self.torn_down {
            return;
        }
        // A timer that fired just before being re-armed can still be queued
        if self.pending_trigger != Some(trigger) {
            log::debug!("Ignoring superseded debounce #{} for '{}'", trigger, query);
            return;
        }
        self.pending_trigger = None;
        self.begin_fetch(query);
    }

    fn begin_fetch(&mut self, query: String) {
        self.session.generation += 1;
        let generation = self.session.generation;

        self.session.state = SearchState::Fetching;
        self.session.loading = true;
        self.session.error = None;
        self.navigator.set_enabled(false);

        if let Some(entry) = self.cache.get(&query) {
            log::debug!("Cache hit for '{}' (fetch #{})", query, generation);
            self.complete_fetch(generation, &query, Ok(entry.candidates));
            return;
        }

        log::debug!("Fetching '{}' as #{}", query, generation);
        let lookup = Arc::clone(&self.lookup);
        let cache = self.cache.clone();
        let ttl = self.options.cache_ttl;
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = lookup.lookup(&query).await;
            if let Ok(candidates) = &result {
                cache.put(&query, candidates.clone(), ttl);
            }
            let _ = tx.send(ControllerEvent::FetchCompleted {
                generation,
                query,
                result,
            });
        });
    }

    fn complete_fetch(
        &mut self,
        generation: u64,
        query: &str,
        result: Result<Vec<Candidate>, ApiError>,
    ) {
        if !self.is_committable(generation) {
            log::debug!(
                "Discarding stale result for '{}' (#{}, current #{})",
                query,
                generation,
                self.session.generation
            );
            return;
        }

        self.session.loading = false;
        self.navigator.set_enabled(true);

        match result {
            Ok(candidates) => {
                log::debug!("Fetch #{} settled with {} candidates", generation, candidates.len());
                self.navigator.reset(candidates.len());
                self.session.candidates = candidates;
                self.session.error = None;
                self.session.state = SearchState::Settled;
            }
            Err(e) => {
                log::warn!("Lookup for '{}' failed: {}", query, e);
                self.navigator.reset(0);
                self.session.candidates.clear();
                self.session.error = Some(e.to_string());
                self.session.state = SearchState::Failed;
            }
        }

        if self.focus == Focus::List {
            self.focus = Focus::Input;
        }
    }

    fn is_committable(&self, generation: u64) -> bool {
        !self.torn_down
            && generation == self.session.generation
            && self.session.state == SearchState::Fetching
    }

    fn on_pointer_pressed(&mut self, press: PointerPress) {
        if self.torn_down || !self.list_open {
            return;
        }
        let inside = self
            .hit_regions
            .iter()
            .any(|region| region.contains(press.column, press.row));
        if !inside {
            self.on_outside_click();
        }
    }

    fn enter_idle(&mut self) {
        self.session.state = SearchState::Idle;
        self.session.candidates.clear();
        self.session.loading = false;
        self.session.error = None;
        self.navigator.reset(0);
        self.navigator.set_enabled(true);
    }

    fn close_list(&mut self) {
        self.list_open = false;
        self.focus = Focus::Input;
        self.navigator.clear_selection();
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.teardown();
    }
}
