use crate::api::client::LookupClient;
use crate::api::models::Candidate;
use crate::cli::main_types::Commands;
use crate::core::cache::ResultCache;
use crate::core::controller::{ControllerOptions, SearchController};
use crate::core::recent::RecentSearchStore;
use crate::core::services::LookupService;
use crate::error::{AppError, CliError, StorageError};
use crate::storage::config::Config;
use crate::storage::session::{FileStorage, MemoryStorage, SessionStorage};
use comfy_table::{Attribute, Cell, Color, Table, presets};
use std::sync::Arc;

pub struct Dispatcher {
    config: Config,
    verbose: bool,
}

impl Dispatcher {
    pub fn new(config: Config, verbose: bool) -> Self {
        Self { config, verbose }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Tui => self.handle_tui().await,
            Commands::Lookup { query, json } => self.handle_lookup(&query, json).await,
            Commands::History { clear } => self.handle_history(clear),
        }
    }

    pub fn lookup_client(&self) -> Result<LookupClient, AppError> {
        let lookup = &self.config.lookup;
        let client = LookupClient::with_options(
            lookup.base_url.clone(),
            lookup.timeout_seconds,
            lookup.options(),
        )?;
        Ok(client)
    }

    /// Recent searches backed by the history file, or by memory when unset.
    pub fn recent_store(&self) -> RecentSearchStore {
        let storage: Arc<dyn SessionStorage> = match &self.config.history.file {
            Some(path) => Arc::new(FileStorage::new(path.clone())),
            None => Arc::new(MemoryStorage::new()),
        };
        RecentSearchStore::new(storage, self.config.history.capacity)
    }

    /// Mount a search box wired to the configured service.
    pub fn build_controller(&self) -> Result<SearchController, AppError> {
        let lookup: Arc<dyn LookupService> = Arc::new(self.lookup_client()?);
        let options = ControllerOptions {
            debounce: self.config.search.debounce(),
            cache_ttl: self.config.search.cache_ttl(),
        };
        Ok(SearchController::new(
            lookup,
            ResultCache::new(),
            self.recent_store(),
            options,
        ))
    }

    async fn handle_tui(&self) -> Result<(), AppError> {
        let controller = self.build_controller()?;
        log::info!(
            "Starting search box against {} (debounce {}ms)",
            self.config.lookup.base_url,
            self.config.search.debounce_ms
        );
        crate::tui::run(controller).await
    }

    async fn handle_lookup(&self, query: &str, json: bool) -> Result<(), AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Cli(CliError::InvalidArguments(
                "query must not be empty".to_string(),
            )));
        }

        let client = self.lookup_client()?;
        if self.verbose {
            eprintln!("Verbose: using lookup server {}", client.base_url);
        }
        let candidates = client.lookup(query).await?;

        if json {
            let output = serde_json::to_string_pretty(&candidates).map_err(|_| {
                StorageError::Serialize {
                    key: "candidates".to_string(),
                }
            })?;
            println!("{}", output);
        } else if candidates.is_empty() {
            println!("No candidates found for '{}'", query);
        } else {
            println!("{}", render_candidates(&candidates));
            println!("{} candidate(s)", candidates.len());
        }
        Ok(())
    }

    fn handle_history(&self, clear: bool) -> Result<(), AppError> {
        let Some(path) = &self.config.history.file else {
            println!(
                "Recent searches are kept in memory for one session. \
                 Set [history] file in config.toml to keep them."
            );
            return Ok(());
        };

        let store = self.recent_store();
        if clear {
            store.clear()?;
            println!("Cleared recent searches in {}", path.display());
            return Ok(());
        }

        let entries = store.entries();
        if entries.is_empty() {
            println!("No recent searches");
        } else {
            for (i, entry) in entries.iter().enumerate() {
                println!("{:>2}. {}", i + 1, entry);
            }
        }
        Ok(())
    }
}

pub fn render_candidates(candidates: &[Candidate]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Code")
            .add_attribute(Attribute::Bold)
            .fg(Color::Cyan),
        Cell::new("Name")
            .add_attribute(Attribute::Bold)
            .fg(Color::Cyan),
    ]);

    for candidate in candidates {
        table.add_row(vec![Cell::new(&candidate.code), Cell::new(&candidate.name)]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SearchState;
    use tempfile::tempdir;

    fn create_test_dispatcher(config: Config) -> Dispatcher {
        Dispatcher::new(config, true)
    }

    #[tokio::test]
    async fn test_lookup_rejects_blank_query() {
        let d = create_test_dispatcher(Config::default());
        let result = d
            .dispatch(Commands::Lookup {
                query: "   ".to_string(),
                json: false,
            })
            .await;

        match result {
            Err(AppError::Cli(CliError::InvalidArguments(msg))) => {
                assert!(msg.contains("empty"));
            }
            other => panic!("Expected InvalidArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_render_candidates_table() {
        let rendered = render_candidates(&[
            Candidate::new("J45", "Asthma"),
            Candidate::new("J45.0", "Allergic asthma"),
        ]);
        assert!(rendered.contains("Code"));
        assert!(rendered.contains("J45.0"));
        assert!(rendered.contains("Allergic asthma"));
    }

    #[test]
    fn test_history_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.history.file = Some(dir.path().join("history.json"));
        let d = create_test_dispatcher(config);

        d.recent_store().record("asthma").unwrap();
        assert_eq!(d.recent_store().entries(), vec!["asthma".to_string()]);

        d.handle_history(true).unwrap();
        assert!(d.recent_store().entries().is_empty());
    }

    #[test]
    fn test_history_without_file_is_not_an_error() {
        let d = create_test_dispatcher(Config::default());
        assert!(d.handle_history(false).is_ok());
        assert!(d.handle_history(true).is_ok());
    }

    #[tokio::test]
    async fn test_build_controller_uses_config() {
        let mut config = Config::default();
        config.history.capacity = 3;
        let d = create_test_dispatcher(config);

        let controller = d.build_controller().unwrap();
        assert_eq!(controller.state(), SearchState::Idle);
        assert!(controller.recent_searches().is_empty());
    }
}
