use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sick-search")]
#[command(about = "Type-ahead lookup of disease names and codes")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the lookup service
    #[arg(long, global = true, env = "SICK_SEARCH_URL")]
    pub server_url: Option<String>,

    /// Quiet period before a keystroke triggers a lookup
    #[arg(long, global = true)]
    pub debounce_ms: Option<u64>,

    /// Log file used while the terminal UI is running
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Interactive search box (default)
    Tui,
    /// Look up a query once and print the candidates
    Lookup {
        /// Search text
        query: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show or clear recent searches in the history file
    History {
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    /// True when the interactive interface owns the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }
}
