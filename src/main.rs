use clap::Parser;
use sick_search::AppError;
use sick_search::cli::dispatcher::Dispatcher;
use sick_search::cli::main_types::{Cli, Commands};
use sick_search::storage::config::Config;
use sick_search::utils::logging::{LogTarget, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error [{}]: {}", err.severity().label(), err);
        if let Some(hint) = err.troubleshooting_hint() {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = Config::load(cli.config.clone())?;

    // Flags override file values
    if let Some(url) = &cli.server_url {
        config.lookup.base_url = url.clone();
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.search.debounce_ms = debounce_ms;
    }
    config.validate()?;

    let target = if cli.is_interactive() {
        LogTarget::File(cli.log_file.clone().unwrap_or_else(Config::default_log_path))
    } else {
        LogTarget::Stderr
    };
    init_logging(cli.verbose, &target)?;

    let command = cli.command.unwrap_or(Commands::Tui);
    let dispatcher = Dispatcher::new(config, cli.verbose);
    dispatcher.dispatch(command).await
}
