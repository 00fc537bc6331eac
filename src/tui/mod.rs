//! Terminal front end for the search box (ratatui + crossterm).

pub mod app;
pub mod event;
pub mod styles;
pub mod ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::backend::CrosstermBackend;
use std::io;

use crate::core::controller::SearchController;
use crate::error::AppError;
use app::App;

/// Take over the terminal and run the search box until the user quits.
pub async fn run(controller: SearchController) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    // Restore the terminal before the default hook prints
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut app = App::new(controller);
    // The loop blocks on terminal polling while lookups run on worker threads
    let result = tokio::task::block_in_place(|| app.run(&mut terminal));

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        log::error!("Terminal loop failed: {}", err);
    }
    result.map_err(AppError::from)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
