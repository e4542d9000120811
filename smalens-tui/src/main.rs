//! smalens-tui: terminal viewer.
//!
//! Usage: `smalens-tui [SOURCE]`. Without a source argument the configured
//! source is used (see `ViewerConfig::discover`).
//!
//! No tracing subscriber is installed: stderr output would corrupt the
//! alternate screen. Pipeline errors are shown on screen instead.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use smalens_core::{Pipeline, TableCache, ViewerConfig};
use smalens_tui::{input, ui, App, Theme};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut config = ViewerConfig::discover(None)?;
    if let Some(arg) = std::env::args_os().nth(1) {
        config.source = PathBuf::from(arg);
    }
    config.validate()?;

    let cache = TableCache::new(Pipeline::from_config(&config.pipeline)?);
    let mut app = App::new(cache, config.source);
    let theme = Theme::default();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, &theme);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app, theme))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }
    }
    Ok(())
}
