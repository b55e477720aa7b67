//! dynform-tui - Dynamic form builder for the terminal
//!
//! Pick a form type, fill in its fields, submit, then review, edit or
//! delete the submitted entries. State is cached in a JSON file between
//! runs.

mod app;
mod config;
mod platform;
mod state;
mod storage;
mod ui;

use anyhow::Result;
use app::App;
use config::TuiConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::ViewController;
use std::fs::{self, File};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use storage::{JsonFileStore, KeyValueStore, MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let config = TuiConfig::load()?;
    init_logging(&config);

    let controller = ViewController::restore(open_storage(&config));
    let mut app = App::new(controller);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file since the TUI owns the terminal; stderr if the file is unavailable
fn init_logging(config: &TuiConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dynform_tui=info".into());

    let log_file = config.log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        File::options().create(true).append(true).open(path).ok()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match log_file {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
            .init(),
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}

/// File-backed storage unless persistence is off or the file can't be opened
fn open_storage(config: &TuiConfig) -> Box<dyn KeyValueStore> {
    if !config.persist_enabled() {
        tracing::info!("Persistence disabled, keeping state in memory");
        return Box::new(MemoryStore::new());
    }
    let Some(path) = config.storage_path() else {
        tracing::warn!("No data directory available, keeping state in memory");
        return Box::new(MemoryStore::new());
    };
    match JsonFileStore::open(&path) {
        Ok(store) => {
            tracing::info!("Using storage file {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("Cannot open {}: {e}; keeping state in memory", path.display());
            Box::new(MemoryStore::new())
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Global quit: Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    app.request_quit();
                } else {
                    app.handle_key(key)?;
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
