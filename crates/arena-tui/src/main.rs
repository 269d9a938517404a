use anyhow::{Context, Result};
use arena_core::{
    cloud::OpenAiClient,
    credential,
    settings::{Config, Settings},
};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
mod ui;
use ui::app::App;

const LOG_FILE: &str = "battle-arena.log";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    tracing::info!("starting Cyber Fantasy Battle Arena");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load settings: {}. Using defaults.", e);
            tracing::warn!(error = %e, "settings rejected, using defaults");
            let env_file = credential::env_file_path();
            Config {
                settings: Settings::default(),
                credential: credential::load_credential(&env_file),
                env_file,
            }
        }
    };

    let client = OpenAiClient::new(&config.settings, config.credential.clone())
        .context("failed to build HTTP client")?;
    let mut app = App::new(config, client);

    let mut terminal = init_terminal()?;
    let result = app.run(&mut terminal).await;
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "arena exited with an error");
    }
    result
}

// The terminal belongs to the UI, so logs go to a file.
fn init_logging() -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
        .with_context(|| format!("cannot open {}", LOG_FILE))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
