mod app;
mod cli;
mod handler;
mod logging;
mod markdown;
mod tui;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use dunder_core::{Config, Dispatcher, Route};
use tracing::{info, warn};

use app::App;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::new(), Some(e)),
    };

    let log_level = cli
        .logging_level
        .clone()
        .or_else(|| config.logging_level.clone())
        .unwrap_or_else(|| "info".to_string());
    logging::init_logging(&log_level);
    if let Some(e) = config_error {
        warn!(error = %e, "could not read config file, using defaults");
    }

    let start = Route::from_path(&cli.page)
        .ok_or_else(|| anyhow!("unknown page '{}'", cli.page))?;
    let base_url = cli.base_url.clone().unwrap_or_else(|| config.resolve_base_url());
    let audio_player = cli.audio_player_command().or(config.audio_player);

    info!(%base_url, page = start.path(), "starting console");
    let mut app = App::new(Dispatcher::new(&base_url), audio_player, start);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "console exited with an error");
    }
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = tui::EventHandler::new(tui::TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    Ok(())
}
