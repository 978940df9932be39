mod config;
mod controller;
mod gateway;
mod logging;
mod markup;
mod model;
mod tokenizer;
mod view;

use std::io;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::Config;
use controller::AppController;
use gateway::{BookClubApi, HttpGateway};
use model::AppModel;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    let _log_guard = match logging::init_logging(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e:#}");
            None
        }
    };

    tracing::info!(server = %config.server_url, "=== BookwormDen Client Starting ===");

    let gateway = HttpGateway::new(&config.server_url, config.session_cookie.as_deref())?;
    let session = config.session();
    if !session.is_logged_in() {
        tracing::info!("No username configured, member-only actions are hidden");
    }

    let model = AppModel::new(session);
    let controller = AppController::new(model.clone(), gateway, config.page_size);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, config.club).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("BookwormDen client shutting down");
    Ok(())
}

async fn run_app<G: BookClubApi>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: AppModel,
    controller: AppController<G>,
    club: Option<i64>,
) -> Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let snapshot = model.snapshot().await;
        let should_quit = model.should_quit().await;

        let mut hit_map = None;
        terminal.draw(|f| {
            hit_map = Some(AppView::render(f, &snapshot));
        })?;
        if let Some(hit_map) = hit_map {
            model.set_hit_map(hit_map).await;
        }

        if should_quit {
            break;
        }

        // Short poll so responses from background requests show up quickly
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => controller.handle_key_event(key, club).await?,
                Event::Mouse(mouse) => controller.handle_mouse_event(mouse).await?,
                _ => {}
            }
        }
    }

    Ok(())
}
