//! Symbis AI Scan - terminal intake client
//!
//! Walks the user through the four intake steps, submits the answers to the
//! report service in the background and shows the result.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use symbis_scan::application::{App, SubmissionDispatcher, ViewState};
use symbis_scan::config::Settings;
use symbis_scan::infrastructure::HttpReportClient;
use symbis_scan::presentation::{render_ui, InputHandler};

const TICK: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    let settings = Settings::parse();
    init_logging(&settings.log_file())?;

    let client = HttpReportClient::new(&settings.base_url, settings.mode)
        .context("Failed to build HTTP client")?;
    log::info!(
        "Starting intake against {} ({} mode)",
        client.endpoint(),
        client.mode()
    );
    let dispatcher = SubmissionDispatcher::new(Arc::new(client));
    let mut app = App::new(settings.mode, settings.download_dir.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &dispatcher);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        log::error!("Terminal failure: {}", err);
    }
    res.context("Terminal interface failed")
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Main event loop.
///
/// Applies finished submissions, redraws, and handles at most one key per
/// tick so the loading view keeps animating while a request is in flight.
/// Runs until Ctrl+C, or `q` on the result view.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &SubmissionDispatcher,
) -> io::Result<()> {
    loop {
        while let Some((id, outcome)) = dispatcher.try_next() {
            app.complete_submission(id, outcome);
        }

        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Char('q')
                    if matches!(app.view, ViewState::Result(_)) && app.active_alert().is_none() =>
                {
                    return Ok(());
                }
                _ => {
                    if let Some(submission) =
                        InputHandler::handle_key_event(app, key.code, key.modifiers)
                    {
                        dispatcher.dispatch(submission);
                    }
                }
            }
        }
    }
}
