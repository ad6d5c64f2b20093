//! Folio TUI — four-panel terminal interface for the portfolio tracker.
//!
//! Panels:
//! 1. Analyzer — holdings vs current prices, rebalance plan, summary
//! 2. Scorecard — qualitative factor ratings per stock
//! 3. News — broker notes and per-stock consensus
//! 4. Help — keyboard shortcuts

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use folio_client::ClientConfig;

use crate::app::{AppState, ErrorCategory, Overlay};
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config_base = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio");
    let state_path = config_base.join("state.json");
    let config_path = config_base.join("config.toml");

    let config = if config_path.exists() {
        ClientConfig::from_file(&config_path)?
    } else {
        ClientConfig::default()
    };

    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(config, cmd_rx, resp_tx);

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, state_path.clone());
    persistence::apply(&mut app, persisted);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    let _ = persistence::save(&state_path, &persisted);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Expire idle sessions
        if app.session.expire_if_idle(Instant::now()) {
            let _ = app.worker_tx.send(WorkerCommand::Logout);
            app.overlay = Overlay::Login;
            app.set_warning("Signed out after an hour of inactivity");
        }

        // 4. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 5. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::LoggedIn { profile } => {
            app.login.clear();
            app.overlay = Overlay::None;
            // Saved profile preferences seed the analyzer inputs.
            app.analyzer.num_stocks = profile.num_stocks.clamp(1, 50);
            app.analyzer.investment = profile.investment.max(50_000.0);
            app.set_status(format!("Signed in as {}", profile.username));
            app.session.login(profile);
            app.refresh_active_panel();
        }
        WorkerResponse::LoggedOut => {
            app.session.logout();
            app.analyzer.snapshot = None;
            app.analyzer.cursor = 0;
            app.scorecard.entries.clear();
            app.scorecard.served = None;
            app.news.notes.clear();
            app.news.served = None;
            app.set_status("Signed out");
        }
        WorkerResponse::Snapshot { snapshot } => {
            app.analyzer.loading = false;
            app.analyzer.cursor = app
                .analyzer
                .cursor
                .min(snapshot.comparison.len().saturating_sub(1));
            app.set_status(format!("Loaded {} holdings", snapshot.comparison.len()));
            app.analyzer.snapshot = Some(*snapshot);
        }
        WorkerResponse::Scorecard { served, entries } => {
            app.scorecard.loading = false;
            if served == app.scorecard.requested {
                app.set_status(format!("Scorecard loaded ({} stocks)", entries.len()));
            } else {
                app.set_warning(format!(
                    "Scorecard for {} not published yet; showing {served}",
                    app.scorecard.requested
                ));
            }
            app.scorecard.cursor = app.scorecard.cursor.min(entries.len().saturating_sub(1));
            app.scorecard.served = Some(served);
            app.scorecard.entries = entries;
        }
        WorkerResponse::News { served, notes } => {
            app.news.loading = false;
            if served == app.news.requested {
                app.set_status(format!("Loaded {} broker notes", notes.len()));
            } else {
                app.set_warning(format!(
                    "News for {} not published yet; showing {served}",
                    app.news.requested
                ));
            }
            app.news.cursor = 0;
            app.news.served = Some(served);
            app.news.notes = notes;
        }
        WorkerResponse::Error {
            category,
            message,
            context,
        } => {
            match context {
                "analyzer" => app.analyzer.loading = false,
                "scorecard" => app.scorecard.loading = false,
                "news" => app.news.loading = false,
                "login" => app.login.in_flight = false,
                _ => {}
            }
            if category == ErrorCategory::Auth && context != "login" {
                // The backend no longer honors our cookie.
                app.session.logout();
                app.overlay = Overlay::Login;
            }
            app.push_error(category, message, context.to_string());
        }
    }
}
