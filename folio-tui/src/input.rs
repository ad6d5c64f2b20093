//! Keyboard input dispatch: global keys, then overlays, then the active
//! panel's handler. Every keypress counts as activity for the idle timer.

use chrono::{Days, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, LoginField, Overlay, Panel};
use crate::worker::WorkerCommand;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    app.session.touch();

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Login => {
            handle_login_overlay(app, key);
            return;
        }
        Overlay::Search => {
            handle_search_overlay(app, key);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Analyzer; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Scorecard; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::News; return; }
        KeyCode::Char('4') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('u') => {
            if app.session.is_authenticated() {
                let _ = app.worker_tx.send(WorkerCommand::Logout);
                app.set_status("Signing out...");
            } else {
                app.login.clear();
                app.overlay = Overlay::Login;
            }
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Analyzer => handle_analyzer_key(app, key),
        Panel::Scorecard => handle_scorecard_key(app, key),
        Panel::News => handle_news_key(app, key),
        Panel::Help => handle_help_key(app, key),
    }
}

fn handle_login_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.login.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
            app.login.field = match app.login.field {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
        }
        KeyCode::Enter => {
            if app.login.in_flight {
                return;
            }
            if app.login.username.is_empty() || app.login.password.is_empty() {
                app.set_warning("Enter username and password");
                return;
            }
            app.login.in_flight = true;
            let _ = app.worker_tx.send(WorkerCommand::Login {
                username: app.login.username.clone(),
                password: app.login.password.clone(),
            });
            app.set_status("Signing in...");
        }
        KeyCode::Backspace => {
            match app.login.field {
                LoginField::Username => app.login.username.pop(),
                LoginField::Password => app.login.password.pop(),
            };
        }
        KeyCode::Char(c) => {
            match app.login.field {
                LoginField::Username => app.login.username.push(c),
                LoginField::Password => app.login.password.push(c),
            };
        }
        _ => {}
    }
}

fn handle_search_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.news.search.clear();
            app.news.cursor = 0;
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => {
            app.overlay = Overlay::None;
        }
        KeyCode::Backspace => {
            app.news.search.pop();
            app.news.cursor = 0;
        }
        KeyCode::Char(c) => {
            app.news.search.push(c);
            app.news.cursor = 0;
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_analyzer_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let rows = app.analyzer.row_count();
            if rows > 0 && app.analyzer.cursor + 1 < rows {
                app.analyzer.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.analyzer.cursor = app.analyzer.cursor.saturating_sub(1);
        }
        KeyCode::Char('r') | KeyCode::Enter => {
            app.request_snapshot();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.analyzer.to = prev_day(app.analyzer.to);
            app.request_snapshot();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.analyzer.to = next_day(app.analyzer.to);
            app.request_snapshot();
        }
        KeyCode::Char('H') => {
            app.analyzer.from = prev_day(app.analyzer.from);
            app.request_snapshot();
        }
        KeyCode::Char('L') => {
            app.analyzer.from = next_day(app.analyzer.from);
            app.request_snapshot();
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.analyzer.num_stocks = (app.analyzer.num_stocks + 1).min(50);
            app.request_snapshot();
        }
        KeyCode::Char('-') => {
            app.analyzer.num_stocks = app.analyzer.num_stocks.saturating_sub(1).max(1);
            app.request_snapshot();
        }
        KeyCode::Char(']') => {
            app.analyzer.investment += 50_000.0;
            app.request_snapshot();
        }
        KeyCode::Char('[') => {
            app.analyzer.investment = (app.analyzer.investment - 50_000.0).max(50_000.0);
            app.request_snapshot();
        }
        _ => {}
    }
}

fn handle_scorecard_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let rows = app.scorecard.entries.len();
            if rows > 0 && app.scorecard.cursor + 1 < rows {
                app.scorecard.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scorecard.cursor = app.scorecard.cursor.saturating_sub(1);
        }
        KeyCode::Char('r') | KeyCode::Enter => {
            app.request_scorecard();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.scorecard.requested = prev_day(app.scorecard.requested);
            app.request_scorecard();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.scorecard.requested = next_day(app.scorecard.requested);
            app.request_scorecard();
        }
        _ => {}
    }
}

fn handle_news_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let rows = if app.news.consensus_mode {
                folio_core::news::consensus(&app.news.notes).len()
            } else {
                app.news.visible().len()
            };
            if rows > 0 && app.news.cursor + 1 < rows {
                app.news.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.news.cursor = app.news.cursor.saturating_sub(1);
        }
        KeyCode::Char('r') | KeyCode::Enter => {
            app.request_news();
        }
        KeyCode::Char('c') => {
            app.news.consensus_mode = !app.news.consensus_mode;
            app.news.cursor = 0;
        }
        KeyCode::Char('/') => {
            app.overlay = Overlay::Search;
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.news.requested = prev_day(app.news.requested);
            app.request_news();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.news.requested = next_day(app.news.requested);
            app.request_news();
        }
        _ => {}
    }
}

fn handle_help_key(app: &mut AppState, key: KeyEvent) {
    if let KeyCode::Char('e') = key.code {
        app.overlay = Overlay::ErrorHistory;
        app.error_scroll = 0;
    }
}

fn prev_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}
