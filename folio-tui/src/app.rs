//! Application state, single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels
//! and owns the HTTP client; nothing in this module does I/O.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use folio_client::AnalyzerSnapshot;
use folio_core::domain::{NewsItem, ScorecardEntry};
use folio_core::news::filter_news;
use folio_core::session::SessionState;

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Analyzer,
    Scorecard,
    News,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Analyzer => 0,
            Panel::Scorecard => 1,
            Panel::News => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Analyzer),
            1 => Some(Panel::Scorecard),
            2 => Some(Panel::News),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Analyzer => "Analyzer",
            Panel::Scorecard => "Scorecard",
            Panel::News => "News",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 4).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 3) % 4).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Auth,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Auth => "AUTH",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// Analyzer panel state: date pair, sizing inputs, and the last snapshot.
#[derive(Debug)]
pub struct AnalyzerState {
    /// Portfolio formation date.
    pub from: NaiveDate,
    /// Valuation date for current prices and the rebalance target.
    pub to: NaiveDate,
    pub num_stocks: u32,
    pub investment: f64,
    pub snapshot: Option<AnalyzerSnapshot>,
    pub loading: bool,
    pub cursor: usize,
}

impl AnalyzerState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            from: today,
            to: today,
            num_stocks: 15,
            investment: 500_000.0,
            snapshot: None,
            loading: false,
            cursor: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.comparison.len())
    }
}

/// Scorecard panel state.
#[derive(Debug)]
pub struct ScorecardState {
    pub requested: NaiveDate,
    /// Date the backend actually served (may be the previous day).
    pub served: Option<NaiveDate>,
    pub entries: Vec<ScorecardEntry>,
    pub loading: bool,
    pub cursor: usize,
}

impl ScorecardState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            requested: today,
            served: None,
            entries: Vec::new(),
            loading: false,
            cursor: 0,
        }
    }
}

/// News panel state: raw notes plus the consensus toggle and search term.
#[derive(Debug)]
pub struct NewsState {
    pub requested: NaiveDate,
    pub served: Option<NaiveDate>,
    pub notes: Vec<NewsItem>,
    pub loading: bool,
    pub cursor: usize,
    pub consensus_mode: bool,
    pub search: String,
}

impl NewsState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            requested: today,
            served: None,
            notes: Vec::new(),
            loading: false,
            cursor: 0,
            consensus_mode: false,
            search: String::new(),
        }
    }

    /// Notes matching the current search term.
    pub fn visible(&self) -> Vec<&NewsItem> {
        filter_news(&self.notes, &self.search)
    }
}

/// Which login form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// Sign-in form state for the login overlay.
#[derive(Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub field: LoginField,
    pub in_flight: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            field: LoginField::Username,
            in_flight: false,
        }
    }

    pub fn clear(&mut self) {
        self.username.clear();
        self.password.clear();
        self.field = LoginField::Username;
        self.in_flight = false;
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Login,
    Search,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Auth
    pub session: SessionState,
    pub login: LoginForm,

    // Panel states
    pub analyzer: AnalyzerState,
    pub scorecard: ScorecardState,
    pub news: NewsState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        state_path: PathBuf,
    ) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            active_panel: Panel::Analyzer,
            running: true,
            session: SessionState::default(),
            login: LoginForm::new(),
            analyzer: AnalyzerState::new(today),
            scorecard: ScorecardState::new(today),
            news: NewsState::new(today),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(50),
            error_scroll: 0,
            overlay: Overlay::Welcome,
            state_path,
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > 50 {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// Queue an analyzer fetch for the current date pair and sizing inputs.
    pub fn request_snapshot(&mut self) {
        if !self.require_sign_in() {
            return;
        }
        self.analyzer.loading = true;
        let _ = self.worker_tx.send(WorkerCommand::LoadSnapshot {
            from: self.analyzer.from,
            to: self.analyzer.to,
            num_stocks: self.analyzer.num_stocks,
            investment: self.analyzer.investment,
        });
        self.set_status(format!(
            "Loading portfolio {} → {}...",
            self.analyzer.from, self.analyzer.to
        ));
    }

    pub fn request_scorecard(&mut self) {
        if !self.require_sign_in() {
            return;
        }
        self.scorecard.loading = true;
        let _ = self.worker_tx.send(WorkerCommand::LoadScorecard {
            date: self.scorecard.requested,
        });
        self.set_status(format!("Loading scorecard for {}...", self.scorecard.requested));
    }

    pub fn request_news(&mut self) {
        if !self.require_sign_in() {
            return;
        }
        self.news.loading = true;
        let _ = self.worker_tx.send(WorkerCommand::LoadNews {
            date: self.news.requested,
        });
        self.set_status(format!("Loading broker news for {}...", self.news.requested));
    }

    /// Re-fetch whatever the active panel shows.
    pub fn refresh_active_panel(&mut self) {
        match self.active_panel {
            Panel::Analyzer => self.request_snapshot(),
            Panel::Scorecard => self.request_scorecard(),
            Panel::News => self.request_news(),
            Panel::Help => {}
        }
    }

    /// Gate data requests on authentication; opens the login overlay when
    /// anonymous.
    fn require_sign_in(&mut self) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        self.overlay = Overlay::Login;
        self.set_warning("Sign in first");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppState {
        let (tx, _rx) = std::sync::mpsc::channel();
        let (_tx2, rx2) = std::sync::mpsc::channel();
        AppState::new(tx, rx2, PathBuf::from("."))
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Analyzer.next(), Panel::Scorecard);
        assert_eq!(Panel::Help.next(), Panel::Analyzer);
        assert_eq!(Panel::Analyzer.prev(), Panel::Help);
        assert_eq!(Panel::News.prev(), Panel::Scorecard);
    }

    #[test]
    fn panel_from_index() {
        for i in 0..4 {
            let p = Panel::from_index(i).unwrap();
            assert_eq!(p.index(), i);
        }
        assert!(Panel::from_index(4).is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn anonymous_requests_open_the_login_overlay() {
        let mut app = app();
        app.overlay = Overlay::None;
        app.request_snapshot();
        assert_eq!(app.overlay, Overlay::Login);
        assert!(!app.analyzer.loading);
    }

    #[test]
    fn authenticated_requests_mark_loading() {
        let mut app = app();
        app.session.login(folio_core::session::Profile::default());
        app.request_snapshot();
        assert!(app.analyzer.loading);
        app.request_news();
        assert!(app.news.loading);
    }

    #[test]
    fn news_search_filters_visible_notes() {
        let mut app = app();
        app.news.notes = vec![
            NewsItem {
                stock: "Indian Oil".into(),
                broker: "Axis".into(),
                recommendation: "BUY".into(),
                target_price: None,
                published_date: "2024-03-08".into(),
                url: None,
            },
            NewsItem {
                stock: "TCS".into(),
                broker: "Motilal".into(),
                recommendation: "HOLD".into(),
                target_price: None,
                published_date: "2024-03-08".into(),
                url: None,
            },
        ];
        app.news.search = "oil".into();
        assert_eq!(app.news.visible().len(), 1);
        app.news.search = "oi".into();
        assert_eq!(app.news.visible().len(), 2);
    }
}
