//! Background worker thread. All HTTP happens here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Commands
//! are processed strictly in order on a single thread, so responses always
//! arrive in request order and the newest snapshot is the last one applied.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use chrono::NaiveDate;

use folio_client::snapshot::{fetch_snapshot, news_with_fallback, scorecard_with_fallback};
use folio_client::{AnalyzerSnapshot, ApiError, CachedClient, ClientConfig};
use folio_core::domain::{NewsItem, ScorecardEntry};
use folio_core::session::Profile;

use crate::app::ErrorCategory;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Login {
        username: String,
        password: String,
    },
    Logout,
    LoadSnapshot {
        from: NaiveDate,
        to: NaiveDate,
        num_stocks: u32,
        investment: f64,
    },
    LoadScorecard {
        date: NaiveDate,
    },
    LoadNews {
        date: NaiveDate,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    LoggedIn {
        profile: Profile,
    },
    LoggedOut,
    Snapshot {
        snapshot: Box<AnalyzerSnapshot>,
    },
    Scorecard {
        served: NaiveDate,
        entries: Vec<ScorecardEntry>,
    },
    News {
        served: NaiveDate,
        notes: Vec<NewsItem>,
    },
    Error {
        category: ErrorCategory,
        message: String,
        context: &'static str,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    config: ClientConfig,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("folio-worker".into())
        .spawn(move || {
            let client = CachedClient::new(&config);
            worker_loop(client, rx, tx);
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(mut client: CachedClient, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => handle_command(&mut client, cmd, &tx),
        }
    }
}

fn handle_command(client: &mut CachedClient, cmd: WorkerCommand, tx: &Sender<WorkerResponse>) {
    match cmd {
        WorkerCommand::Login { username, password } => {
            match client.login(&username, &password) {
                Ok(profile) => {
                    let _ = tx.send(WorkerResponse::LoggedIn { profile });
                }
                Err(e) => send_error(tx, &e, "login"),
            }
        }
        WorkerCommand::Logout => {
            if let Err(e) = client.logout() {
                send_error(tx, &e, "logout");
            }
            // The local session ends either way.
            let _ = tx.send(WorkerResponse::LoggedOut);
        }
        WorkerCommand::LoadSnapshot {
            from,
            to,
            num_stocks,
            investment,
        } => match fetch_snapshot(client, from, to, num_stocks, investment) {
            Ok(snapshot) => {
                let _ = tx.send(WorkerResponse::Snapshot {
                    snapshot: Box::new(snapshot),
                });
            }
            Err(e) => send_error(tx, &e, "analyzer"),
        },
        WorkerCommand::LoadScorecard { date } => match scorecard_with_fallback(client, date) {
            Ok((served, entries)) => {
                let _ = tx.send(WorkerResponse::Scorecard { served, entries });
            }
            Err(e) => send_error(tx, &e, "scorecard"),
        },
        WorkerCommand::LoadNews { date } => match news_with_fallback(client, date) {
            Ok((served, notes)) => {
                let _ = tx.send(WorkerResponse::News { served, notes });
            }
            Err(e) => send_error(tx, &e, "news"),
        },
        WorkerCommand::Shutdown => {} // handled in loop
    }
}

fn send_error(tx: &Sender<WorkerResponse>, error: &ApiError, context: &'static str) {
    let _ = tx.send(WorkerResponse::Error {
        category: categorize(error),
        message: error.to_string(),
        context,
    });
}

fn categorize(error: &ApiError) -> ErrorCategory {
    match error {
        ApiError::NetworkUnreachable(_) | ApiError::RateLimited { .. } => ErrorCategory::Network,
        ApiError::Unauthorized(_) => ErrorCategory::Auth,
        ApiError::NotFound { .. } | ApiError::ResponseFormatChanged(_) => ErrorCategory::Data,
        ApiError::Server { .. } | ApiError::Config(_) | ApiError::Other(_) => ErrorCategory::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(ClientConfig::default(), cmd_rx, resp_tx);
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn error_categories() {
        assert_eq!(
            categorize(&ApiError::NetworkUnreachable("refused".into())),
            ErrorCategory::Network
        );
        assert_eq!(
            categorize(&ApiError::Unauthorized("expired".into())),
            ErrorCategory::Auth
        );
        assert_eq!(
            categorize(&ApiError::NotFound { resource: "/x".into() }),
            ErrorCategory::Data
        );
        assert_eq!(
            categorize(&ApiError::Server { status: 500, message: "boom".into() }),
            ErrorCategory::Other
        );
    }
}
