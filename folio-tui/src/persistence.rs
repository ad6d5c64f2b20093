//! App state persistence across restarts (JSON).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
/// Credentials and fetched data never persist; dates reset to today.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub num_stocks: u32,
    pub investment: f64,
    pub active_panel: Panel,
    pub welcome_dismissed: bool,
    pub consensus_mode: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            num_stocks: 15,
            investment: 500_000.0,
            active_panel: Panel::Analyzer,
            welcome_dismissed: false,
            consensus_mode: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        num_stocks: app.analyzer.num_stocks,
        investment: app.analyzer.investment,
        active_panel: app.active_panel,
        welcome_dismissed: app.overlay != Overlay::Welcome,
        consensus_mode: app.news.consensus_mode,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.analyzer.num_stocks = state.num_stocks.clamp(1, 50);
    app.analyzer.investment = state.investment.max(50_000.0);
    app.active_panel = state.active_panel;
    app.news.consensus_mode = state.consensus_mode;
    app.overlay = if state.welcome_dismissed {
        Overlay::None
    } else {
        Overlay::Welcome
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = std::env::temp_dir().join("folio_persist_test");
        let path = dir.join("state.json");

        let state = PersistedState {
            num_stocks: 20,
            investment: 750_000.0,
            active_panel: Panel::News,
            welcome_dismissed: true,
            consensus_mode: true,
        };

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.num_stocks, 20);
        assert_eq!(loaded.investment, 750_000.0);
        assert_eq!(loaded.active_panel, Panel::News);
        assert!(loaded.welcome_dismissed);
        assert!(loaded.consensus_mode);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.num_stocks, 15);
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = std::env::temp_dir().join("folio_persist_corrupt");
        let path = dir.join("state.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.investment, 500_000.0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn apply_clamps_out_of_range_values() {
        let (tx, _rx) = std::sync::mpsc::channel();
        let (_tx2, rx2) = std::sync::mpsc::channel();
        let mut app = AppState::new(tx, rx2, std::path::PathBuf::from("."));

        apply(
            &mut app,
            PersistedState {
                num_stocks: 0,
                investment: 1.0,
                ..PersistedState::default()
            },
        );
        assert_eq!(app.analyzer.num_stocks, 1);
        assert_eq!(app.analyzer.investment, 50_000.0);
    }
}
