//! Panel 4 — Help: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "u", "Sign in / sign out");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Analyzer");
    key(&mut lines, "j / k", "Move cursor through holdings");
    key(&mut lines, "h / l", "Valuation date back / forward one day");
    key(&mut lines, "H / L", "Formation date back / forward one day");
    key(&mut lines, "+ / -", "More / fewer stocks in the portfolio");
    key(&mut lines, "[ / ]", "Decrease / increase capital");
    key(&mut lines, "r / Enter", "Reload the snapshot");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Scorecard");
    key(&mut lines, "j / k", "Scroll stocks");
    key(&mut lines, "h / l", "Date back / forward one day");
    key(&mut lines, "r / Enter", "Reload");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — News");
    key(&mut lines, "j / k", "Scroll notes");
    key(&mut lines, "c", "Toggle per-stock consensus view");
    key(&mut lines, "/", "Filter by stock name (3+ characters)");
    key(&mut lines, "h / l", "Date back / forward one day");
    key(&mut lines, "r / Enter", "Reload");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4 — Help (this panel)");
    key(&mut lines, "e", "Open error history overlay");
    lines.push(Line::from(""));

    section(&mut lines, "Notes");
    key(&mut lines, "Sessions", "Idle sessions sign out after one hour");
    key(&mut lines, "Dates", "Scorecard and news fall back to the previous day when unpublished");

    f.render_widget(Paragraph::new(lines), area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>18}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
