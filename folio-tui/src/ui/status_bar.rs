//! Bottom status bar: signed-in user, panel hints, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    match app.session.profile() {
        Some(profile) => {
            spans.push(Span::styled(format!(" {} ", profile.username), theme::accent()));
        }
        None => {
            spans.push(Span::styled(" not signed in ", theme::warning()));
        }
    }

    spans.push(Span::styled(
        "| 1:Analyzer 2:Scorecard 3:News 4:Help u:account q:quit",
        theme::muted(),
    ));
    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
