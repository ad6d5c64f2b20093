//! Panel 2 — Scorecard: qualitative factor ratings per stock.
//!
//! Each factor renders as a colored ball; the selected row expands its
//! factor names and detail link underneath the list.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let s = &app.scorecard;
    let mut lines: Vec<Line> = Vec::new();

    let date_label = s
        .served
        .map(|d| d.to_string())
        .unwrap_or_else(|| s.requested.to_string());
    lines.push(Line::from(vec![
        Span::styled(format!("Scorecard {date_label}  "), theme::accent()),
        Span::styled(
            format!("{} stocks", s.entries.len()),
            theme::muted(),
        ),
        Span::styled("  [j/k]scroll [h/l]date [r]efresh", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if s.loading {
        lines.push(Line::from(Span::styled("Loading scorecard...", theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    if s.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No scorecard yet. Press r to load.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let name_width = s
        .entries
        .iter()
        .map(|e| e.stock.chars().count())
        .max()
        .unwrap_or(0);

    // Leave room for header, blank line, and the two detail lines.
    let visible = (area.height as usize).saturating_sub(5);
    let start = s.cursor.saturating_sub(visible.saturating_sub(1));

    for (i, entry) in s.entries.iter().enumerate().skip(start).take(visible) {
        let is_cursor = i == s.cursor;
        let row_style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };

        let mut spans = vec![
            Span::styled(format!("{:>3}  ", i + 1), theme::muted()),
            Span::styled(
                format!("{:<width$}  ", entry.stock, width = name_width),
                row_style,
            ),
            Span::styled(format!("{:>6.1}  ", entry.composite_score), theme::accent()),
        ];
        for rating in entry.score_card.values() {
            spans.push(Span::styled("\u{25CF} ", theme::factor_style(rating)));
        }
        lines.push(Line::from(spans));
    }

    // Detail for the selected entry.
    if let Some(entry) = s.entries.get(s.cursor) {
        lines.push(Line::from(""));
        let factors: Vec<String> = entry
            .score_card
            .iter()
            .map(|(name, rating)| format!("{name}: {rating}"))
            .collect();
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", entry.symbol), theme::accent_bold()),
            Span::styled(factors.join("  "), theme::muted()),
        ]));
        if let Some(link) = &entry.link {
            lines.push(Line::from(Span::styled(link.clone(), theme::neutral())));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
