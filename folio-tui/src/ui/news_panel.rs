//! Panel 3 — News: broker notes, filterable, with a per-stock consensus view.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use folio_core::news::{consensus, Recommendation};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let n = &app.news;
    let mut lines: Vec<Line> = Vec::new();

    let date_label = n
        .served
        .map(|d| d.to_string())
        .unwrap_or_else(|| n.requested.to_string());
    let mode = if n.consensus_mode { "consensus" } else { "notes" };
    lines.push(Line::from(vec![
        Span::styled(format!("Broker news {date_label}  "), theme::accent()),
        Span::styled(format!("[{mode}]  "), theme::neutral()),
        Span::styled(
            if n.search.is_empty() {
                String::new()
            } else {
                format!("filter: {}  ", n.search)
            },
            theme::warning(),
        ),
        Span::styled("[c]onsensus [/]search [h/l]date [r]efresh", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if n.loading {
        lines.push(Line::from(Span::styled("Loading broker news...", theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    if n.notes.is_empty() {
        lines.push(Line::from(Span::styled(
            "No broker notes yet. Press r to load.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    if n.consensus_mode {
        render_consensus(&mut lines, app, area);
    } else {
        render_notes(&mut lines, app, area);
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_notes(lines: &mut Vec<Line<'static>>, app: &AppState, area: Rect) {
    let n = &app.news;
    let notes = n.visible();

    if notes.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("No notes match \"{}\".", n.search),
            theme::muted(),
        )));
        return;
    }

    let visible = (area.height as usize).saturating_sub(3);
    let start = n.cursor.saturating_sub(visible.saturating_sub(1));

    for (i, note) in notes.iter().enumerate().skip(start).take(visible) {
        let is_cursor = i == n.cursor;
        let stock_style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::accent()
        };
        let rec = Recommendation::parse(&note.recommendation);
        let target = note
            .target_price
            .map(|t| format!("  target {t:.2}"))
            .unwrap_or_default();

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<10}  ", date_prefix(&note.published_date)),
                theme::muted(),
            ),
            Span::styled(format!("{:<24}  ", note.stock), stock_style),
            Span::styled(
                format!("{:<12}  ", rec.label()),
                theme::recommendation_style(rec.label()),
            ),
            Span::styled(format!("{}{target}", note.broker), theme::muted()),
        ]));
    }
}

fn render_consensus(lines: &mut Vec<Line<'static>>, app: &AppState, area: Rect) {
    let n = &app.news;
    let grouped = consensus(&n.notes);

    lines.push(Line::from(Span::styled(
        format!(
            "{:<24}  {:>5}  {:<12}  {:>10}  {:<10}",
            "Stock", "Notes", "Consensus", "Avg Target", "Latest"
        ),
        theme::accent_bold(),
    )));

    let visible = (area.height as usize).saturating_sub(4);
    let start = n.cursor.saturating_sub(visible.saturating_sub(1));

    for (i, row) in grouped.iter().enumerate().skip(start).take(visible) {
        let is_cursor = i == n.cursor;
        let stock_style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };
        let target = row
            .avg_target
            .map(|t| format!("{t:.2}"))
            .unwrap_or_else(|| "\u{2014}".to_string());
        let latest = row
            .latest
            .map(|d| d.to_string())
            .unwrap_or_else(|| "\u{2014}".to_string());

        lines.push(Line::from(vec![
            Span::styled(format!("{:<24}  ", row.stock), stock_style),
            Span::styled(format!("{:>5}  ", row.note_count), theme::muted()),
            Span::styled(
                format!("{:<12}  ", row.consensus.label()),
                theme::recommendation_style(row.consensus.label()),
            ),
            Span::styled(format!("{target:>10}  "), theme::text()),
            Span::styled(latest, theme::muted()),
        ]));
    }
}

fn date_prefix(published: &str) -> &str {
    published.get(..10).unwrap_or(published)
}
