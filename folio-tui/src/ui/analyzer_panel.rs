//! Panel 1 — Analyzer: holdings vs current prices plus the rebalance plan.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use folio_core::columns::{comparison_columns, format_inr, rebalance_columns};
use folio_core::table::render_table;

use crate::app::AppState;
use crate::theme;
use crate::ui::table::table_lines;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let a = &app.analyzer;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(55),
            Constraint::Min(4),
        ])
        .split(area);

    render_header(f, chunks[0], app);

    let Some(snapshot) = &a.snapshot else {
        let hint = if a.loading {
            "Loading portfolio..."
        } else {
            "No data yet. Press r to load the portfolio for the selected dates."
        };
        f.render_widget(
            Paragraph::new(Span::styled(hint, theme::muted())),
            chunks[1],
        );
        return;
    };

    // Comparison table, scrolled to keep the cursor visible.
    let rendered = render_table(&comparison_columns(), &snapshot.comparison);
    let mut lines = table_lines(&rendered, Some(a.cursor));
    let visible = chunks[1].height as usize;
    if lines.len() > visible && a.cursor + 2 > visible {
        let skip = a.cursor + 2 - visible;
        // Keep the header, drop rows above the window.
        let header = lines.remove(0);
        lines.drain(..skip.min(lines.len()));
        lines.insert(0, header);
    }
    f.render_widget(Paragraph::new(lines), chunks[1]);

    // Rebalance plan below, with the capital banner.
    let mut plan_lines: Vec<Line> = Vec::new();
    let capital = snapshot.plan.capital_incurred;
    plan_lines.push(Line::from(vec![
        Span::styled("Rebalance  ", theme::accent_bold()),
        Span::styled(
            format!("capital incurred: {}", format_inr(capital)),
            if capital > 0.0 {
                theme::negative()
            } else {
                theme::positive()
            },
        ),
    ]));
    let plan = render_table(&rebalance_columns(), &snapshot.plan.stocks);
    plan_lines.extend(table_lines(&plan, None));
    f.render_widget(Paragraph::new(plan_lines), chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let a = &app.analyzer;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(format!("From {}  To {}  ", a.from, a.to), theme::accent()),
        Span::styled(
            format!("stocks {}  capital {}", a.num_stocks, format_inr(a.investment)),
            theme::muted(),
        ),
        Span::styled(
            "  [h/l]to-date [H/L]from-date [+/-]stocks [[/]]capital [r]efresh",
            theme::muted(),
        ),
    ]));

    if let Some(snapshot) = &a.snapshot {
        let s = &snapshot.summary;
        let pct = s
            .gains_pct
            .map(|p| format!(" ({:+.2}%)", p * 100.0))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(
                format!("Invested {}  ", format_inr(s.initial_investment)),
                theme::text(),
            ),
            Span::styled(format!("Now {}  ", format_inr(s.current_value)), theme::text()),
            Span::styled(
                format!("Gains {}{pct}", format_inr(s.gains)),
                theme::pnl_style(s.gains),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("Buy {}  ", s.buy_count), theme::positive()),
            Span::styled(format!("Sell {}  ", s.sell_count), theme::negative()),
            Span::styled(format!("Hold {}", s.hold_count), theme::neutral()),
        ]));
    } else if a.loading {
        lines.push(Line::from(Span::styled("Loading...", theme::muted())));
    }

    f.render_widget(Paragraph::new(lines), area);
}
