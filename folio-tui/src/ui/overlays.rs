//! Overlay widgets: welcome, sign-in form, search, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, LoginField};
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 40, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Welcome to Folio ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled("  1. Press u to sign in", theme::muted())),
        Line::from(Span::styled(
            "  2. Press r in the Analyzer to load your portfolio",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  3. Adjust dates with h/l and watch the rebalance plan",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  4. Panels 2 and 3 hold the scorecard and broker news",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Sign-in form overlay.
pub fn render_login(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(50, 30, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Sign In [Tab]field [Enter]submit [Esc]cancel ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let form = &app.login;
    let field_style = |field: LoginField| {
        if form.field == field {
            theme::accent_bold()
        } else {
            theme::muted()
        }
    };
    // Echo dots, not the password.
    let masked: String = "*".repeat(form.password.chars().count());

    let mut text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Username: ", field_style(LoginField::Username)),
            Span::styled(form.username.clone(), theme::text()),
            cursor_span(form.field == LoginField::Username),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Password: ", field_style(LoginField::Password)),
            Span::styled(masked, theme::text()),
            cursor_span(form.field == LoginField::Password),
        ]),
    ];
    if form.in_flight {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled("  Signing in...", theme::warning())));
    }

    f.render_widget(Paragraph::new(text), inner);
}

fn cursor_span(active: bool) -> Span<'static> {
    if active {
        Span::styled("_", theme::accent())
    } else {
        Span::raw("")
    }
}

/// News filter overlay.
pub fn render_search(f: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Filter News [Enter]apply [Esc]clear ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let hint = if input.chars().count() < 3 {
        "Type at least 3 characters to filter"
    } else {
        "Filtering by stock name"
    };
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(hint, theme::muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input.to_string(), theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
    ];

    f.render_widget(Paragraph::new(text), inner);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let visible_height = inner.height as usize;
    let start = app.error_scroll;
    let end = (start + visible_height).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for i in start..end {
        let err = &app.error_history[i];
        let is_active = i == app.error_scroll;
        let style = if is_active {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(&err.message, style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(&err.context, theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
