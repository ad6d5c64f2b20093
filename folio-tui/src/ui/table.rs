//! Bridge from rendered table cells to styled terminal lines.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use folio_core::table::RenderedTable;

use crate::theme;

/// Leading columns (serial/rank and symbol) stay left-aligned; everything
/// after is numeric and right-aligns.
const LEFT_ALIGNED: usize = 2;

/// Lay a rendered table out as styled lines: one header line plus one line
/// per row, columns padded to their widest cell. The cursor row, if any,
/// renders reversed.
pub fn table_lines(table: &RenderedTable, cursor: Option<usize>) -> Vec<Line<'static>> {
    let widths = column_widths(table);
    let mut lines = Vec::with_capacity(table.rows.len() + 1);

    let header: Vec<Span> = table
        .header
        .iter()
        .enumerate()
        .map(|(c, label)| Span::styled(pad(label, widths[c], c), theme::accent_bold()))
        .collect();
    lines.push(Line::from(header));

    for (i, row) in table.rows.iter().enumerate() {
        let highlighted = cursor == Some(i);
        let spans: Vec<Span> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                let mut style = theme::tone_style(cell.tone);
                if highlighted {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(pad(&cell.text, widths[c], c), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

fn column_widths(table: &RenderedTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table.header.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (c, cell) in row.iter().enumerate() {
            if c < widths.len() {
                widths[c] = widths[c].max(cell.text.chars().count());
            }
        }
    }
    widths
}

fn pad(text: &str, width: usize, column: usize) -> String {
    let gap = " ".repeat(width.saturating_sub(text.chars().count()));
    if column < LEFT_ALIGNED {
        format!("{text}{gap}  ")
    } else {
        format!("{gap}{text}  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::table::{Cell, Tone};

    fn sample() -> RenderedTable {
        RenderedTable {
            header: vec!["#".into(), "Symbol".into(), "Price".into()],
            rows: vec![
                vec![
                    Cell::toned("1", Tone::Muted),
                    Cell::plain("IOC"),
                    Cell::plain("130.50"),
                ],
                vec![
                    Cell::toned("2", Tone::Muted),
                    Cell::plain("HDFCBANK"),
                    Cell::toned("1620.00", Tone::Favorable),
                ],
            ],
        }
    }

    #[test]
    fn columns_pad_to_widest_cell() {
        let lines = table_lines(&sample(), None);
        assert_eq!(lines.len(), 3);
        // "Symbol" column is as wide as "HDFCBANK".
        assert_eq!(lines[0].spans[1].content.as_ref(), "Symbol    ");
        assert_eq!(lines[1].spans[1].content.as_ref(), "IOC       ");
    }

    #[test]
    fn numeric_columns_right_align() {
        let lines = table_lines(&sample(), None);
        assert_eq!(lines[1].spans[2].content.as_ref(), " 130.50  ");
    }

    #[test]
    fn cursor_row_is_reversed() {
        let lines = table_lines(&sample(), Some(1));
        assert!(lines[2].spans[0]
            .style
            .add_modifier
            .contains(Modifier::REVERSED));
        assert!(!lines[1].spans[0]
            .style
            .add_modifier
            .contains(Modifier::REVERSED));
    }

    #[test]
    fn cell_tones_carry_through() {
        let lines = table_lines(&sample(), None);
        assert_eq!(lines[2].spans[2].style, theme::positive());
    }
}
