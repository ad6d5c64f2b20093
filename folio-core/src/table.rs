//! Declarative table rendering — column descriptors drive every table view.
//!
//! A table kind is an ordered list of `Column<R>` descriptors. Each descriptor
//! names the header label, how to pull a value out of a row (a typed accessor,
//! not a stringly field lookup), and optionally how to turn that value into a
//! styled cell. The row renderer dispatches each column in list order, so cell
//! position *i* in every row lines up with header position *i*.

/// A raw cell input value. Rows carry either text or numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Num(f64),
}

impl Value {
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Num(n) => write!(f, "{n}"),
        }
    }
}

/// Semantic tone of a rendered cell. Front-ends map tones onto colors;
/// the renderer itself never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Default,
    Muted,
    Accent,
    Favorable,
    Unfavorable,
    Warning,
}

/// One rendered table cell — opaque to the row renderer, which only
/// positions it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
    /// Optional detail link (rendered as a hyperlink where the medium allows).
    pub link: Option<String>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Default,
            link: None,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            link: None,
        }
    }

    pub fn linked(text: impl Into<String>, tone: Tone, link: Option<String>) -> Self {
        Self {
            text: text.into(),
            tone,
            link,
        }
    }
}

/// Where a column's value comes from.
///
/// `Rank` is the sentinel for "use the row's 1-based ordinal position" —
/// it never reads a field, even if the record happens to carry one named
/// like a rank. `Field` accessors return `None` for a missing value, which
/// renders as an empty cell rather than erroring.
pub enum ColumnSource<R> {
    Rank,
    Field(fn(&R) -> Option<Value>),
}

/// One column descriptor: header label, value source, optional cell renderer.
///
/// Descriptors are built once per table kind and shared read-only across all
/// render calls. A renderer must be a pure function of `(value, row)`.
pub struct Column<R> {
    pub label: &'static str,
    pub source: ColumnSource<R>,
    pub render: Option<fn(Value, &R) -> Cell>,
}

impl<R> Column<R> {
    pub fn rank(label: &'static str) -> Self {
        Self {
            label,
            source: ColumnSource::Rank,
            render: None,
        }
    }

    pub fn field(label: &'static str, get: fn(&R) -> Option<Value>) -> Self {
        Self {
            label,
            source: ColumnSource::Field(get),
            render: None,
        }
    }

    pub fn rendered(
        label: &'static str,
        get: fn(&R) -> Option<Value>,
        render: fn(Value, &R) -> Cell,
    ) -> Self {
        Self {
            label,
            source: ColumnSource::Field(get),
            render: Some(render),
        }
    }
}

/// A fully materialized table: header labels plus one cell row per record.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RenderedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Materialize one row: one cell per column, in column order, none skipped.
pub fn render_row<R>(row: &R, rank: usize, columns: &[Column<R>]) -> Vec<Cell> {
    columns
        .iter()
        .map(|col| match col.source {
            ColumnSource::Rank => Cell::toned(rank.to_string(), Tone::Muted),
            ColumnSource::Field(get) => match get(row) {
                None => Cell::plain(""),
                Some(value) => match col.render {
                    Some(render) => render(value, row),
                    None => Cell::plain(value.to_string()),
                },
            },
        })
        .collect()
}

/// Compose header and body. Rank is always positional (index + 1), never
/// taken from the data. Deterministic for identical inputs.
pub fn render_table<R>(columns: &[Column<R>], rows: &[R]) -> RenderedTable {
    RenderedTable {
        header: columns.iter().map(|c| c.label.to_string()).collect(),
        rows: rows
            .iter()
            .enumerate()
            .map(|(i, row)| render_row(row, i + 1, columns))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Rec {
        name: String,
        score: f64,
        /// Deliberately named like the sentinel — must never be displayed.
        rank: f64,
        missing: Option<f64>,
    }

    fn test_columns() -> Vec<Column<Rec>> {
        vec![
            Column::rank("#"),
            Column::field("Name", |r: &Rec| Some(Value::Text(r.name.clone()))),
            Column::rendered(
                "Score",
                |r: &Rec| Some(Value::Num(r.score)),
                |v, _| Cell::toned(format!("{:.1}", v.as_num().unwrap_or(0.0)), Tone::Accent),
            ),
            Column::field("Maybe", |r: &Rec| r.missing.map(Value::Num)),
        ]
    }

    fn rec(name: &str, score: f64) -> Rec {
        Rec {
            name: name.into(),
            score,
            rank: 999.0,
            missing: None,
        }
    }

    #[test]
    fn rank_is_positional_not_field() {
        let rows = vec![rec("a", 1.0), rec("b", 2.0)];
        let table = render_table(&test_columns(), &rows);
        assert_eq!(table.rows[0][0].text, "1");
        assert_eq!(table.rows[1][0].text, "2");
        // The record's own rank-like field never leaks through.
        assert!(rows.iter().all(|r| r.rank == 999.0));
    }

    #[test]
    fn missing_renderer_falls_back_to_raw_text() {
        let rows = vec![rec("plain", 0.0)];
        let table = render_table(&test_columns(), &rows);
        assert_eq!(table.rows[0][1], Cell::plain("plain"));
    }

    #[test]
    fn missing_field_renders_empty_cell() {
        let rows = vec![rec("x", 1.0)];
        let table = render_table(&test_columns(), &rows);
        assert_eq!(table.rows[0][3].text, "");
    }

    #[test]
    fn renderer_receives_value() {
        let rows = vec![rec("x", 3.14)];
        let table = render_table(&test_columns(), &rows);
        assert_eq!(table.rows[0][2].text, "3.1");
        assert_eq!(table.rows[0][2].tone, Tone::Accent);
    }

    #[test]
    fn header_matches_labels() {
        let table = render_table(&test_columns(), &[] as &[Rec]);
        assert_eq!(table.header, vec!["#", "Name", "Score", "Maybe"]);
        assert!(table.is_empty());
    }

    #[test]
    fn stable_under_rerender() {
        let rows = vec![rec("a", 1.0), rec("b", 2.0)];
        let cols = test_columns();
        assert_eq!(render_table(&cols, &rows), render_table(&cols, &rows));
    }

    proptest! {
        #[test]
        fn row_and_cell_counts_hold(names in proptest::collection::vec("[a-z]{1,8}", 0..40)) {
            let rows: Vec<Rec> = names
                .iter()
                .enumerate()
                .map(|(i, n)| rec(n, i as f64))
                .collect();
            let cols = test_columns();
            let table = render_table(&cols, &rows);
            prop_assert_eq!(table.rows.len(), rows.len());
            for (i, cells) in table.rows.iter().enumerate() {
                prop_assert_eq!(cells.len(), cols.len());
                prop_assert_eq!(cells[0].text.clone(), (i + 1).to_string());
            }
        }
    }
}
