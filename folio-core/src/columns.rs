//! Column descriptor sets for the three table kinds, plus their formatters.
//!
//! Sign conventions from the rebalance domain are preserved exactly: a
//! negative currency amount is money received (favorable tone), positive is
//! money required (unfavorable). Zero-divisor inputs render as a dash cell
//! instead of propagating non-finite values to the UI.

use crate::domain::{ComparisonRow, Holding, RebalanceEntry};
use crate::table::{Cell, Column, Tone, Value};

/// Placeholder for values that cannot be computed (zero divisor, absent price).
pub const DASH: &str = "\u{2014}";

/// Round to 2 decimal places. Idempotent: `round2(round2(x)) == round2(x)`.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Rupee amount with Indian digit grouping and 2 fixed decimals,
/// e.g. `1234567.89` → `₹12,34,567.89`.
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}\u{20B9}{}.{frac_part}", group_indian(int_part))
}

/// Indian-style grouping: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let bytes = head.as_bytes();
    let mut end = bytes.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// Percent change of current price versus average entry price.
///
/// The divisor is the CURRENT price (the original source disagreed with
/// itself across revisions; this is the pinned definition). None when the
/// current price is zero.
pub fn percent_change(avg_price: f64, price: f64) -> Option<f64> {
    if price == 0.0 {
        return None;
    }
    Some((price - avg_price) / price * 100.0)
}

/// Derived rebalance action for a signed share delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Hold,
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// True when the delta neither fully clears nor exactly doubles the
    /// existing position.
    pub partial: bool,
}

impl Action {
    pub fn label(&self) -> String {
        let base = match self.kind {
            ActionKind::Hold => "Hold",
            ActionKind::Buy => "Buy",
            ActionKind::Sell => "Sell",
        };
        if self.partial {
            format!("Partial {base}")
        } else {
            base.to_string()
        }
    }

    pub fn tone(&self) -> Tone {
        match self.kind {
            ActionKind::Hold => Tone::Muted,
            ActionKind::Buy => Tone::Favorable,
            ActionKind::Sell => Tone::Unfavorable,
        }
    }
}

/// Delta = 0 → Hold, > 0 → Buy, < 0 → Sell; marked partial when the
/// magnitude differs from the prior share count (and both are non-zero).
pub fn derive_action(delta: f64, initial_shares: f64) -> Action {
    let kind = if delta == 0.0 {
        ActionKind::Hold
    } else if delta > 0.0 {
        ActionKind::Buy
    } else {
        ActionKind::Sell
    };
    let partial = initial_shares != 0.0 && delta != 0.0 && initial_shares != delta.abs();
    Action { kind, partial }
}

/// Tone for a signed currency amount: negative = money received = favorable.
pub fn amount_tone(amount: f64) -> Tone {
    if amount == 0.0 {
        Tone::Muted
    } else if amount < 0.0 {
        Tone::Favorable
    } else {
        Tone::Unfavorable
    }
}

fn currency_cell<R>(value: Value, _row: &R) -> Cell {
    match value.as_num() {
        Some(n) => Cell::toned(format_inr(n), Tone::Default),
        None => Cell::toned(DASH, Tone::Muted),
    }
}

fn round2_cell<R>(value: Value, _row: &R) -> Cell {
    match value.as_num() {
        Some(n) => Cell::plain(round2(n).to_string()),
        None => Cell::toned(DASH, Tone::Muted),
    }
}

/// Columns for the portfolio holdings table.
pub fn holdings_columns() -> Vec<Column<Holding>> {
    vec![
        Column::rank("S.No."),
        Column::rendered(
            "Symbol",
            |r: &Holding| Some(Value::Text(r.symbol.clone())),
            |v, _| Cell::toned(v.to_string(), Tone::Accent),
        ),
        Column::rendered("Price", |r| Some(Value::Num(r.price)), currency_cell),
        Column::rendered("Weight", |r| Some(Value::Num(r.weight)), round2_cell),
        Column::rendered("Shares", |r| Some(Value::Num(r.shares)), round2_cell),
        Column::rendered(
            "Investment",
            |r| Some(Value::Num(r.investment)),
            currency_cell,
        ),
        Column::rendered(
            "Score",
            |r| Some(Value::Num(r.composite_score)),
            round2_cell,
        ),
    ]
}

/// Columns for the holdings-vs-current-prices comparison table.
pub fn comparison_columns() -> Vec<Column<ComparisonRow>> {
    vec![
        Column::rank("Rank"),
        Column::rendered(
            "Symbol",
            |r: &ComparisonRow| Some(Value::Text(r.symbol.clone())),
            |v, r| Cell::linked(v.to_string(), Tone::Accent, r.url.clone()),
        ),
        Column::rendered(
            "Avg. Price",
            |r| Some(Value::Num(r.avg_price)),
            currency_cell,
        ),
        Column::rendered("Weight", |r| Some(Value::Num(r.weight)), round2_cell),
        Column::rendered("Shares", |r| Some(Value::Num(r.shares)), round2_cell),
        Column::rendered(
            "Investment",
            |r| Some(Value::Num(r.investment)),
            currency_cell,
        ),
        Column::rendered(
            "Current Price",
            |r| Some(Value::Num(r.price)),
            currency_cell,
        ),
        Column::rendered(
            "Profit/Loss",
            |r| Some(Value::Num(r.price)),
            |v, r| {
                let price = v.as_num().unwrap_or(r.price);
                let diff = (price - r.avg_price) * r.shares;
                let tone = if diff < 0.0 {
                    Tone::Unfavorable
                } else {
                    Tone::Favorable
                };
                Cell::toned(format_inr(diff), tone)
            },
        ),
        Column::rendered(
            "Change",
            |r| Some(Value::Num(r.price)),
            |v, r| {
                let price = v.as_num().unwrap_or(r.price);
                match percent_change(r.avg_price, price) {
                    None => Cell::toned(DASH, Tone::Muted),
                    Some(diff) => {
                        let tone = if diff < 0.0 {
                            Tone::Unfavorable
                        } else {
                            Tone::Favorable
                        };
                        Cell::toned(format!("{:.2}", round2(diff)), tone)
                    }
                }
            },
        ),
    ]
}

/// Columns for the rebalance action table.
pub fn rebalance_columns() -> Vec<Column<RebalanceEntry>> {
    vec![
        Column::rank("S.No."),
        Column::rendered(
            "Symbol",
            |r: &RebalanceEntry| Some(Value::Text(r.symbol.clone())),
            |v, r| Cell::linked(v.to_string(), Tone::Accent, r.url.clone()),
        ),
        Column::rendered(
            "Amount",
            |r| Some(Value::Num(r.amount)),
            |v, _| {
                let amount = v.as_num().unwrap_or(0.0);
                Cell::toned(format_inr(amount), amount_tone(amount))
            },
        ),
        Column::rendered(
            "Shares",
            |r| Some(Value::Num(r.shares)),
            |v, r| {
                let delta = round2(v.as_num().unwrap_or(0.0));
                let text = if r.initial_shares != 0.0 {
                    format!("{} / {}", delta, round2(r.initial_shares))
                } else {
                    delta.to_string()
                };
                Cell::plain(text)
            },
        ),
        Column::rendered(
            "Action",
            |r| Some(Value::Num(r.shares)),
            |v, r| {
                let action = derive_action(v.as_num().unwrap_or(0.0), r.initial_shares);
                Cell::toned(action.label(), action.tone())
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::render_table;

    fn entry(amount: f64, shares: f64, initial: f64) -> RebalanceEntry {
        RebalanceEntry {
            symbol: "IOC".into(),
            amount,
            shares,
            stock: "Indian Oil Corporation Ltd".into(),
            url: Some("https://example.com/ioc".into()),
            initial_shares: initial,
        }
    }

    #[test]
    fn round2_is_idempotent() {
        for x in [0.005, 1.23456, -9.876, 33.333333, 1e6 + 0.555] {
            assert_eq!(round2(round2(x)), round2(x));
        }
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_inr(0.0), "\u{20B9}0.00");
        assert_eq!(format_inr(123.4), "\u{20B9}123.40");
        assert_eq!(format_inr(1234.0), "\u{20B9}1,234.00");
        assert_eq!(format_inr(1234567.89), "\u{20B9}12,34,567.89");
        assert_eq!(format_inr(-500000.0), "-\u{20B9}5,00,000.00");
    }

    #[test]
    fn percent_change_divides_by_current_price() {
        let diff = percent_change(100.0, 150.0).unwrap();
        assert_eq!(round2(diff), 33.33);
    }

    #[test]
    fn percent_change_guards_zero_price() {
        assert!(percent_change(100.0, 0.0).is_none());
    }

    #[test]
    fn signed_amount_tones() {
        assert_eq!(amount_tone(-100.0), Tone::Favorable);
        assert_eq!(amount_tone(100.0), Tone::Unfavorable);
        assert_eq!(amount_tone(0.0), Tone::Muted);
    }

    #[test]
    fn action_derivation() {
        assert_eq!(derive_action(0.0, 50.0).label(), "Hold");
        // Full double: delta equals existing shares, not partial.
        assert_eq!(derive_action(50.0, 50.0).label(), "Buy");
        assert_eq!(derive_action(30.0, 50.0).label(), "Partial Buy");
        assert_eq!(derive_action(-50.0, 50.0).label(), "Sell");
        assert_eq!(derive_action(-20.0, 50.0).label(), "Partial Sell");
        // Fresh position: nothing to be partial against.
        assert!(!derive_action(10.0, 0.0).partial);
    }

    #[test]
    fn rebalance_table_renders_shares_against_initial() {
        let rows = vec![entry(-2500.0, -20.0, 50.0)];
        let table = render_table(&rebalance_columns(), &rows);
        let cells = &table.rows[0];
        assert_eq!(cells[0].text, "1");
        assert_eq!(cells[1].link.as_deref(), Some("https://example.com/ioc"));
        assert_eq!(cells[2].tone, Tone::Favorable);
        assert_eq!(cells[3].text, "-20 / 50");
        assert_eq!(cells[4].text, "Partial Sell");
    }

    #[test]
    fn holdings_table_formats_prices_and_score() {
        let rows = vec![Holding {
            symbol: "IOC".into(),
            stock: "Indian Oil Corporation Ltd".into(),
            price: 130.5,
            weight: 0.0834,
            shares: 120.0,
            investment: 15660.0,
            composite_score: 23.456,
            returns: Default::default(),
        }];
        let table = render_table(&holdings_columns(), &rows);
        let cells = &table.rows[0];
        assert_eq!(cells[1].text, "IOC");
        assert_eq!(cells[1].tone, Tone::Accent);
        assert_eq!(cells[2].text, "\u{20B9}130.50");
        assert_eq!(cells[3].text, "0.08");
        assert_eq!(cells[6].text, "23.46");
    }

    #[test]
    fn comparison_profit_loss_and_change() {
        let row = ComparisonRow {
            symbol: "TCS".into(),
            stock: "Tata Consultancy Services".into(),
            url: None,
            avg_price: 100.0,
            price: 150.0,
            weight: 0.1,
            shares: 10.0,
            investment: 1000.0,
        };
        let table = render_table(&comparison_columns(), std::slice::from_ref(&row));
        let cells = &table.rows[0];
        // (150 - 100) * 10 = 500 profit
        assert_eq!(cells[7].text, "\u{20B9}500.00");
        assert_eq!(cells[7].tone, Tone::Favorable);
        assert_eq!(cells[8].text, "33.33");
    }

    #[test]
    fn comparison_zero_price_renders_dash_change() {
        let row = ComparisonRow {
            symbol: "GONE".into(),
            stock: String::new(),
            url: None,
            avg_price: 100.0,
            price: 0.0,
            weight: 0.0,
            shares: 0.0,
            investment: 0.0,
        };
        let table = render_table(&comparison_columns(), std::slice::from_ref(&row));
        assert_eq!(table.rows[0][8].text, DASH);
    }
}
