//! The fetch-and-merge step: join portfolio holdings against the current
//! universe prices, enrich rebalance entries, and compute the summary the
//! analyzer header shows. All pure; the table layer consumes the output as
//! already-joined rows.

use crate::domain::{ComparisonRow, Portfolio, PriceMap, RebalancePlan};

/// Current price used when a held symbol is absent from the universe
/// snapshot. Kept from the original behavior so holdings never silently
/// disappear from the view.
pub const MISSING_PRICE: f64 = -1.0;

/// Join each holding's symbol against the current price map.
pub fn comparison_rows(portfolio: &Portfolio, prices: &PriceMap) -> Vec<ComparisonRow> {
    portfolio
        .portfolio
        .iter()
        .map(|h| ComparisonRow {
            symbol: h.symbol.clone(),
            stock: h.stock.clone(),
            url: portfolio.tickertape_links.get(&h.symbol).cloned(),
            avg_price: h.price,
            price: prices.get(&h.symbol).copied().unwrap_or(MISSING_PRICE),
            weight: h.weight,
            shares: h.shares,
            investment: h.investment,
        })
        .collect()
}

/// Annotate rebalance entries with display name, detail link, and initial
/// share count via symbol lookup into the portfolio.
pub fn enrich_rebalance(plan: &mut RebalancePlan, portfolio: &Portfolio) {
    for entry in &mut plan.stocks {
        if let Some(holding) = portfolio.portfolio.iter().find(|h| h.symbol == entry.symbol) {
            entry.stock = holding.stock.clone();
            entry.initial_shares = holding.shares;
        }
        entry.url = portfolio.tickertape_links.get(&entry.symbol).cloned();
    }
}

/// Headline numbers for the analyzer view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioSummary {
    pub initial_investment: f64,
    pub current_value: f64,
    pub gains: f64,
    /// Gains as a fraction of the initial investment; None when there was
    /// no initial investment to divide by.
    pub gains_pct: Option<f64>,
    pub buy_count: usize,
    pub sell_count: usize,
    pub hold_count: usize,
}

/// Totals over the joined rows plus buy/sell/hold counts over the plan.
pub fn summarize(rows: &[ComparisonRow], plan: &RebalancePlan) -> PortfolioSummary {
    let initial_investment: f64 = rows.iter().map(|r| r.investment).sum();
    let current_value: f64 = rows.iter().map(|r| r.price * r.shares).sum();
    let gains = current_value - initial_investment;
    let gains_pct = if initial_investment == 0.0 {
        None
    } else {
        Some(gains / initial_investment)
    };

    PortfolioSummary {
        initial_investment,
        current_value,
        gains,
        gains_pct,
        buy_count: plan.stocks.iter().filter(|s| s.shares > 0.0).count(),
        sell_count: plan.stocks.iter().filter(|s| s.shares < 0.0).count(),
        hold_count: plan.stocks.iter().filter(|s| s.shares == 0.0).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Holding, RebalanceEntry};
    use std::collections::BTreeMap;

    fn holding(symbol: &str, price: f64, shares: f64, investment: f64) -> Holding {
        Holding {
            symbol: symbol.into(),
            stock: format!("{symbol} Ltd"),
            price,
            weight: 0.1,
            shares,
            investment,
            composite_score: 0.0,
            returns: BTreeMap::new(),
        }
    }

    fn portfolio() -> Portfolio {
        Portfolio {
            tickertape_links: BTreeMap::from([(
                "IOC".to_string(),
                "https://example.com/ioc".to_string(),
            )]),
            portfolio: vec![holding("IOC", 100.0, 50.0, 5000.0), holding("TCS", 40.0, 10.0, 400.0)],
        }
    }

    #[test]
    fn join_picks_current_prices_and_links() {
        let prices = PriceMap::from([("IOC".to_string(), 120.0), ("TCS".to_string(), 38.0)]);
        let rows = comparison_rows(&portfolio(), &prices);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].avg_price, 100.0);
        assert_eq!(rows[0].price, 120.0);
        assert_eq!(rows[0].url.as_deref(), Some("https://example.com/ioc"));
        assert!(rows[1].url.is_none());
    }

    #[test]
    fn missing_symbol_gets_sentinel_price() {
        let prices = PriceMap::from([("IOC".to_string(), 120.0)]);
        let rows = comparison_rows(&portfolio(), &prices);
        assert_eq!(rows[1].price, MISSING_PRICE);
    }

    #[test]
    fn rebalance_enrichment_fills_name_link_and_initial_shares() {
        let mut plan = RebalancePlan {
            stocks: vec![
                RebalanceEntry {
                    symbol: "IOC".into(),
                    amount: -1000.0,
                    shares: -10.0,
                    stock: String::new(),
                    url: None,
                    initial_shares: 0.0,
                },
                RebalanceEntry {
                    symbol: "NEW".into(),
                    amount: 2000.0,
                    shares: 20.0,
                    stock: String::new(),
                    url: None,
                    initial_shares: 0.0,
                },
            ],
            capital_incurred: 1000.0,
        };
        enrich_rebalance(&mut plan, &portfolio());
        assert_eq!(plan.stocks[0].stock, "IOC Ltd");
        assert_eq!(plan.stocks[0].initial_shares, 50.0);
        assert_eq!(plan.stocks[0].url.as_deref(), Some("https://example.com/ioc"));
        // Unknown symbol stays unenriched.
        assert_eq!(plan.stocks[1].stock, "");
        assert_eq!(plan.stocks[1].initial_shares, 0.0);
    }

    #[test]
    fn summary_totals_and_counts() {
        let prices = PriceMap::from([("IOC".to_string(), 120.0), ("TCS".to_string(), 38.0)]);
        let rows = comparison_rows(&portfolio(), &prices);
        let plan = RebalancePlan {
            stocks: vec![
                RebalanceEntry {
                    symbol: "A".into(),
                    amount: 0.0,
                    shares: 5.0,
                    stock: String::new(),
                    url: None,
                    initial_shares: 0.0,
                },
                RebalanceEntry {
                    symbol: "B".into(),
                    amount: 0.0,
                    shares: -5.0,
                    stock: String::new(),
                    url: None,
                    initial_shares: 0.0,
                },
                RebalanceEntry {
                    symbol: "C".into(),
                    amount: 0.0,
                    shares: 0.0,
                    stock: String::new(),
                    url: None,
                    initial_shares: 0.0,
                },
            ],
            capital_incurred: 0.0,
        };
        let summary = summarize(&rows, &plan);
        assert_eq!(summary.initial_investment, 5400.0);
        // 120*50 + 38*10 = 6380
        assert_eq!(summary.current_value, 6380.0);
        assert_eq!(summary.gains, 980.0);
        assert_eq!(summary.buy_count, 1);
        assert_eq!(summary.sell_count, 1);
        assert_eq!(summary.hold_count, 1);
    }

    #[test]
    fn empty_portfolio_has_no_gains_pct() {
        let summary = summarize(&[], &RebalancePlan { stocks: vec![], capital_incurred: 0.0 });
        assert!(summary.gains_pct.is_none());
    }
}
