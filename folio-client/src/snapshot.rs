//! One-shot analyzer fetch: portfolio, current prices, and the rebalance
//! plan are fetched in parallel, then joined into a single snapshot. The
//! fetch is all-or-nothing so the view never shows half-joined data.

use std::thread;

use chrono::{Days, NaiveDate};

use folio_core::domain::{
    ComparisonRow, NewsItem, Portfolio, PriceMap, RebalancePlan, ScorecardEntry,
};
use folio_core::join::{comparison_rows, enrich_rebalance, summarize, PortfolioSummary};

use crate::cached::CachedClient;
use crate::error::ApiError;

/// Everything the analyzer view needs for one (from, to) date pair.
#[derive(Debug, Clone)]
pub struct AnalyzerSnapshot {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub comparison: Vec<ComparisonRow>,
    pub plan: RebalancePlan,
    pub summary: PortfolioSummary,
}

pub fn fetch_snapshot(
    client: &CachedClient,
    from: NaiveDate,
    to: NaiveDate,
    num_stocks: u32,
    investment: f64,
) -> Result<AnalyzerSnapshot, ApiError> {
    let (portfolio, prices, plan) = thread::scope(|scope| {
        let portfolio = scope.spawn(|| client.portfolio(from, num_stocks, investment));
        let prices = scope.spawn(|| client.universe_prices(to));
        let plan = scope.spawn(|| client.rebalance(from, to, num_stocks, investment));
        (join(portfolio), join(prices), join(plan))
    });
    Ok(assemble(from, to, &portfolio?, &prices?, plan?))
}

fn join<T: Send>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Join the three fetched payloads into a snapshot. Pure; split out from
/// [`fetch_snapshot`] so the merge is testable without a server.
fn assemble(
    from: NaiveDate,
    to: NaiveDate,
    portfolio: &Portfolio,
    prices: &PriceMap,
    mut plan: RebalancePlan,
) -> AnalyzerSnapshot {
    let comparison = comparison_rows(portfolio, prices);
    enrich_rebalance(&mut plan, portfolio);
    let summary = summarize(&comparison, &plan);
    AnalyzerSnapshot {
        from,
        to,
        comparison,
        plan,
        summary,
    }
}

/// Fetch the scorecard for `date`, falling back to the previous day when
/// the requested day has not been published yet. Returns the date actually
/// served alongside the rows.
pub fn scorecard_with_fallback(
    client: &CachedClient,
    date: NaiveDate,
) -> Result<(NaiveDate, Vec<ScorecardEntry>), ApiError> {
    let first = client.scorecard(date);
    match previous_day(date, &first) {
        Some(earlier) => client.scorecard(earlier).map(|rows| (earlier, rows)),
        None => first.map(|rows| (date, rows)),
    }
}

/// Same day-before fallback for broker news.
pub fn news_with_fallback(
    client: &CachedClient,
    date: NaiveDate,
) -> Result<(NaiveDate, Vec<NewsItem>), ApiError> {
    let first = client.stock_news(date);
    match previous_day(date, &first) {
        Some(earlier) => client.stock_news(earlier).map(|rows| (earlier, rows)),
        None => first.map(|rows| (date, rows)),
    }
}

/// The day to retry with, or None when the first result stands. Only a
/// missing or empty publication triggers the fallback; real failures
/// propagate as-is.
fn previous_day<T>(date: NaiveDate, first: &Result<Vec<T>, ApiError>) -> Option<NaiveDate> {
    let absent = match first {
        Ok(rows) => rows.is_empty(),
        Err(ApiError::NotFound { .. }) => true,
        Err(_) => false,
    };
    if absent {
        date.checked_sub_days(Days::new(1))
    } else {
        None
    }
}
