//! Folio core — domain types and pure logic for the portfolio terminal client.
//!
//! Everything here is I/O-free: row shapes as they arrive from the backend,
//! the declarative table rendering mechanism, the holdings/prices/rebalance
//! join, the login session state machine, a bounded LRU cache, and the
//! broker-news consensus pass. The HTTP layer lives in `folio-client`; the
//! terminal front-ends consume `RenderedTable`s produced here.

pub mod cache;
pub mod columns;
pub mod domain;
pub mod join;
pub mod news;
pub mod session;
pub mod table;

pub use cache::LruCache;
pub use domain::{
    ComparisonRow, Holding, NewsItem, Portfolio, PriceMap, RebalanceEntry, RebalancePlan,
    ScorecardEntry,
};
pub use join::{comparison_rows, enrich_rebalance, summarize, PortfolioSummary};
pub use session::{Profile, Session, SessionState};
pub use table::{render_row, render_table, Cell, Column, ColumnSource, RenderedTable, Tone, Value};
