//! Wire-facing row shapes, as the backend serves them.
//!
//! Extra JSON fields are tolerated everywhere; a particular column set simply
//! ignores what it does not read.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One period's return stats inside a holding ("1y" / "1mo" / "1w").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReturn {
    #[serde(rename = "return")]
    pub ret: f64,
    pub vwap: f64,
    pub rsi: f64,
}

/// A single stock position in the portfolio-at-date response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    /// Full instrument name.
    pub stock: String,
    pub price: f64,
    pub weight: f64,
    pub shares: f64,
    pub investment: f64,
    #[serde(default)]
    pub composite_score: f64,
    #[serde(default)]
    pub returns: BTreeMap<String, PeriodReturn>,
}

/// The portfolio endpoint payload: holdings plus symbol → detail-link map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub tickertape_links: BTreeMap<String, String>,
    pub portfolio: Vec<Holding>,
}

/// Current universe snapshot: symbol → latest price.
pub type PriceMap = BTreeMap<String, f64>;

/// One recommended signed change in share count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceEntry {
    pub symbol: String,
    /// Signed currency amount. Negative means money received.
    pub amount: f64,
    /// Signed share delta. Positive buys, negative sells, zero holds.
    pub shares: f64,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub initial_shares: f64,
}

/// The rebalance endpoint payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancePlan {
    pub stocks: Vec<RebalanceEntry>,
    #[serde(default)]
    pub capital_incurred: f64,
}

/// A holding joined against the current price map. Produced by
/// [`crate::join::comparison_rows`], never deserialized directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub symbol: String,
    pub stock: String,
    pub url: Option<String>,
    pub avg_price: f64,
    /// Current price; -1.0 when the symbol is absent from the universe snapshot.
    pub price: f64,
    pub weight: f64,
    pub shares: f64,
    pub investment: f64,
}

/// One stock's qualitative factor ratings plus composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardEntry {
    pub stock: String,
    pub symbol: String,
    /// Factor name → qualitative color ("green" / "yellow" / "red").
    #[serde(default)]
    pub score_card: BTreeMap<String, String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub composite_score: f64,
}

/// One broker note from the news endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub stock: String,
    pub broker: String,
    pub recommendation: String,
    #[serde(default)]
    pub target_price: Option<f64>,
    /// Publication timestamp as served ("YYYY-MM-DD ..." prefix).
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl NewsItem {
    /// Parse the date prefix of `published_date`. None when malformed.
    pub fn published(&self) -> Option<NaiveDate> {
        let prefix = self.published_date.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portfolio_deserializes_with_extra_fields() {
        let json = r#"{
            "tickertape_links": {"IOC": "https://example.com/ioc"},
            "portfolio": [{
                "symbol": "IOC",
                "stock": "Indian Oil Corporation Ltd",
                "price": 130.5,
                "weight": 0.08,
                "shares": 120,
                "investment": 15660.0,
                "composite_score": 23,
                "returns": {"1y": {"return": 0.4, "vwap": 110.0, "rsi": 61.0}},
                "unknown_extra": true
            }]
        }"#;
        let p: Portfolio = serde_json::from_str(json).unwrap();
        assert_eq!(p.portfolio.len(), 1);
        assert_eq!(p.portfolio[0].returns["1y"].ret, 0.4);
        assert_eq!(p.tickertape_links["IOC"], "https://example.com/ioc");
    }

    #[test]
    fn rebalance_defaults_enrichment_fields() {
        let json = r#"{"stocks": [{"symbol": "TCS", "amount": -500.0, "shares": -2}],
                       "capital_incurred": -500.0}"#;
        let plan: RebalancePlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.stocks[0].initial_shares, 0.0);
        assert!(plan.stocks[0].url.is_none());
        assert_eq!(plan.capital_incurred, -500.0);
    }

    #[test]
    fn news_date_prefix_parses() {
        let item = NewsItem {
            stock: "TCS".into(),
            broker: "Sharekhan".into(),
            recommendation: "BUY".into(),
            target_price: Some(4200.0),
            published_date: "2024-03-08 10:30:00".into(),
            url: None,
        };
        assert_eq!(
            item.published(),
            NaiveDate::from_ymd_opt(2024, 3, 8)
        );
    }

    #[test]
    fn news_bad_date_is_none() {
        let item = NewsItem {
            stock: "X".into(),
            broker: "Y".into(),
            recommendation: "HOLD".into(),
            target_price: None,
            published_date: "yesterday".into(),
            url: None,
        };
        assert!(item.published().is_none());
    }
}
