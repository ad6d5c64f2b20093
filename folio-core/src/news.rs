//! Broker-news analytics: recommendation normalization, search filtering,
//! and the multi-broker consensus pass.

use chrono::NaiveDate;

use crate::domain::NewsItem;

/// Minimum search term length before filtering applies.
const MIN_SEARCH_LEN: usize = 3;

/// Normalized broker recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
    Accumulate,
    Other(String),
}

impl Recommendation {
    /// Case-insensitive normalization ("BUY", "Buy", "buy" → Buy).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" => Recommendation::Buy,
            "SELL" => Recommendation::Sell,
            "HOLD" => Recommendation::Hold,
            "ACCUMULATE" => Recommendation::Accumulate,
            _ => Recommendation::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Sell => "SELL",
            Recommendation::Hold => "HOLD",
            Recommendation::Accumulate => "ACCUMULATE",
            Recommendation::Other(raw) => raw,
        }
    }
}

/// Consensus across brokers covering one stock.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokerConsensus {
    pub stock: String,
    pub url: Option<String>,
    pub note_count: usize,
    pub consensus: Recommendation,
    /// Mean target over the notes that carry one.
    pub avg_target: Option<f64>,
    pub latest: Option<NaiveDate>,
}

/// Group notes by stock and derive per-stock consensus, sorted by coverage
/// (count desc, then stock name asc). Majority recommendation wins; ties
/// break toward the recommendation of the most recent note.
pub fn consensus(notes: &[NewsItem]) -> Vec<BrokerConsensus> {
    let mut stocks: Vec<&str> = notes.iter().map(|n| n.stock.as_str()).collect();
    stocks.sort_unstable();
    stocks.dedup();

    let mut result: Vec<BrokerConsensus> = stocks
        .into_iter()
        .map(|stock| {
            let group: Vec<&NewsItem> = notes.iter().filter(|n| n.stock == stock).collect();
            BrokerConsensus {
                stock: stock.to_string(),
                url: group.iter().find_map(|n| n.url.clone()),
                note_count: group.len(),
                consensus: majority_recommendation(&group),
                avg_target: mean_target(&group),
                latest: group.iter().filter_map(|n| n.published()).max(),
            }
        })
        .collect();

    result.sort_by(|a, b| {
        b.note_count
            .cmp(&a.note_count)
            .then_with(|| a.stock.cmp(&b.stock))
    });
    result
}

fn majority_recommendation(group: &[&NewsItem]) -> Recommendation {
    let mut tallies: Vec<(Recommendation, usize, Option<NaiveDate>)> = Vec::new();
    for note in group {
        let rec = Recommendation::parse(&note.recommendation);
        let date = note.published();
        match tallies.iter_mut().find(|(r, _, _)| *r == rec) {
            Some((_, count, newest)) => {
                *count += 1;
                if date > *newest {
                    *newest = date;
                }
            }
            None => tallies.push((rec, 1, date)),
        }
    }
    tallies
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| a.2.cmp(&b.2)))
        .map(|(rec, _, _)| rec)
        .unwrap_or(Recommendation::Hold)
}

fn mean_target(group: &[&NewsItem]) -> Option<f64> {
    let targets: Vec<f64> = group.iter().filter_map(|n| n.target_price).collect();
    if targets.is_empty() {
        return None;
    }
    Some(targets.iter().sum::<f64>() / targets.len() as f64)
}

/// Case-insensitive substring filter over stock names. Terms shorter than
/// three characters leave the list unfiltered.
pub fn filter_news<'a>(notes: &'a [NewsItem], term: &str) -> Vec<&'a NewsItem> {
    if term.len() < MIN_SEARCH_LEN {
        return notes.iter().collect();
    }
    let needle = term.to_lowercase();
    notes
        .iter()
        .filter(|n| n.stock.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(stock: &str, broker: &str, rec: &str, target: Option<f64>, date: &str) -> NewsItem {
        NewsItem {
            stock: stock.into(),
            broker: broker.into(),
            recommendation: rec.into(),
            target_price: target,
            published_date: date.into(),
            url: Some(format!("https://example.com/{}", stock.to_lowercase())),
        }
    }

    #[test]
    fn normalization_is_case_insensitive() {
        assert_eq!(Recommendation::parse("BUY"), Recommendation::Buy);
        assert_eq!(Recommendation::parse("Buy"), Recommendation::Buy);
        assert_eq!(Recommendation::parse("accumulate"), Recommendation::Accumulate);
        assert_eq!(
            Recommendation::parse("Outperform"),
            Recommendation::Other("Outperform".into())
        );
    }

    #[test]
    fn consensus_majority_and_mean_target() {
        let notes = vec![
            note("TCS", "Sharekhan", "BUY", Some(4000.0), "2024-03-01"),
            note("TCS", "Motilal", "Buy", Some(4200.0), "2024-03-02"),
            note("TCS", "ICICI", "SELL", Some(3500.0), "2024-03-03"),
            note("IOC", "Axis", "HOLD", None, "2024-03-01"),
        ];
        let result = consensus(&notes);
        assert_eq!(result.len(), 2);
        // TCS has more coverage, sorts first.
        assert_eq!(result[0].stock, "TCS");
        assert_eq!(result[0].note_count, 3);
        assert_eq!(result[0].consensus, Recommendation::Buy);
        assert_eq!(result[0].avg_target, Some(3900.0));
        assert_eq!(
            result[0].latest,
            NaiveDate::from_ymd_opt(2024, 3, 3)
        );
        assert_eq!(result[1].stock, "IOC");
        assert_eq!(result[1].avg_target, None);
    }

    #[test]
    fn consensus_tie_breaks_toward_recent_note() {
        let notes = vec![
            note("INFY", "A", "SELL", None, "2024-01-01"),
            note("INFY", "B", "BUY", None, "2024-02-01"),
        ];
        let result = consensus(&notes);
        assert_eq!(result[0].consensus, Recommendation::Buy);
    }

    #[test]
    fn equal_coverage_sorts_by_stock_name() {
        let notes = vec![
            note("ZEE", "A", "BUY", None, "2024-01-01"),
            note("ABB", "B", "BUY", None, "2024-01-01"),
        ];
        let result = consensus(&notes);
        assert_eq!(result[0].stock, "ABB");
        assert_eq!(result[1].stock, "ZEE");
    }

    #[test]
    fn short_search_terms_do_not_filter() {
        let notes = vec![note("TCS", "A", "BUY", None, "2024-01-01")];
        assert_eq!(filter_news(&notes, "zz").len(), 1);
        assert_eq!(filter_news(&notes, "").len(), 1);
    }

    #[test]
    fn search_matches_case_insensitively() {
        let notes = vec![
            note("Indian Oil", "A", "BUY", None, "2024-01-01"),
            note("TCS", "B", "SELL", None, "2024-01-01"),
        ];
        let hits = filter_news(&notes, "indian");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stock, "Indian Oil");
    }
}
