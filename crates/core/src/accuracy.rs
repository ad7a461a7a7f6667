use crate::domain::observation::{Column, ObservationTable, RatingSection};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const TOP_STOCKS: usize = 25;
pub const NO_DATA_MESSAGE: &str = "No rated entries yet";

/// How often the "after" rating agreed with the "before" rating.
#[derive(Debug, Clone, PartialEq)]
pub enum AccuracySummary {
    NoData {
        message: String,
    },
    Report {
        overall: OverallAccuracy,
        stocks: Vec<StockAccuracy>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallAccuracy {
    pub pct: f64,
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAccuracy {
    #[serde(rename = "Stock")]
    pub stock: String,
    pub rated: usize,
    pub correct: usize,
    pub pct: f64,
}

// Wire shape: `{has_data: false, message}` or `{has_data: true, overall, stocks}`.
impl Serialize for AccuracySummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AccuracySummary::NoData { message } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("has_data", &false)?;
                map.serialize_entry("message", message)?;
                map.end()
            }
            AccuracySummary::Report { overall, stocks } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("has_data", &true)?;
                map.serialize_entry("overall", overall)?;
                map.serialize_entry("stocks", stocks)?;
                map.end()
            }
        }
    }
}

pub fn summarize(table: &ObservationTable) -> anyhow::Result<AccuracySummary> {
    table.require_columns(&[Column::Stock])?;

    let qualifying: Vec<_> = table
        .rows
        .iter()
        .filter_map(|row| {
            let before = row.rating(RatingSection::Before)?;
            let after = row.rating(RatingSection::After)?;
            Some((row, before == after))
        })
        .collect();

    if qualifying.is_empty() {
        return Ok(AccuracySummary::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        });
    }

    let total = qualifying.len();
    let correct = qualifying.iter().filter(|(_, hit)| *hit).count();

    // Keyed by the case-insensitive stock id; the first spelling seen is reported.
    let mut per_stock: BTreeMap<String, StockAccuracy> = BTreeMap::new();
    for (row, hit) in &qualifying {
        let entry = per_stock
            .entry(row.stock_key())
            .or_insert_with(|| StockAccuracy {
                stock: row.stock.trim().to_string(),
                rated: 0,
                correct: 0,
                pct: 0.0,
            });
        entry.rated += 1;
        if *hit {
            entry.correct += 1;
        }
    }

    let mut stocks: Vec<StockAccuracy> = per_stock
        .into_values()
        .map(|mut s| {
            s.pct = percentage(s.correct, s.rated);
            s
        })
        .collect();
    stocks.sort_by(|a, b| {
        b.pct
            .partial_cmp(&a.pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    stocks.truncate(TOP_STOCKS);

    tracing::debug!(total, correct, stocks = stocks.len(), "summarized rating accuracy");

    Ok(AccuracySummary::Report {
        overall: OverallAccuracy {
            pct: percentage(correct, total),
            correct,
            total,
        },
        stocks,
    })
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_one_decimal(part as f64 / whole as f64 * 100.0)
}

/// Half-to-even, so 6.25 reports as 6.2.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{observation, rated, table};

    fn report(summary: AccuracySummary) -> (OverallAccuracy, Vec<StockAccuracy>) {
        match summary {
            AccuracySummary::Report { overall, stocks } => (overall, stocks),
            other => panic!("expected a report, got {other:?}"),
        }
    }

    #[test]
    fn per_stock_and_overall_percentages() {
        let t = table(vec![
            rated("01-01-2026", "X", "Buy", "Buy"),
            rated("02-01-2026", "X", "Sell", "Not"),
            rated("03-01-2026", "X", "Buy", "Buy"),
            rated("01-01-2026", "Y", "Not", "Not"),
        ]);
        let (overall, stocks) = report(summarize(&t).unwrap());

        assert_eq!(overall.total, 4);
        assert_eq!(overall.correct, 3);
        assert_eq!(overall.pct, 75.0);

        assert_eq!(stocks[0].stock, "Y");
        assert_eq!(stocks[0].pct, 100.0);
        assert_eq!(stocks[1].stock, "X");
        assert_eq!(stocks[1].rated, 3);
        assert_eq!(stocks[1].correct, 2);
        assert_eq!(stocks[1].pct, 66.7);
    }

    #[test]
    fn rows_missing_either_rating_do_not_count() {
        let t = table(vec![
            rated("01-01-2026", "X", "Buy", ""),
            rated("01-01-2026", "X", "", "Sell"),
            rated("01-01-2026", "X", "buy", "buy"),
            rated("01-01-2026", "X", "Hold", "Hold"),
            observation("01-01-2026", "X", "Energy"),
        ]);
        let summary = summarize(&t).unwrap();
        assert_eq!(
            summary,
            AccuracySummary::NoData {
                message: NO_DATA_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn stock_grouping_ignores_case_and_padding() {
        let t = table(vec![
            rated("01-01-2026", "Acme", "Buy", "Buy"),
            rated("02-01-2026", " ACME ", "Buy", "Sell"),
        ]);
        let (_, stocks) = report(summarize(&t).unwrap());
        assert_eq!(stocks.len(), 1);
        assert_eq!(stocks[0].stock, "Acme");
        assert_eq!(stocks[0].rated, 2);
        assert_eq!(stocks[0].pct, 50.0);
    }

    #[test]
    fn keeps_only_the_top_stocks() {
        let rows = (0..30)
            .map(|i| {
                let after = if i % 2 == 0 { "Buy" } else { "Sell" };
                rated("01-01-2026", &format!("S{i:02}"), "Buy", after)
            })
            .collect();
        let (overall, stocks) = report(summarize(&table(rows)).unwrap());

        assert_eq!(overall.total, 30);
        assert_eq!(stocks.len(), TOP_STOCKS);
        assert!(stocks.windows(2).all(|w| w[0].pct >= w[1].pct));
        // All 15 perfect stocks make the cut, in stock order.
        assert_eq!(stocks[0].stock, "S00");
        assert_eq!(stocks[14].stock, "S28");
        assert_eq!(stocks[15].pct, 0.0);
    }

    #[test]
    fn serializes_with_has_data_flag() {
        let t = table(vec![rated("01-01-2026", "X", "Buy", "Buy")]);
        let value = serde_json::to_value(summarize(&t).unwrap()).unwrap();
        assert_eq!(value["has_data"], true);
        assert_eq!(value["overall"]["pct"], 100.0);
        assert_eq!(value["stocks"][0]["Stock"], "X");
        assert_eq!(value["stocks"][0]["rated"], 1);

        let empty = serde_json::to_value(summarize(&table(vec![])).unwrap()).unwrap();
        assert_eq!(empty["has_data"], false);
        assert_eq!(empty["message"], NO_DATA_MESSAGE);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round_one_decimal(200.0 / 3.0), 66.7);
        assert_eq!(round_one_decimal(100.0 / 3.0), 33.3);
        assert_eq!(percentage(1, 16), 6.2);
        assert_eq!(percentage(5, 16), 31.2);
        assert_eq!(percentage(3, 16), 18.8);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn overall_ties_round_to_even() {
        let mut rows = vec![rated("01-01-2026", "X", "Buy", "Buy")];
        rows.extend((0..15).map(|_| rated("02-01-2026", "X", "Buy", "Sell")));
        let (overall, stocks) = report(summarize(&table(rows)).unwrap());
        assert_eq!((overall.correct, overall.total), (1, 16));
        assert_eq!(overall.pct, 6.2);
        assert_eq!(stocks[0].pct, 6.2);
    }
}
