mod aggregate;
mod compare;
mod rank;

pub use aggregate::{AggregateBuilder, EntryCounts, UrlAggregate, aggregate};
pub use compare::{ComparisonReport, ComparisonRow, ComparisonSummary, Trend, compare};
pub use rank::{DEFAULT_TOP_N, RankedEntry, RankingReport, RankingSummary, rank};

use serde::Serialize;

/// A result row with its 1-based position in the ordered output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub rank: usize,
    #[serde(flatten)]
    pub item: T,
}

impl<T> Ranked<T> {
    /// Number rows in order, keeping at most `top_n`
    pub fn top(items: impl IntoIterator<Item = T>, top_n: usize) -> Vec<Self> {
        items
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(idx, item)| Ranked {
                rank: idx + 1,
                item,
            })
            .collect()
    }
}

/// Round the exact binary value to `places` decimals, ties to even
fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}
