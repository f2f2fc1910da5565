use super::{Ranked, UrlAggregate};
use serde::Serialize;

/// Number of rows shown when no explicit limit is given
pub const DEFAULT_TOP_N: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub url: String,
    pub elapsed_ms: f64,
}

/// Sort an aggregate by latency, slowest first, keeping at most `top_n` rows.
///
/// The sort is stable, so equal latencies keep the aggregate's iteration
/// order (URL order). Do not rely on that order to mean anything about the
/// captures.
pub fn rank(aggregate: &UrlAggregate, top_n: usize) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = aggregate
        .iter()
        .map(|(url, elapsed_ms)| RankedEntry {
            url: url.to_string(),
            elapsed_ms,
        })
        .collect();

    ranked.sort_by(|a, b| b.elapsed_ms.total_cmp(&a.elapsed_ms));
    ranked.truncate(top_n);
    ranked
}

/// Statistics over the displayed slice of a ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingSummary {
    pub count: usize,
    pub slowest: Option<RankedEntry>,
    pub fastest: Option<RankedEntry>,
    pub max_ms: f64,
    pub min_ms: f64,
}

impl RankingSummary {
    pub fn from_entries(entries: &[RankedEntry]) -> Self {
        let times = || entries.iter().map(|e| e.elapsed_ms);

        Self {
            count: entries.len(),
            slowest: entries.first().cloned(),
            fastest: entries.last().cloned(),
            max_ms: times().reduce(f64::max).unwrap_or(0.0),
            min_ms: times().reduce(f64::min).unwrap_or(0.0),
        }
    }
}

/// Single-dataset result: slowest URLs of one directory
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub dataset: String,
    pub total_urls: usize,
    pub entries: Vec<Ranked<RankedEntry>>,
    pub summary: RankingSummary,
}

impl RankingReport {
    pub fn new(dataset: impl Into<String>, aggregate: &UrlAggregate, top_n: usize) -> Self {
        let ranked = rank(aggregate, top_n);
        let summary = RankingSummary::from_entries(&ranked);

        tracing::info!("Ranked {} of {} URLs", ranked.len(), aggregate.len());

        Self {
            dataset: dataset.into(),
            total_urls: aggregate.len(),
            entries: Ranked::top(ranked, top_n),
            summary,
        }
    }
}
