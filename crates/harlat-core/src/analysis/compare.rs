use super::{Ranked, UrlAggregate, round_to};
use serde::Serialize;

/// One URL present in both datasets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub url: String,
    pub baseline_ms: f64,
    pub candidate_ms: f64,
    /// `candidate_ms - baseline_ms`, positive when the candidate is slower
    pub delta_ms: f64,
    /// Delta relative to the baseline in percent; 0 when the baseline is 0
    pub delta_pct: f64,
}

impl ComparisonRow {
    pub fn new(url: impl Into<String>, baseline_ms: f64, candidate_ms: f64) -> Self {
        let raw_delta = candidate_ms - baseline_ms;
        let delta_pct = if baseline_ms == 0.0 {
            0.0
        } else {
            round_to(raw_delta / baseline_ms * 100.0, 1)
        };

        Self {
            url: url.into(),
            baseline_ms,
            candidate_ms,
            delta_ms: round_to(raw_delta, 2),
            delta_pct,
        }
    }
}

/// Join two aggregates on URL and order by `delta_ms`, largest regression first.
///
/// Only URLs present on both sides produce a row. The sort is stable, so rows
/// with equal deltas stay in URL order.
pub fn compare(baseline: &UrlAggregate, candidate: &UrlAggregate) -> Vec<ComparisonRow> {
    let mut rows: Vec<ComparisonRow> = baseline
        .iter()
        .filter_map(|(url, baseline_ms)| {
            candidate
                .get(url)
                .map(|candidate_ms| ComparisonRow::new(url, baseline_ms, candidate_ms))
        })
        .collect();

    rows.sort_by(|a, b| b.delta_ms.total_cmp(&a.delta_ms));

    tracing::debug!(
        "Compared {} baseline URLs against {} candidate URLs: {} in common",
        baseline.len(),
        candidate.len(),
        rows.len()
    );

    rows
}

/// Overall direction of a comparison, from the sign of the mean delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Slower,
    Faster,
    Unchanged,
}

/// Statistics over every joined row, not just the displayed ones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub total: usize,
    pub regressions: usize,
    pub improvements: usize,
    pub unchanged: usize,
    pub regression_pct: f64,
    pub improvement_pct: f64,
    pub unchanged_pct: f64,
    pub mean_delta_ms: f64,
    pub mean_delta_pct: f64,
    pub trend: Trend,
}

impl ComparisonSummary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let total = rows.len();
        let regressions = rows.iter().filter(|r| r.delta_ms > 0.0).count();
        let improvements = rows.iter().filter(|r| r.delta_ms < 0.0).count();
        let unchanged = total - regressions - improvements;

        let share = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };
        let mean = |sum: f64| if total == 0 { 0.0 } else { sum / total as f64 };

        let mean_delta_ms = mean(rows.iter().map(|r| r.delta_ms).sum());
        let mean_delta_pct = mean(rows.iter().map(|r| r.delta_pct).sum());

        let trend = if mean_delta_ms > 0.0 {
            Trend::Slower
        } else if mean_delta_ms < 0.0 {
            Trend::Faster
        } else {
            Trend::Unchanged
        };

        Self {
            total,
            regressions,
            improvements,
            unchanged,
            regression_pct: share(regressions),
            improvement_pct: share(improvements),
            unchanged_pct: share(unchanged),
            mean_delta_ms,
            mean_delta_pct,
            trend,
        }
    }
}

/// Two-dataset result: candidate measured against baseline
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub baseline: String,
    pub candidate: String,
    pub common_urls: usize,
    pub rows: Vec<Ranked<ComparisonRow>>,
    pub summary: ComparisonSummary,
}

impl ComparisonReport {
    pub fn new(
        baseline_label: impl Into<String>,
        baseline: &UrlAggregate,
        candidate_label: impl Into<String>,
        candidate: &UrlAggregate,
        top_n: usize,
    ) -> Self {
        let rows = compare(baseline, candidate);
        let summary = ComparisonSummary::from_rows(&rows);

        tracing::info!(
            "Comparison complete: {} common URLs, {} slower, {} faster",
            summary.total,
            summary.regressions,
            summary.improvements
        );

        Self {
            baseline: baseline_label.into(),
            candidate: candidate_label.into(),
            common_urls: rows.len(),
            rows: Ranked::top(rows, top_n),
            summary,
        }
    }

    pub fn has_common_urls(&self) -> bool {
        self.common_urls > 0
    }
}
