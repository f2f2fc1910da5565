use super::round_to;
use crate::filter::{FilterPolicy, Verdict};
use crate::har::CaptureEntry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry as MapEntry;

/// Worst observed latency per URL for one dataset
///
/// Keys are exact, case-sensitive URLs including the query string. Values are
/// the maximum `elapsed_ms` seen for that URL, rounded to 2 decimal places.
/// Iteration is in URL order; that order is a property of the container and
/// carries no meaning about the captures themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UrlAggregate {
    latencies: BTreeMap<String, f64>,
}

impl UrlAggregate {
    pub fn get(&self, url: &str) -> Option<f64> {
        self.latencies.get(url).copied()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.latencies.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.latencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.latencies.iter().map(|(url, ms)| (url.as_str(), *ms))
    }
}

/// Builds an aggregate from `(url, ms)` pairs, keeping the maximum per URL.
impl<S: Into<String>> FromIterator<(S, f64)> for UrlAggregate {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut builder = AggregateBuilder::new(FilterPolicy::new());
        for (url, ms) in iter {
            builder.observe(CaptureEntry::new(url, ms));
        }
        builder.finalize()
    }
}

/// Per-entry bookkeeping for one aggregation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryCounts {
    pub seen: usize,
    pub kept: usize,
    pub streaming: usize,
    pub assets: usize,
    pub off_host: usize,
    pub invalid: usize,
}

impl EntryCounts {
    pub fn add(&mut self, other: &EntryCounts) {
        self.seen += other.seen;
        self.kept += other.kept;
        self.streaming += other.streaming;
        self.assets += other.assets;
        self.off_host += other.off_host;
        self.invalid += other.invalid;
    }

    pub fn filtered(&self) -> usize {
        self.streaming + self.assets + self.off_host
    }
}

/// Running-max accumulator behind [`UrlAggregate`]
///
/// Values are kept unrounded until [`AggregateBuilder::finalize`].
#[derive(Debug, Clone, Default)]
pub struct AggregateBuilder {
    policy: FilterPolicy,
    worst: BTreeMap<String, f64>,
    counts: EntryCounts,
}

impl AggregateBuilder {
    pub fn new(policy: FilterPolicy) -> Self {
        Self {
            policy,
            worst: BTreeMap::new(),
            counts: EntryCounts::default(),
        }
    }

    /// Fold one entry into the running maximum for its URL
    pub fn observe(&mut self, entry: CaptureEntry) {
        self.counts.seen += 1;

        match self.policy.classify(&entry.url) {
            Verdict::Keep => {}
            Verdict::Streaming => {
                self.counts.streaming += 1;
                return;
            }
            Verdict::Asset => {
                self.counts.assets += 1;
                return;
            }
            Verdict::Host => {
                self.counts.off_host += 1;
                return;
            }
        }

        if !entry.elapsed_ms.is_finite() || entry.elapsed_ms < 0.0 {
            tracing::warn!(
                "Skipping entry for {} with invalid time {}",
                entry.url,
                entry.elapsed_ms
            );
            self.counts.invalid += 1;
            return;
        }

        self.counts.kept += 1;
        match self.worst.entry(entry.url) {
            MapEntry::Vacant(slot) => {
                slot.insert(entry.elapsed_ms);
            }
            MapEntry::Occupied(mut slot) => {
                if entry.elapsed_ms > *slot.get() {
                    slot.insert(entry.elapsed_ms);
                }
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = CaptureEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.observe(entry);
        }
    }

    /// Merge another partial fold into this one by taking the max per URL
    pub fn merge(&mut self, other: AggregateBuilder) {
        self.counts.add(&other.counts);
        for (url, ms) in other.worst {
            self.worst
                .entry(url)
                .and_modify(|current| *current = current.max(ms))
                .or_insert(ms);
        }
    }

    pub fn counts(&self) -> &EntryCounts {
        &self.counts
    }

    pub fn finalize(self) -> UrlAggregate {
        UrlAggregate {
            latencies: self
                .worst
                .into_iter()
                .map(|(url, ms)| (url, round_to(ms, 2)))
                .collect(),
        }
    }
}

/// Fold a sequence of capture entries into a URL → worst-latency aggregate
pub fn aggregate<I>(entries: I, filter_assets: bool) -> UrlAggregate
where
    I: IntoIterator<Item = CaptureEntry>,
{
    let mut builder = AggregateBuilder::new(FilterPolicy::new().with_asset_filter(filter_assets));
    builder.extend(entries);
    builder.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, f64)]) -> Vec<CaptureEntry> {
        pairs
            .iter()
            .map(|(url, ms)| CaptureEntry::new(*url, *ms))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_aggregate() {
        let result = aggregate(Vec::new(), true);
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_keeps_worst_latency_per_url() {
        let result = aggregate(entries(&[("https://a/x", 100.0), ("https://a/x", 250.0)]), false);
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("https://a/x"), Some(250.0));
    }

    #[test]
    fn test_max_is_order_independent() {
        let times = [12.5, 980.25, 3.0, 980.24, 41.0];
        let forward: Vec<_> = times.iter().map(|t| ("https://a/x", *t)).collect();
        let backward: Vec<_> = times.iter().rev().map(|t| ("https://a/x", *t)).collect();

        let a = aggregate(entries(&forward), false);
        let b = aggregate(entries(&backward), false);

        assert_eq!(a, b);
        assert_eq!(a.get("https://a/x"), Some(980.25));
    }

    #[test]
    fn test_urls_are_exact_and_case_sensitive() {
        let result = aggregate(
            entries(&[
                ("https://a/x", 1.0),
                ("https://a/X", 2.0),
                ("https://a/x?page=2", 3.0),
            ]),
            false,
        );
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_rounds_at_finalization() {
        let result = aggregate(entries(&[("https://a/x", 123.456_789)]), false);
        assert_eq!(result.get("https://a/x"), Some(123.46));
    }

    #[test]
    fn test_streaming_never_aggregated() {
        let input = entries(&[("wss://example.com/socket", 60_000.0), ("https://a/x", 5.0)]);
        for filter_assets in [false, true] {
            let result = aggregate(input.clone(), filter_assets);
            assert!(!result.contains("wss://example.com/socket"));
            assert!(result.contains("https://a/x"));
        }
    }

    #[test]
    fn test_asset_filter_applies_only_when_enabled() {
        let input = entries(&[
            ("https://cdn.example.com/app.abc123.js?v=2", 40.0),
            ("https://example.com/api/orders", 90.0),
        ]);

        let unfiltered = aggregate(input.clone(), false);
        assert!(unfiltered.contains("https://cdn.example.com/app.abc123.js?v=2"));

        let filtered = aggregate(input, true);
        assert!(!filtered.contains("https://cdn.example.com/app.abc123.js?v=2"));
        assert_eq!(filtered.get("https://example.com/api/orders"), Some(90.0));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let input = entries(&[
            ("https://example.com/static/a", 10.0),
            ("https://example.com/api/a", 20.0),
            ("https://example.com/api/b", 30.0),
            ("https://example.com/logo.svg", 40.0),
        ]);

        let once = aggregate(input.clone(), true);
        let twice = aggregate(
            once.iter().map(|(url, ms)| CaptureEntry::new(url, ms)),
            true,
        );

        assert_eq!(once, twice);
        assert_eq!(once, aggregate(input, true));
    }

    #[test]
    fn test_invalid_times_are_skipped() {
        let mut builder = AggregateBuilder::new(FilterPolicy::new());
        builder.extend(entries(&[
            ("https://a/x", -1.0),
            ("https://a/x", f64::NAN),
            ("https://a/y", f64::INFINITY),
            ("https://a/x", 7.0),
        ]));

        assert_eq!(builder.counts().invalid, 3);
        assert_eq!(builder.counts().kept, 1);

        let result = builder.finalize();
        assert_eq!(result.get("https://a/x"), Some(7.0));
        assert!(!result.contains("https://a/y"));
    }

    #[test]
    fn test_counts_track_drop_reasons() {
        let policy = FilterPolicy::new()
            .with_asset_filter(true)
            .with_hosts(&["api.example.com"])
            .unwrap();
        let mut builder = AggregateBuilder::new(policy);
        builder.extend(entries(&[
            ("wss://api.example.com/live", 1.0),
            ("https://api.example.com/app.css", 2.0),
            ("https://other.example.com/api", 3.0),
            ("https://api.example.com/api", 4.0),
        ]));

        let counts = *builder.counts();
        assert_eq!(counts.seen, 4);
        assert_eq!(counts.streaming, 1);
        assert_eq!(counts.assets, 1);
        assert_eq!(counts.off_host, 1);
        assert_eq!(counts.kept, 1);
        assert_eq!(counts.filtered(), 3);
    }

    #[test]
    fn test_merge_matches_single_fold() {
        let first = entries(&[("https://a/x", 10.0), ("https://a/y", 70.0)]);
        let second = entries(&[("https://a/x", 30.0), ("https://a/z", 5.0)]);

        let mut left = AggregateBuilder::new(FilterPolicy::new());
        left.extend(first.clone());
        let mut right = AggregateBuilder::new(FilterPolicy::new());
        right.extend(second.clone());
        left.merge(right);
        assert_eq!(left.counts().seen, 4);

        let merged = left.finalize();
        let sequential = aggregate(first.into_iter().chain(second), false);
        assert_eq!(merged, sequential);
        assert_eq!(merged.get("https://a/x"), Some(30.0));
    }

    #[test]
    fn test_from_iterator_keeps_max() {
        let result: UrlAggregate = [("u1", 100.0), ("u1", 120.0), ("u2", 50.0)]
            .into_iter()
            .collect();
        assert_eq!(result.get("u1"), Some(120.0));
        assert_eq!(result.get("u2"), Some(50.0));
    }
}
