mod assets;
mod host_matcher;

pub use assets::{is_static_asset, is_streaming};
pub use host_matcher::HostPattern;

use serde::Serialize;

/// Why an entry was kept or dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Keep,
    /// `ws://` / `wss://` connection, always dropped
    Streaming,
    /// Static asset, dropped only when asset filtering is enabled
    Asset,
    /// Host did not match any configured host pattern
    Host,
}

/// Entry filter applied before aggregation
///
/// Streaming connections are always excluded. Asset exclusion and host
/// restriction are opt-in; host patterns are OR-ed together.
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    pub filter_assets: bool,
    pub hosts: Vec<HostPattern>,
}

impl FilterPolicy {
    /// Create a policy that only drops streaming connections
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset_filter(mut self, enabled: bool) -> Self {
        self.filter_assets = enabled;
        self
    }

    /// Add host patterns from a list of pattern strings
    pub fn with_hosts<S: AsRef<str>>(mut self, patterns: &[S]) -> crate::Result<Self> {
        self.hosts.extend(HostPattern::parse_list(patterns)?);
        Ok(self)
    }

    pub fn classify(&self, url: &str) -> Verdict {
        if is_streaming(url) {
            return Verdict::Streaming;
        }
        if self.filter_assets && is_static_asset(url) {
            return Verdict::Asset;
        }
        if !self.hosts.is_empty() && !self.hosts.iter().any(|p| p.matches_url(url)) {
            return Verdict::Host;
        }
        Verdict::Keep
    }

    pub fn admits(&self, url: &str) -> bool {
        self.classify(url) == Verdict::Keep
    }
}
