use glob::Pattern;
use url::Url;

/// Host restriction applied to capture URLs
#[derive(Debug, Clone)]
pub enum HostPattern {
    /// Exact hostname match (case-insensitive)
    Exact(String),
    /// Glob pattern match (e.g., *.example.com)
    Glob(Pattern),
}

impl HostPattern {
    /// Parse a host pattern string into a HostPattern
    ///
    /// If the pattern contains '*' or '?', it's treated as a glob pattern.
    /// Otherwise, it's treated as an exact match (case-insensitive).
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let pattern_lower = pattern.trim().to_lowercase();
        if pattern_lower.is_empty() {
            return Err(crate::Error::InvalidPattern(
                "Empty host pattern".to_string(),
            ));
        }

        if pattern_lower.contains(['*', '?']) {
            let glob_pattern = Pattern::new(&pattern_lower).map_err(|e| {
                crate::Error::InvalidPattern(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
            Ok(HostPattern::Glob(glob_pattern))
        } else {
            Ok(HostPattern::Exact(pattern_lower))
        }
    }

    /// Parse a list of patterns, splitting comma-separated values
    pub fn parse_list<S: AsRef<str>>(patterns: &[S]) -> crate::Result<Vec<Self>> {
        patterns
            .iter()
            .flat_map(|p| p.as_ref().split(','))
            .filter(|p| !p.trim().is_empty())
            .map(HostPattern::parse)
            .collect()
    }

    /// Check if a hostname matches this pattern
    pub fn matches(&self, hostname: &str) -> bool {
        let hostname_lower = hostname.to_lowercase();
        match self {
            HostPattern::Exact(pattern) => &hostname_lower == pattern,
            HostPattern::Glob(pattern) => pattern.matches(&hostname_lower),
        }
    }

    /// Check if the host of a URL matches this pattern.
    ///
    /// URLs that cannot be parsed or carry no host never match.
    pub fn matches_url(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => parsed.host_str().is_some_and(|host| self.matches(host)),
            Err(e) => {
                tracing::debug!("Failed to parse URL {}: {}", url, e);
                false
            }
        }
    }
}
