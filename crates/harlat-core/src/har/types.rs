use serde::Deserialize;

/// Top-level HAR object
///
/// Only the parts needed for latency analysis are modelled. Entries are kept
/// as raw JSON so that a single malformed entry can be skipped without
/// rejecting the whole file.
#[derive(Debug, Clone, Deserialize)]
pub struct Har {
    pub log: Log,
}

/// Main HAR log object
#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    #[serde(default)]
    pub version: Option<String>,
    pub entries: Vec<serde_json::Value>,
}

/// The fields of a HAR entry that latency analysis reads
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub time: f64,
    pub request: Request,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub url: String,
}

/// One logged request reduced to what the aggregator consumes
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureEntry {
    pub url: String,
    pub elapsed_ms: f64,
}

impl CaptureEntry {
    pub fn new(url: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            url: url.into(),
            elapsed_ms,
        }
    }
}

impl From<Entry> for CaptureEntry {
    fn from(entry: Entry) -> Self {
        Self {
            url: entry.request.url,
            elapsed_ms: entry.time,
        }
    }
}
