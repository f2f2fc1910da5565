use super::types::{CaptureEntry, Entry, Har};
use crate::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Har> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let har: Har = serde_json::from_reader(reader)?;

        tracing::debug!(
            "Parsed HAR {} file {} with {} entries",
            har.log.version.as_deref().unwrap_or("(unversioned)"),
            path.display(),
            har.log.entries.len()
        );

        Ok(har)
    }

    /// Parse a HAR file from a JSON string
    pub fn from_str(content: &str) -> Result<Har> {
        tracing::debug!("Parsing HAR from string");

        let har: Har = serde_json::from_str(content)?;

        tracing::debug!(
            "Parsed HAR from string with {} entries",
            har.log.entries.len()
        );

        Ok(har)
    }

    /// Decode the `(url, time)` pair of every entry.
    ///
    /// Entries missing `request.url` or a numeric `time` are skipped with a
    /// warning. The second value is the number of skipped entries.
    pub fn capture_entries(har: Har) -> (Vec<CaptureEntry>, usize) {
        let mut entries = Vec::with_capacity(har.log.entries.len());
        let mut skipped = 0;

        for (idx, raw) in har.log.entries.into_iter().enumerate() {
            match serde_json::from_value::<Entry>(raw) {
                Ok(entry) => entries.push(CaptureEntry::from(entry)),
                Err(e) => {
                    tracing::warn!("Skipping entry {}: {}", idx, e);
                    skipped += 1;
                }
            }
        }

        (entries, skipped)
    }
}
