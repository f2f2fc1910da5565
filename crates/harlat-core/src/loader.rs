//! Directory-level capture loading.
//!
//! Every file-level problem is local: a missing directory, a directory with
//! no captures, or a capture that fails to parse produces a warning and the
//! run continues with whatever could be read.

use crate::analysis::{AggregateBuilder, EntryCounts, UrlAggregate};
use crate::filter::FilterPolicy;
use crate::har::{CaptureEntry, HarReader};
use crate::{Error, Result};
use glob::Pattern;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name pattern used when none is configured
pub const DEFAULT_PATTERN: &str = "*.har";

/// Outcome of loading one directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub files_found: usize,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub entries: EntryCounts,
}

/// One directory's captures folded into an aggregate
#[derive(Debug, Clone)]
pub struct Dataset {
    pub directory: PathBuf,
    pub aggregate: UrlAggregate,
    pub stats: LoadStats,
}

impl Dataset {
    /// Display name: the directory's base name, trailing slashes ignored
    pub fn label(&self) -> String {
        dataset_label(&self.directory)
    }
}

pub fn dataset_label(directory: &Path) -> String {
    directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| directory.display().to_string())
}

/// Finds capture files in a directory and folds them into a [`Dataset`]
#[derive(Debug, Clone)]
pub struct CaptureLoader {
    pattern: Pattern,
}

impl CaptureLoader {
    /// Create a loader matching file names against a glob pattern
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern).map_err(|e| {
            Error::InvalidPattern(format!("Invalid file pattern '{}': {}", pattern, e))
        })?;
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// List matching capture files, sorted by path.
    ///
    /// Returns an empty list, with a warning, when the directory is missing,
    /// is not a directory, or has no matching files.
    pub fn discover(&self, dir: &Path) -> Vec<PathBuf> {
        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                tracing::warn!("Cannot read directory '{}': {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| self.pattern.matches(name))
            })
            .collect();
        files.sort();

        if files.is_empty() {
            tracing::warn!(
                "No files matching '{}' found in '{}'",
                self.pattern,
                dir.display()
            );
        } else {
            tracing::info!("Found {} capture files in '{}'", files.len(), dir.display());
            for file in &files {
                tracing::debug!("  - {}", file.display());
            }
        }

        files
    }

    /// Read the entries of a single capture file
    ///
    /// Returns the decoded entries and the number of entries that had to be
    /// skipped.
    pub fn load_file(path: &Path) -> Result<(Vec<CaptureEntry>, usize)> {
        let har = HarReader::from_file(path)?;
        Ok(HarReader::capture_entries(har))
    }

    /// Load every capture in `dir` and fold it into one aggregate.
    ///
    /// `on_file` is called before each file is read.
    pub fn load_dir<F>(&self, dir: &Path, policy: &FilterPolicy, mut on_file: F) -> Dataset
    where
        F: FnMut(&Path),
    {
        let files = self.discover(dir);
        let mut stats = LoadStats {
            files_found: files.len(),
            ..LoadStats::default()
        };
        let mut builder = AggregateBuilder::new(policy.clone());

        for file in &files {
            on_file(file);
            match Self::load_file(file) {
                Ok((entries, malformed)) => {
                    stats.files_loaded += 1;
                    stats.entries.invalid += malformed;
                    stats.entries.seen += malformed;
                    builder.extend(entries);
                }
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", file.display(), e);
                    stats.files_skipped += 1;
                }
            }
        }

        stats.entries.add(builder.counts());
        let aggregate = builder.finalize();

        tracing::info!(
            "Loaded {} of {} files from '{}': {} URLs from {} entries",
            stats.files_loaded,
            stats.files_found,
            dir.display(),
            aggregate.len(),
            stats.entries.kept
        );

        Dataset {
            directory: dir.to_path_buf(),
            aggregate,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader() -> CaptureLoader {
        CaptureLoader::new(DEFAULT_PATTERN).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn har(entries: &[(&str, f64)]) -> String {
        let entries: Vec<_> = entries
            .iter()
            .map(|(url, time)| {
                serde_json::json!({"time": time, "request": {"method": "GET", "url": url}})
            })
            .collect();
        serde_json::json!({"log": {"version": "1.2", "entries": entries}}).to_string()
    }

    #[test]
    fn test_single_file_keeps_worst_time() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "session.har", &har(&[("https://a/x", 100.0), ("https://a/x", 250.0)]));

        let dataset = loader().load_dir(dir.path(), &FilterPolicy::new(), |_| {});

        assert_eq!(dataset.aggregate.len(), 1);
        assert_eq!(dataset.aggregate.get("https://a/x"), Some(250.0));
        assert_eq!(dataset.stats.files_loaded, 1);
    }

    #[test]
    fn test_max_spans_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.har", &har(&[("https://a/x", 300.0), ("https://a/y", 1.0)]));
        write(dir.path(), "b.har", &har(&[("https://a/x", 120.0), ("https://a/y", 9.5)]));

        let dataset = loader().load_dir(dir.path(), &FilterPolicy::new(), |_| {});

        assert_eq!(dataset.aggregate.get("https://a/x"), Some(300.0));
        assert_eq!(dataset.aggregate.get("https://a/y"), Some(9.5));
        assert_eq!(dataset.stats.entries.seen, 4);
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.har", &har(&[("https://a/x", 10.0)]));
        write(dir.path(), "broken.har", "{ this is not json");

        let mut visited = Vec::new();
        let dataset = loader().load_dir(dir.path(), &FilterPolicy::new(), |path| {
            visited.push(path.to_path_buf())
        });

        assert_eq!(visited.len(), 2);
        assert_eq!(dataset.stats.files_found, 2);
        assert_eq!(dataset.stats.files_loaded, 1);
        assert_eq!(dataset.stats.files_skipped, 1);
        assert_eq!(dataset.aggregate.get("https://a/x"), Some(10.0));
    }

    #[test]
    fn test_malformed_entries_are_counted() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "partial.har",
            r#"{"log": {"entries": [
                {"time": 5, "request": {"url": "https://a/x"}},
                {"request": {"url": "https://a/y"}}
            ]}}"#,
        );

        let dataset = loader().load_dir(dir.path(), &FilterPolicy::new(), |_| {});

        assert_eq!(dataset.stats.entries.seen, 2);
        assert_eq!(dataset.stats.entries.invalid, 1);
        assert_eq!(dataset.stats.entries.kept, 1);
    }

    #[test]
    fn test_discover_matches_pattern_only() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.har", &har(&[]));
        write(dir.path(), "a.har", &har(&[]));
        write(dir.path(), "notes.txt", "ignore me");
        fs::create_dir(dir.path().join("nested.har")).unwrap();

        let files = loader().discover(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.har", "b.har"]);

        let json_loader = CaptureLoader::new("*.json").unwrap();
        assert!(json_loader.discover(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_and_empty_directories_yield_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let loader = loader();

        let empty = loader.load_dir(dir.path(), &FilterPolicy::new(), |_| {});
        assert!(empty.aggregate.is_empty());
        assert_eq!(empty.stats.files_found, 0);

        let missing = loader.load_dir(&dir.path().join("nope"), &FilterPolicy::new(), |_| {});
        assert!(missing.aggregate.is_empty());
    }

    #[test]
    fn test_invalid_file_pattern() {
        assert!(CaptureLoader::new("[*.har").is_err());
    }

    #[test]
    fn test_dataset_label_ignores_trailing_slash() {
        assert_eq!(dataset_label(Path::new("captures/before/")), "before");
        assert_eq!(dataset_label(Path::new("after")), "after");
    }
}
