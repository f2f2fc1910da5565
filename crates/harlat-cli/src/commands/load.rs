use crate::AnalysisOptions;
use anyhow::Result;
use harlat_core::loader::Dataset;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Load one directory, showing per-file progress when enabled
pub fn load_dataset(dir: &Path, options: &AnalysisOptions) -> Result<Dataset> {
    tracing::debug!("Loading captures from: {}", dir.display());

    let spinner = if options.progress {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {prefix} {wide_msg}")?);
        spinner.set_prefix(format!("Loading {}", dir.display()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    } else {
        ProgressBar::hidden()
    };

    let dataset = options.loader.load_dir(dir, &options.policy, |file| {
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        spinner.set_message(name);
        spinner.inc(1);
    });

    spinner.finish_and_clear();
    Ok(dataset)
}

/// One-line description of what was read from a dataset
pub fn describe(dataset: &Dataset) -> String {
    let stats = &dataset.stats;
    let mut line = format!(
        "{} files, {} entries, {} kept",
        stats.files_loaded, stats.entries.seen, stats.entries.kept
    );
    if stats.entries.filtered() > 0 {
        line.push_str(&format!(", {} filtered", stats.entries.filtered()));
    }
    if stats.entries.invalid > 0 {
        line.push_str(&format!(", {} invalid", stats.entries.invalid));
    }
    if stats.files_skipped > 0 {
        line.push_str(&format!(", {} unreadable files", stats.files_skipped));
    }
    line
}
