use anyhow::{Result, bail};
use clap::ValueEnum;
use harlat_core::filter::FilterPolicy;
use harlat_core::loader::CaptureLoader;
use std::path::PathBuf;

pub mod commands;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

/// What to do with the directories given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Slowest URLs of a single dataset
    Rank { directory: PathBuf, top_n: usize },
    /// Candidate measured against baseline; the first directory is the baseline
    Compare {
        baseline_dir: PathBuf,
        candidate_dir: PathBuf,
        top_n: usize,
    },
}

impl Mode {
    pub fn from_dirs(dirs: Vec<PathBuf>, top_n: usize) -> Result<Self> {
        let mut dirs = dirs.into_iter();
        match (dirs.next(), dirs.next(), dirs.next()) {
            (None, _, _) => bail!("At least one directory must be given"),
            (Some(directory), None, _) => Ok(Mode::Rank { directory, top_n }),
            (Some(baseline_dir), Some(candidate_dir), None) => Ok(Mode::Compare {
                baseline_dir,
                candidate_dir,
                top_n,
            }),
            (Some(_), Some(_), Some(_)) => bail!("At most two directories can be given"),
        }
    }
}

/// Settings shared by both modes
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub policy: FilterPolicy,
    pub loader: CaptureLoader,
    /// Show a spinner on stderr while captures load
    pub progress: bool,
}

impl AnalysisOptions {
    pub fn new(filter_assets: bool, hosts: &[String], pattern: &str) -> Result<Self> {
        Ok(Self {
            policy: FilterPolicy::new()
                .with_asset_filter(filter_assets)
                .with_hosts(hosts)?,
            loader: CaptureLoader::new(pattern)?,
            progress: false,
        })
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}
