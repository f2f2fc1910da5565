use super::ensure_directory;
use super::load::{describe, load_dataset};
use crate::{AnalysisOptions, OutputFormat};
use anyhow::Result;
use harlat_core::analysis::{ComparisonReport, Trend};
use std::path::Path;

const NO_COMMON_URLS: &str =
    "No common URLs found. Check that both directories captured the same requests.";

/// Compare two directories, measuring `candidate_dir` against `baseline_dir`
pub fn compare_directories(
    baseline_dir: &Path,
    candidate_dir: &Path,
    top_n: usize,
    options: &AnalysisOptions,
) -> Result<ComparisonReport> {
    ensure_directory(baseline_dir)?;
    ensure_directory(candidate_dir)?;

    let baseline = load_dataset(baseline_dir, options)?;
    tracing::info!("{}: {}", baseline.label(), describe(&baseline));
    let candidate = load_dataset(candidate_dir, options)?;
    tracing::info!("{}: {}", candidate.label(), describe(&candidate));

    Ok(ComparisonReport::new(
        baseline.label(),
        &baseline.aggregate,
        candidate.label(),
        &candidate.aggregate,
        top_n,
    ))
}

pub fn execute(
    baseline_dir: &Path,
    candidate_dir: &Path,
    top_n: usize,
    options: &AnalysisOptions,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!(
        "Comparing {} against baseline {}",
        candidate_dir.display(),
        baseline_dir.display()
    );
    tracing::debug!("Output format: {}", format.as_str());

    ensure_directory(baseline_dir)?;
    ensure_directory(candidate_dir)?;

    if format == OutputFormat::Pretty {
        print_header(baseline_dir, candidate_dir, options);
    }

    let report = compare_directories(baseline_dir, candidate_dir, top_n, options)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn print_header(baseline_dir: &Path, candidate_dir: &Path, options: &AnalysisOptions) {
    use console::style;

    println!("{} {}", style("Baseline (A): ").bold(), baseline_dir.display());
    println!("{} {}", style("Candidate (B):").bold(), candidate_dir.display());
    if options.policy.filter_assets {
        println!(
            "{}",
            style("Asset filtering enabled: skipping images, CSS, JS, fonts and media").dim()
        );
    }
}

fn output_pretty(report: &ComparisonReport) {
    use console::style;

    let title = if report.has_common_urls() {
        format!(
            "{} vs {} (baseline: {})",
            report.candidate, report.baseline, report.baseline
        )
    } else {
        "Performance comparison".to_string()
    };
    println!("\n{}", style(&title).bold().cyan());
    println!("{}", style("=".repeat(title.len())).cyan());

    if !report.has_common_urls() {
        println!(
            "\n{}",
            style(NO_COMMON_URLS).yellow()
        );
        println!();
        return;
    }

    println!("\n  Compared {} common URLs\n", report.common_urls);
    println!(
        "{}",
        style(format!(
            "Top {} URLs where {} is slowest relative to {} (max response time):",
            report.rows.len(),
            report.candidate,
            report.baseline
        ))
        .bold()
    );
    println!(
        "  {:<6} {:>14} {:>14} {:>12} {:>9}  {}",
        "Rank", "Baseline (ms)", "Candidate (ms)", "Delta (ms)", "Delta (%)", "URL"
    );
    println!("  {}", "-".repeat(76));
    for row in &report.rows {
        let r = &row.item;
        let delta = format!("{:+.2}", r.delta_ms);
        let delta = if r.delta_ms > 0.0 {
            style(delta).red()
        } else if r.delta_ms < 0.0 {
            style(delta).green()
        } else {
            style(delta)
        };
        println!(
            "  {:<6} {:>14.2} {:>14.2} {:>12} {:>8.1}%  {}",
            row.rank, r.baseline_ms, r.candidate_ms, delta, r.delta_pct, r.url
        );
    }

    let s = &report.summary;
    println!("\n{}", style("Overall:").bold());
    println!(
        "  Slower in {}:     {} ({:.1}%)",
        report.candidate, s.regressions, s.regression_pct
    );
    println!(
        "  Faster in {}:     {} ({:.1}%)",
        report.candidate, s.improvements, s.improvement_pct
    );
    println!("  Unchanged:         {} ({:.1}%)", s.unchanged, s.unchanged_pct);
    println!("  Mean delta:        {:.2} ms", s.mean_delta_ms);
    println!("  Mean delta (%):    {:.1}%", s.mean_delta_pct);

    let conclusion = match s.trend {
        Trend::Slower => format!(
            "{} max response times are on average {:.2} ms ({:.1}%) slower than {}",
            report.candidate, s.mean_delta_ms, s.mean_delta_pct, report.baseline
        ),
        Trend::Faster => format!(
            "{} max response times are on average {:.2} ms ({:.1}%) faster than {}",
            report.candidate,
            s.mean_delta_ms.abs(),
            s.mean_delta_pct.abs(),
            report.baseline
        ),
        Trend::Unchanged => format!(
            "{} and {} max response times are about the same",
            report.candidate, report.baseline
        ),
    };
    println!("\n{} {}", style("Conclusion:").bold(), conclusion);

    println!(); // trailing newline
}

fn output_json(report: &ComparisonReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &ComparisonReport) {
    if !report.has_common_urls() {
        println!("{}", NO_COMMON_URLS);
        return;
    }

    println!("Rank,Baseline (ms),Candidate (ms),Delta (ms),Delta (%),URL");
    for row in &report.rows {
        let r = &row.item;
        println!(
            "{},{:.2},{:.2},{:.2},{:.1},{}",
            row.rank, r.baseline_ms, r.candidate_ms, r.delta_ms, r.delta_pct, r.url
        );
    }

    let s = &report.summary;
    println!();
    println!("Metric,Value");
    println!("Common URLs,{}", s.total);
    println!("Slower,{}", s.regressions);
    println!("Faster,{}", s.improvements);
    println!("Unchanged,{}", s.unchanged);
    println!("Mean Delta (ms),{:.2}", s.mean_delta_ms);
    println!("Mean Delta (%),{:.1}", s.mean_delta_pct);
}
