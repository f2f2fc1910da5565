use super::ensure_directory;
use super::load::{describe, load_dataset};
use crate::{AnalysisOptions, OutputFormat};
use anyhow::Result;
use harlat_core::analysis::RankingReport;
use std::path::Path;

/// Rank the slowest URLs of one directory
pub fn rank_directory(
    dir: &Path,
    top_n: usize,
    options: &AnalysisOptions,
) -> Result<RankingReport> {
    ensure_directory(dir)?;

    let dataset = load_dataset(dir, options)?;
    tracing::info!("{}: {}", dataset.label(), describe(&dataset));

    Ok(RankingReport::new(dataset.label(), &dataset.aggregate, top_n))
}

pub fn execute(
    dir: &Path,
    top_n: usize,
    options: &AnalysisOptions,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Ranking slowest URLs in: {}", dir.display());
    tracing::debug!("Output format: {}", format.as_str());

    ensure_directory(dir)?;

    if format == OutputFormat::Pretty {
        print_header(dir, options);
    }

    let report = rank_directory(dir, top_n, options)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn print_header(dir: &Path, options: &AnalysisOptions) {
    use console::style;

    println!("{} {}", style("Analyzing:").bold(), dir.display());
    if options.policy.filter_assets {
        println!(
            "{}",
            style("Asset filtering enabled: skipping images, CSS, JS, fonts and media").dim()
        );
    }
}

fn output_pretty(report: &RankingReport) {
    use console::style;

    let title = format!(
        "Slowest {} URLs in '{}'",
        report.entries.len(),
        report.dataset
    );
    println!("\n{}", style(&title).bold().cyan());
    println!("{}", style("=".repeat(title.len())).cyan());

    if report.entries.is_empty() {
        println!("\nNo valid URL data found");
        println!();
        return;
    }

    println!(
        "\n  Showing {} of {} URLs\n",
        report.entries.len(),
        report.total_urls
    );
    println!("  {:<6} {:>14}  {}", "Rank", "Max (ms)", "URL");
    println!("  {}", "-".repeat(76));
    for row in &report.entries {
        println!(
            "  {:<6} {:>14.2}  {}",
            row.rank, row.item.elapsed_ms, row.item.url
        );
    }

    let summary = &report.summary;
    println!("\n{}", style("Statistics:").bold());
    println!("  URLs listed:        {}", summary.count);
    if let Some(slowest) = &summary.slowest {
        println!(
            "  Slowest URL:        {} ({:.2} ms)",
            slowest.url, slowest.elapsed_ms
        );
    }
    if summary.count > 1
        && let Some(fastest) = &summary.fastest
    {
        println!(
            "  Fastest URL:        {} ({:.2} ms)",
            fastest.url, fastest.elapsed_ms
        );
    }
    println!("  Max response time:  {:.2} ms", summary.max_ms);
    println!("  Min response time:  {:.2} ms", summary.min_ms);

    println!(); // trailing newline
}

fn output_json(report: &RankingReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &RankingReport) {
    println!("Rank,Max (ms),URL");
    for row in &report.entries {
        println!("{},{:.2},{}", row.rank, row.item.elapsed_ms, row.item.url);
    }
}
