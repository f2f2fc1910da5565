use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use harlat_cli::{AnalysisOptions, Mode, OutputFormat, commands};
use harlat_core::analysis::DEFAULT_TOP_N;
use harlat_core::loader::DEFAULT_PATTERN;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harlat")]
#[command(author, version)]
#[command(
    about = "Find the slowest endpoints in HAR captures, or compare two sets of captures",
    long_about = "harlat reads every HAR file in a directory and keeps the worst response time \
                  seen for each URL.\n\n\
                  With one directory it lists the slowest URLs. With two directories it compares \
                  the second (B) against the first (A, the baseline) for every URL both captured."
)]
struct Cli {
    /// Capture directories: one to rank, two to compare (baseline first)
    #[arg(value_name = "DIR", required_unless_present = "completions")]
    dirs: Vec<PathBuf>,

    /// Skip static assets (images, CSS, JS, fonts, media, archives)
    #[arg(long, env = "HARLAT_FILTER_ASSETS")]
    filter_assets: bool,

    /// Number of rows to show
    #[arg(short = 'n', long, env = "HARLAT_TOP", default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Only keep requests to matching hosts (exact or glob, repeatable, comma-separated)
    #[arg(long = "host", value_name = "PATTERN")]
    hosts: Vec<String>,

    /// File name pattern for capture files
    #[arg(long, env = "HARLAT_PATTERN", default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        return commands::completion::execute(shell, &mut Cli::command());
    }

    // Initialize logging
    init_logging(cli.verbose);

    let options = AnalysisOptions::new(cli.filter_assets, &cli.hosts, &cli.pattern)?
        .with_progress(cli.format == OutputFormat::Pretty);

    match Mode::from_dirs(cli.dirs, cli.top)? {
        Mode::Rank { directory, top_n } => {
            commands::rank::execute(&directory, top_n, &options, cli.format)
        }
        Mode::Compare {
            baseline_dir,
            candidate_dir,
            top_n,
        } => commands::compare::execute(&baseline_dir, &candidate_dir, top_n, &options, cli.format),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("harlat_cli=debug,harlat_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("harlat_cli=warn,harlat_core=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
