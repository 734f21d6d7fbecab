//! CLI entry point for spreadsheet analysis and report generation.

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use sheet_report::{
    AnalyzerConfig, DataAnalyzer, ReportConfig, ReportGenerator, ReportOutcome, StatisticsBundle,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Chart, summarize and report on a spreadsheet",
    long_about = "Loads the first worksheet of a spreadsheet, saves eleven PNG charts, \
                  computes summary statistics and writes a markdown report from a template.\n\n\
                  EXAMPLES:\n  \
                  # Default run (Opinion Data.xlsx -> visualizations/, final_report.md)\n  \
                  sheet-report\n\n  \
                  # Fill {{placeholders}} in the template and keep the statistics\n  \
                  sheet-report -i survey.xlsx --populate -r stats.json\n\n  \
                  # Statistics only, as JSON\n  \
                  sheet-report -i survey.xlsx --stats-only --json"
)]
struct Args {
    /// Spreadsheet to analyze (xlsx, xlsm, xlsb, xls, ods or csv)
    #[arg(short, long, default_value = "Opinion Data.xlsx")]
    input: PathBuf,

    /// Markdown template for the report
    #[arg(short, long, default_value = "analysis_report.md")]
    template: PathBuf,

    /// Destination of the final report
    #[arg(short, long, default_value = "final_report.md")]
    output: PathBuf,

    /// Directory that receives the chart images
    #[arg(long, default_value = "visualizations")]
    charts_dir: PathBuf,

    /// Replace {{placeholder}} tokens in the template
    ///
    /// Without this flag the template is written out unchanged.
    #[arg(long)]
    populate: bool,

    /// Write the statistics bundle as JSON to this path
    #[arg(short = 'r', long, value_name = "PATH")]
    emit_stats: Option<PathBuf>,

    /// Print the statistics as JSON to stdout instead of a summary
    ///
    /// Disables all logs so stdout only carries the JSON.
    #[arg(long)]
    json: bool,

    /// Compute statistics only; skip charts and the report
    #[arg(long)]
    stats_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries
/// the JSON document.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let analyzer_config = AnalyzerConfig::builder()
        .output_dir(&args.charts_dir)
        .build()?;

    if args.stats_only {
        let analyzer = DataAnalyzer::with_config(&args.input, analyzer_config)?;
        let statistics = analyzer.generate_statistics()?;
        if let Some(path) = &args.emit_stats {
            sheet_report::write_statistics_json(&statistics, path)?;
        }
        return print_statistics(&statistics, args.json);
    }

    let mut builder = ReportConfig::builder()
        .analyzer(analyzer_config)
        .template_path(&args.template)
        .output_path(&args.output)
        .populate_template(args.populate);
    if let Some(path) = &args.emit_stats {
        builder = builder.statistics_path(path);
    }
    let config = builder.build()?;

    info!("Analyzing {}", args.input.display());
    let outcome = ReportGenerator::new(config).generate_report(&args.input)?;

    if args.json {
        return print_statistics(&outcome.statistics, true);
    }
    print_outcome(&outcome);
    Ok(())
}

fn print_statistics(statistics: &StatisticsBundle, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(statistics)?);
        return Ok(());
    }

    println!("SUMMARY");
    println!("{}", "-".repeat(40));
    if statistics.summary.is_empty() {
        println!("  No numeric columns");
    }
    for s in &statistics.summary {
        println!(
            "  {:<20} count={:<6} mean={:<12} std={}",
            truncate_str(&s.column, 19),
            s.count,
            fmt_opt(s.mean),
            fmt_opt(s.std)
        );
    }
    println!();

    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));
    for m in &statistics.missing_values {
        println!("  {:<20} {}", truncate_str(&m.column, 19), m.missing);
    }
    println!("  Total: {}", statistics.total_missing());
    Ok(())
}

/// Human-readable run summary.
///
/// Uses `println!` so the result is shown regardless of the log level.
fn print_outcome(outcome: &ReportOutcome) {
    println!("\n{}", "=".repeat(60));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(60));
    println!("  Source: {}", outcome.source.display());
    println!("  Generated at: {}", outcome.generated_at);
    println!();

    println!("CHARTS");
    println!("{}", "-".repeat(40));
    for artifact in &outcome.artifacts {
        let status = if artifact.rendered { "" } else { " (blank)" };
        println!("  {}{status}", artifact.path.display());
    }
    println!();

    println!("OUTPUT FILES");
    println!("{}", "-".repeat(40));
    println!("  Report: {}", outcome.report_path.display());
    if let Some(path) = &outcome.statistics_path {
        println!("  Statistics: {}", path.display());
    }
    println!(
        "  Numeric columns summarized: {}",
        outcome.statistics.summary.len()
    );
    println!("{}", "=".repeat(60));
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{v:.4}"))
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
