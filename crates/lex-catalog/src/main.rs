//! CLI entry point for the catalog pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_catalog::{
    AggregateViews, DurationPolicy, ErrorMode, Pipeline, PipelineConfig, PipelineResult,
    RepairPolicy, RunSummary, ingest,
};
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

/// CLI-compatible repair policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliRepairPolicy {
    /// Fill director, cast and country with "Unknown"; drop other gaps
    Lenient,
    /// Fill every gap, country with its most frequent value
    Imputation,
}

impl From<CliRepairPolicy> for RepairPolicy {
    fn from(cli: CliRepairPolicy) -> Self {
        match cli {
            CliRepairPolicy::Lenient => RepairPolicy::Lenient,
            CliRepairPolicy::Imputation => RepairPolicy::Imputation,
        }
    }
}

/// CLI-compatible duration policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDurationPolicy {
    /// Season counts have no minute value
    SeasonsAsNull,
    /// Take every digit run as minutes
    RawMagnitude,
}

impl From<CliDurationPolicy> for DurationPolicy {
    fn from(cli: CliDurationPolicy) -> Self {
        match cli {
            CliDurationPolicy::SeasonsAsNull => DurationPolicy::SeasonsAsNull,
            CliDurationPolicy::RawMagnitude => DurationPolicy::RawMagnitude,
        }
    }
}

/// CLI-compatible error mode enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliErrorMode {
    /// Abort on the first faulty record
    Strict,
    /// Drop faulty records and report them
    Lenient,
}

impl From<CliErrorMode> for ErrorMode {
    fn from(cli: CliErrorMode) -> Self {
        match cli {
            CliErrorMode::Strict => ErrorMode::Strict,
            CliErrorMode::Lenient => ErrorMode::Lenient,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Media catalog normalization and aggregation",
    long_about = "Cleans a movie and TV catalog CSV and prints summary views.\n\n\
                  EXAMPLES:\n  \
                  # Default lenient repair\n  \
                  lex-catalog -i titles.csv\n\n  \
                  # Impute instead of dropping, skip bad rows\n  \
                  lex-catalog -i titles.csv --policy imputation --error-mode lenient\n\n  \
                  # Machine-readable views\n  \
                  lex-catalog -i titles.csv --json | jq .views.top_genres"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Policy for missing fields
    #[arg(long, value_enum, default_value = "lenient")]
    policy: CliRepairPolicy,

    /// Policy for season-count durations
    #[arg(long, value_enum, default_value = "seasons-as-null")]
    duration_policy: CliDurationPolicy,

    /// How faulty records are handled
    #[arg(long, value_enum, default_value = "strict")]
    error_mode: CliErrorMode,

    /// Number of entries in each top-N view
    #[arg(short = 'n', long, default_value = "10")]
    top_n: usize,

    /// Keep exact duplicate records
    #[arg(long)]
    keep_duplicates: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the summary and views.
    /// Useful for piping to other tools: `... --json | jq .views`
    #[arg(long)]
    json: bool,
}

/// Machine-readable output for `--json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    input_file: &'a str,
    summary: &'a RunSummary,
    views: &'a AggregateViews,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
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
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading catalog from: {}", args.input);
    let data = ingest::read_csv(&args.input)?;
    info!("Catalog loaded successfully: {:?}", data.shape());

    let config = PipelineConfig::builder()
        .repair_policy(args.policy.into())
        .duration_policy(args.duration_policy.into())
        .error_mode(args.error_mode.into())
        .remove_duplicates(!args.keep_duplicates)
        .top_n(args.top_n)
        .build()?;

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    match pipeline.process(&data) {
        Ok(result) => handle_pipeline_output(&result, &args),
        Err(e) => {
            error!("Pipeline failed: {}", e);
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

/// Print the result as JSON or as a human-readable summary.
fn handle_pipeline_output(result: &PipelineResult, args: &Args) -> Result<()> {
    if args.json {
        let report = JsonReport {
            input_file: &args.input,
            summary: &result.summary,
            views: &result.views,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(result, args);
    Ok(())
}

/// Print a human-readable summary of the run.
///
/// This output uses `println!` so it is visible regardless of log level.
fn print_human_readable_summary(result: &PipelineResult, args: &Args) {
    let summary = &result.summary;
    let views = &result.views;

    println!();
    println!("{}", "=".repeat(80));
    println!("CATALOG PROCESSING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Input: {}", args.input);
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} dropped, {} duplicates, {:.1}% removed)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_dropped,
        summary.duplicates_removed,
        summary.rows_removed_percentage()
    );
    println!();

    if !summary.actions.is_empty() {
        println!("Actions Taken:");
        for action in &summary.actions {
            println!(
                "  - [{}] {}: {}",
                action.action_type.display_name(),
                action.target,
                action.description
            );
        }
        println!();
    }

    if !summary.issues.is_empty() {
        println!("Dropped Records:");
        for issue in summary.issues.iter().take(10) {
            println!("  ! row {} ({}): {}", issue.row, issue.stage, issue.message);
        }
        if summary.issues.len() > 10 {
            println!("  ... and {} more", summary.issues.len() - 10);
        }
        println!();
    }

    println!("By Type:");
    for entry in &views.counts_by_type {
        println!("  {:<24} {}", entry.label, entry.count);
    }
    println!();

    println!("Top Genres:");
    for entry in &views.top_genres {
        println!("  {:<40} {}", entry.label, entry.count);
    }
    println!();

    println!("Top Ratings:");
    for entry in &views.rating_counts {
        println!("  {:<12} {}", entry.label, entry.count);
    }
    println!();

    let pivot = &views.country_age_group;
    if !pivot.is_empty() {
        println!("Audience by Country:");
        print!("  {:<24}", "");
        for label in &pivot.column_labels {
            print!(" {:>12}", label);
        }
        println!();
        for (row, cells) in pivot.row_labels.iter().zip(&pivot.cells) {
            print!("  {:<24}", truncate_str(row, 23));
            for count in cells {
                print!(" {:>12}", count);
            }
            println!();
        }
        println!();
    }

    println!("Top Description Words:");
    let words: Vec<String> = views
        .description_tokens
        .iter()
        .take(15)
        .map(|t| format!("{} ({})", t.label, t.count))
        .collect();
    println!("  {}", words.join(", "));
    println!();

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
