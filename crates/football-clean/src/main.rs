//! CLI entry point for the football match cleaning engine.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use football_clean::extract::read_matches_csv;
use football_clean::{
    CleaningConfig, CleaningPipeline, CleaningReport, CleaningResult, export_csv,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Cleaning engine for historical football match results",
    long_about = "Audits, fills and normalizes a football match results file.\n\n\
                  Rows are never dropped: missing scores become 0, missing categories\n\
                  take the column mode, dates, scores and the neutral flag are\n\
                  converted to their proper types.\n\n\
                  EXAMPLES:\n  \
                  # Clean a file with the default policy\n  \
                  football-clean -i Files/Futbol.csv\n\n  \
                  # Custom output and a JSON report\n  \
                  football-clean -i results.csv -o clean/results.csv --emit-report clean/report.json\n\n  \
                  # Machine-readable report only\n  \
                  football-clean -i results.csv --json | jq .summary"
)]
struct Args {
    /// Path to the CSV file with the raw match results
    #[arg(short, long)]
    input: PathBuf,

    /// Path of the cleaned CSV file
    #[arg(short, long, default_value = "outputs/results_clean.csv")]
    output: PathBuf,

    /// JSON file with cleaning configuration overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the full cleaning report as JSON to this path
    #[arg(long)]
    emit_report: Option<PathBuf>,

    /// Number of cleaned rows to print
    #[arg(long, default_value = "15")]
    preview: usize,

    /// Rows with missing values shown in the audit report (overrides config)
    #[arg(long)]
    sample_rows: Option<usize>,

    /// Do not repair mis-decoded characters in text columns
    #[arg(long)]
    no_encoding_repair: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the JSON report to stdout instead of the human-readable summary
    ///
    /// Disables all logs so stdout only carries the report.
    #[arg(long)]
    json: bool,
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

fn load_config(args: &Args) -> Result<CleaningConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str::<CleaningConfig>(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => CleaningConfig::default(),
    };

    if let Some(rows) = args.sample_rows {
        config.sample_rows = rows;
    }
    if args.no_encoding_repair {
        config.repair_encoding = false;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = load_config(&args)?;
    let data = read_matches_csv(&args.input)?;

    if !args.json {
        print_banner("EXTRACTED DATA");
        println!("First 5 rows:");
        println!("{}", data.head(Some(5)));
    }

    let mut builder = CleaningPipeline::builder().config(config);
    if !args.quiet && !args.json {
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

    let mut result = match pipeline.process(data) {
        Ok(result) => result,
        Err(e) => {
            error!("Cleaning failed: {}", e);
            return Err(anyhow!("Cleaning failed: {}", e));
        }
    };

    export_csv(&mut result.data, &args.output)?;

    if let Some(ref report_path) = args.emit_report {
        result.report.write_json(report_path)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
        return Ok(());
    }

    print_human_readable_summary(&result, args.preview, &args.output);
    Ok(())
}

fn print_banner(title: &str) {
    println!("\n{}", "=".repeat(80));
    println!("{}", title);
    println!("{}", "=".repeat(80));
}

/// Print the cleaning results.
///
/// Uses `println!` intentionally: this is the primary output of the
/// command and must show regardless of the log level.
fn print_human_readable_summary(result: &CleaningResult, preview: usize, output: &Path) {
    let report: &CleaningReport = &result.report;

    print_banner("DATA CLEANING PROCESS");
    println!("{}", report.initial_audit);

    println!("\nMissing value remediation:");
    println!("{}", "-".repeat(40));
    if report.remediation.actions.is_empty() {
        println!("  Nothing to fill");
    }
    for action in &report.remediation.actions {
        println!("  - {}", action);
    }

    println!("\nType normalization:");
    println!("{}", "-".repeat(40));
    for conversion in &report.normalization.conversions {
        println!(
            "  - {} -> {} ({} cells changed)",
            conversion.column, conversion.target_type, conversion.cells_changed
        );
    }

    let issues: Vec<_> = report.issues().collect();
    if !issues.is_empty() {
        println!("\nIssues recovered ({}):", issues.len());
        println!("{}", "-".repeat(40));
        for issue in issues {
            match issue.row {
                Some(row) => println!("  - [{}] row {}: {}", issue.column, row, issue.message),
                None => println!("  - [{}] {}", issue.column, issue.message),
            }
        }
    }

    println!();
    println!("{}", report.summary);
    println!(
        "\nFinal verification - total null values: {}",
        report.final_audit.total_missing()
    );

    print_banner(&format!("CLEANED DATA - FIRST {} ROWS", preview));
    println!("{}", result.data.head(Some(preview)));

    print_banner("FINAL DATASET INFORMATION");
    let (rows, cols) = result.data.shape();
    println!("Shape: ({}, {})", rows, cols);
    println!("Data types:");
    for column in result.data.get_columns() {
        println!("  {:<12} {}", column.name(), column.dtype());
    }
    println!("\nFinal null values:");
    for column in &report.final_audit.columns {
        println!("  {:<12} {}", column.name, column.null_count);
    }

    println!("\nCleaned data exported to: {}", output.display());
    println!("Completed in {}ms", report.duration_ms);
}
