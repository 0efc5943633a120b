//! CLI entry point for the charging-session cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use ev_processing::{CleaningReport, Pipeline, PipelineConfig, ReportGenerator, RunReport};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "EV charging-session cleaning pipeline",
    long_about = "Cleans a raw EV charging-session CSV export into an analysis-ready table.\n\n\
                  EXAMPLES:\n  \
                  # Clean a file into ./outputs/cleaned_sessions.csv\n  \
                  ev-processing -i ev_charging_patterns.csv\n\n  \
                  # Also write chart datasets and a JSON report\n  \
                  ev-processing -i ev_charging_patterns.csv --charts -r\n\n  \
                  # Report only, piped to jq\n  \
                  ev-processing -i ev_charging_patterns.csv --no-save --json | jq .rows_dropped"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses "cleaned_sessions"
    #[arg(long)]
    output_name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write chart datasets to <output>/charts.json
    #[arg(long)]
    charts: bool,

    /// Do not write the cleaned CSV
    #[arg(long)]
    no_save: bool,
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

    let mut config_builder = PipelineConfig::builder()
        .output_dir(&args.output)
        .save_to_disk(!args.no_save)
        .generate_charts(args.charts);

    if let Some(ref name) = args.output_name {
        config_builder = config_builder.output_name(name);
    }

    let config = config_builder.build()?;
    let pipeline = Pipeline::builder().config(config).build()?;

    info!("{}", "=".repeat(80));
    info!("Cleaning charging sessions from: {}", args.input);
    info!("{}", "=".repeat(80));

    let result = pipeline.process_file(&args.input).map_err(|e| {
        error!("Pipeline failed: {}", e);
        anyhow!("Pipeline failed: {}", e)
    })?;

    handle_pipeline_output(&result.report, &args)
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file
fn handle_pipeline_output(report: &CleaningReport, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&RunReport::new(report))?);
        return Ok(());
    }

    if args.emit_report {
        let input_stem = extract_file_stem(&args.input);
        let generator = ReportGenerator::new(PathBuf::from(&args.output), None);
        let report_path = generator.write_report_to_file(report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(report, args);
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print a human-readable summary of the cleaning results.
fn print_human_readable_summary(report: &CleaningReport, args: &Args) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, report.rows_before, report.columns_before
    );
    match report.output_path {
        Some(ref path) => println!(
            "Output: {} ({} rows x {} columns)",
            path, report.rows_after, report.columns_after
        ),
        None => println!(
            "Output: not saved ({} rows x {} columns)",
            report.rows_after, report.columns_after
        ),
    }
    if let Some(ref path) = report.charts_path {
        println!("Charts: {}", path);
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", report.duration_ms);
    println!(
        "  Rows: {} -> {} ({} dropped, {:.1}%)",
        report.rows_before,
        report.rows_after,
        report.rows_dropped,
        report.rows_dropped_percentage()
    );
    if let Some(ref missing) = report.missing {
        println!(
            "  Missing cells before drop: {} ({} rows with every key column missing)",
            missing.total_missing(),
            missing.all_key_missing_rows
        );
    }
    if let Some(ref duplicates) = report.duplicates {
        println!(
            "  Exact duplicates: {} rows in {} groups",
            duplicates.duplicate_rows, duplicates.duplicate_groups
        );
    }
    if let Some(ref outliers) = report.outliers {
        println!(
            "  IQR outliers (x{}): {}",
            outliers.iqr_multiplier,
            outliers.total_outliers()
        );
        for column in outliers.columns.iter().filter(|c| c.outlier_count > 0) {
            println!("    {}: {}", column.column, column.outlier_count);
        }
    }
    println!();

    let unrecognized = report.unrecognized_values();
    if !unrecognized.is_empty() {
        println!("Unrecognized categories:");
        for (column, value) in unrecognized.iter().take(10) {
            println!("  ! {}: {}", column, value);
        }
        if unrecognized.len() > 10 {
            println!("  ... and {} more", unrecognized.len() - 10);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}
