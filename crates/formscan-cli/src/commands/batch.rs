//! Batch filling for multiple OCR records.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use formscan_core::{
    DocumentDomain, FillOutcome, FormFiller, FormscanConfig, RawExtractionRecord, TemplateLibrary,
};

use super::{format_output, load_config, load_library, DomainArg, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Template library file, overrides the configured one
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Domain every form accepts (defaults to each record's own domain)
    #[arg(short, long, value_enum)]
    domain: Option<DomainArg>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of filling from a single record.
struct FillResult {
    path: PathBuf,
    outcome: Option<FillOutcome>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl FillResult {
    fn status(&self) -> &'static str {
        match &self.outcome {
            Some(FillOutcome::Filled(_)) => "filled",
            Some(FillOutcome::NoTemplate { .. }) => "no_template",
            Some(FillOutcome::DomainMismatch { .. }) => "domain_mismatch",
            None => "error",
        }
    }
}

/// One line of the summary CSV.
#[derive(Serialize)]
struct SummaryRow<'a> {
    file: &'a str,
    status: &'a str,
    template: &'a str,
    filled: Option<usize>,
    total: Option<usize>,
    processing_time_ms: u64,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let library = load_library(&config, args.templates.as_deref())?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("json")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} records to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = fill_single_file(&path, &library, &args, &config);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => {
                results.push(FillResult {
                    path,
                    outcome: Some(outcome),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FillResult {
                        path,
                        outcome: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            let Some(FillOutcome::Filled(output)) = &result.outcome else {
                continue;
            };

            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("record");
            let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            fs::write(&output_path, format_output(output, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let filled = results.iter().filter(|r| r.status() == "filled").count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let skipped = results.len() - filled - failed.len();

    println!();
    println!(
        "{} Processed {} records in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} filled, {} skipped, {} failed",
        style(filled).green(),
        style(skipped).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed records:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn fill_single_file(
    path: &Path,
    library: &TemplateLibrary,
    args: &BatchArgs,
    config: &FormscanConfig,
) -> anyhow::Result<FillOutcome> {
    let record = RawExtractionRecord::from_file(path)?;
    let domain = args
        .domain
        .map(DocumentDomain::from)
        .unwrap_or(record.document_type);

    let filler = FormFiller::from_config(domain, config);
    Ok(filler.fill(record, library, None))
}

fn write_summary(path: &Path, results: &[FillResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        let file = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let output = result.outcome.as_ref().and_then(FillOutcome::output);

        wtr.serialize(SummaryRow {
            file,
            status: result.status(),
            template: output.map(|o| o.template_id.as_str()).unwrap_or(""),
            filled: output.map(|o| o.filled_count),
            total: output.map(|o| o.total_count),
            processing_time_ms: result.processing_time_ms,
            error: result.error.as_deref().unwrap_or(""),
        })?;
    }

    wtr.flush()?;
    Ok(())
}
