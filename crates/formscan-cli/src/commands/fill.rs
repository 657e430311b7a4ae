use clap::Args;
use console::style;
use formscan_core::{
    DocumentDomain, FillOutcome, FormFiller, ModeSwitch, RawExtractionRecord, ReviewTransition,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info};

use super::{format_output, load_config, load_library, DomainArg, OutputFormat};

#[derive(Args)]
pub struct FillArgs {
    /// OCR record to fill a form from (JSON)
    pub input: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Template library file, overrides the configured one
    #[arg(short, long)]
    pub templates: Option<PathBuf>,

    /// Template id or name to use instead of type matching
    #[arg(long)]
    pub template: Option<String>,

    /// Domain the form accepts (defaults to the record's own domain)
    #[arg(short, long, value_enum)]
    pub domain: Option<DomainArg>,

    /// List the declared fields that were left empty
    #[arg(long)]
    pub summary: bool,

    /// Return as soon as the form is filled, without waiting for review mode
    #[arg(long)]
    pub no_review: bool,
}

pub async fn run(args: FillArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    info!("Filling form from: {}", args.input.display());

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let record = RawExtractionRecord::from_file(&args.input)?;
    let domain = args
        .domain
        .map(DocumentDomain::from)
        .unwrap_or(record.document_type);
    let library = load_library(&config, args.templates.as_deref())?;
    debug!("Loaded {} templates", library.len());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Binding fields...");

    let filler = FormFiller::from_config(domain, &config);
    let outcome = filler.fill(record, &library, args.template.as_deref());

    pb.finish_and_clear();

    let output = match outcome {
        FillOutcome::Filled(output) => output,
        FillOutcome::NoTemplate { classification } => {
            eprintln!(
                "{} No {} template available, nothing was filled",
                style("!").yellow(),
                domain
            );
            if let Some(detected) = classification.document_type {
                eprintln!("  Detected type: {}", detected);
            }
            return Ok(());
        }
        FillOutcome::DomainMismatch { expected, received } => {
            eprintln!(
                "{} Incompatible document type: expected {}, received {}",
                style("!").yellow(),
                expected,
                received
            );
            return Ok(());
        }
    };

    let rendered = format_output(&output, args.format)?;
    let summary = output.summary();

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &rendered)?;
        println!(
            "{} Output written to: {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", rendered);
    }

    eprintln!("{} {}", style("✓").green(), summary.message());

    if args.summary {
        eprintln!("   {} fields filled", summary);
        let empty: Vec<&str> = output
            .bound_fields
            .fields()
            .filter(|(_, value)| !value.is_filled())
            .map(|(name, _)| name)
            .collect();
        if !empty.is_empty() {
            eprintln!("   Left empty: {}", style(empty.join(", ")).yellow());
        }
    }

    if !args.no_review {
        let switch = ModeSwitch::new();
        let transition = ReviewTransition::from(&config.review);
        let delayed = {
            let switch = switch.clone();
            tokio::spawn(async move {
                tokio::time::sleep(transition.delay).await;
                transition.fire(&switch)
            })
        };
        if delayed.await? {
            debug!("Switched to {:?} mode", switch.mode());
        }
    }

    Ok(())
}
