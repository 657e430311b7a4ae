//! Classify command - keyword classification and pattern extraction on raw text.

use std::path::PathBuf;

use clap::Args;
use console::style;

use formscan_core::extraction::classifier::ClassifierAxis;
use formscan_core::{extract, CategoryClassifier, DocumentDomain, PatternConcept};

use super::DomainArg;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Text file to classify
    pub input: PathBuf,

    /// Domain whose type rules apply
    #[arg(short, long, value_enum, default_value = "legal")]
    pub domain: DomainArg,

    /// Also run the pattern extractors on the text
    #[arg(short, long)]
    pub patterns: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = std::fs::read_to_string(&args.input)?;
    let domain = DocumentDomain::from(args.domain);
    let classification = CategoryClassifier::new(domain).classify(&text);

    let extracted: Vec<(PatternConcept, String)> = if args.patterns {
        PatternConcept::ALL
            .iter()
            .filter_map(|&concept| extract(concept, &text).map(|value| (concept, value)))
            .collect()
    } else {
        Vec::new()
    };

    if args.json {
        let mut json = serde_json::to_value(&classification)?;
        if args.patterns {
            let patterns: serde_json::Map<String, serde_json::Value> = extracted
                .into_iter()
                .map(|(concept, value)| (concept.key().to_string(), value.into()))
                .collect();
            json["patterns"] = patterns.into();
        }
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let axes = [
        ("Type", ClassifierAxis::DocumentType),
        ("Category", ClassifierAxis::Category),
        ("Administration", ClassifierAxis::Administration),
        ("Audience", ClassifierAxis::Audience),
    ];
    for (label, axis) in axes {
        match classification.axis(axis) {
            Some(value) => println!("{:<16} {}", label, style(value).green()),
            None => println!("{:<16} {}", label, style("-").dim()),
        }
    }

    if args.patterns {
        println!();
        if extracted.is_empty() {
            println!("{} No pattern matched", style("ℹ").blue());
        }
        for (concept, value) in extracted {
            println!("{:<22} {}", concept.key(), value);
        }
    }

    Ok(())
}
