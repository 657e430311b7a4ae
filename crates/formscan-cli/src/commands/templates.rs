//! Templates command - inspect the template library.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use formscan_core::{select_template, DocumentDomain, TemplateLibrary};

use super::{load_config, load_library, DomainArg};

/// Arguments for the templates command.
#[derive(Args)]
pub struct TemplatesArgs {
    /// Template library file, overrides the configured one
    #[arg(short, long, global = true)]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: TemplatesCommand,
}

#[derive(Subcommand)]
enum TemplatesCommand {
    /// List templates, optionally restricted to one domain
    List {
        /// Only show the deduplicated view of this domain
        #[arg(short, long, value_enum)]
        domain: Option<DomainArg>,
    },

    /// Show which template a detected type selects
    Match {
        /// Detected document type (e.g. "Décret")
        detected_type: String,

        /// Domain to select from
        #[arg(short, long, value_enum, default_value = "legal")]
        domain: DomainArg,
    },

    /// Show the fields of one template
    Show {
        /// Template id
        id: String,
    },
}

pub fn run(args: TemplatesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let library = load_library(&config, args.templates.as_deref())?;

    match args.command {
        TemplatesCommand::List { domain } => list_templates(&library, domain.map(DocumentDomain::from)),
        TemplatesCommand::Match {
            detected_type,
            domain,
        } => match_template(&library, domain.into(), &detected_type),
        TemplatesCommand::Show { id } => show_template(&library, &id),
    }
}

fn list_templates(library: &TemplateLibrary, domain: Option<DocumentDomain>) -> anyhow::Result<()> {
    let templates = match domain {
        Some(domain) => library.view(domain),
        None => library.iter().collect(),
    };

    if templates.is_empty() {
        println!("{} No templates available", style("ℹ").blue());
        return Ok(());
    }

    println!(
        "{:<24} {:<28} {:<28} {:>6}",
        style("ID").bold(),
        style("NAME").bold(),
        style("TYPE").bold(),
        style("FIELDS").bold()
    );
    for template in templates {
        println!(
            "{:<24} {:<28} {:<28} {:>6}",
            template.id,
            template.name,
            template.template_type,
            template.fields.len()
        );
    }

    Ok(())
}

fn match_template(
    library: &TemplateLibrary,
    domain: DocumentDomain,
    detected_type: &str,
) -> anyhow::Result<()> {
    let view = library.view(domain);

    match select_template(&view, Some(detected_type)) {
        Some(selected) => {
            println!(
                "{} {} ({}) via {:?} match",
                style("✓").green(),
                selected.template.name,
                selected.template.id,
                selected.strategy
            );
        }
        None => {
            println!(
                "{} No {} template available",
                style("!").yellow(),
                domain
            );
        }
    }

    Ok(())
}

fn show_template(library: &TemplateLibrary, id: &str) -> anyhow::Result<()> {
    let template = library
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Template not found: {}", id))?;

    println!("{} ({})", style(&template.name).bold(), template.id);
    println!("Type: {}", template.template_type);
    println!("Category: {}", template.category);
    if !template.description.is_empty() {
        println!("{}", template.description);
    }
    println!();

    for field in &template.fields {
        let required = if field.required { "*" } else { " " };
        println!(
            "  {}{:<24} {:<14} {}",
            required,
            field.name,
            format!("{:?}", field.field_type),
            field.label
        );
    }

    let issues = template.validate();
    if !issues.is_empty() {
        println!();
        for issue in issues {
            println!("{} {}", style("!").yellow(), issue);
        }
    }

    Ok(())
}
