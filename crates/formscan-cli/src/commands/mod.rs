//! Subcommands and the helpers they share.

pub mod batch;
pub mod classify;
pub mod config;
pub mod fill;
pub mod templates;

use std::path::{Path, PathBuf};

use formscan_core::{DocumentDomain, ExtractionOutput, FormscanConfig, TemplateLibrary};

/// Document domain argument.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DomainArg {
    /// Legal texts
    Legal,
    /// Administrative procedures
    Procedure,
}

impl From<DomainArg> for DocumentDomain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Legal => DocumentDomain::Legal,
            DomainArg::Procedure => DocumentDomain::Procedure,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formscan")
        .join("config.json")
}

/// Configuration file in use: the `--config` path, else the default location.
pub fn config_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration. An explicit path must exist; a missing default
/// file means default settings.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FormscanConfig> {
    match config_path {
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Ok(FormscanConfig::from_file(path)?)
        }
        None => {
            let path = default_config_path();
            if path.exists() {
                Ok(FormscanConfig::from_file(&path)?)
            } else {
                Ok(FormscanConfig::default())
            }
        }
    }
}

/// Template library from the configuration, with an optional file override.
pub fn load_library(config: &FormscanConfig, templates: Option<&Path>) -> anyhow::Result<TemplateLibrary> {
    let mut template_config = config.templates.clone();
    if let Some(path) = templates {
        if !path.exists() {
            anyhow::bail!("Template library not found: {}", path.display());
        }
        template_config.library = Some(path.to_path_buf());
    }

    Ok(TemplateLibrary::from_config(&template_config)?)
}

/// Render a pipeline output.
pub fn format_output(output: &ExtractionOutput, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Csv => format_csv(output),
        OutputFormat::Text => Ok(format_text(output)),
    }
}

fn format_csv(output: &ExtractionOutput) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let bound = &output.bound_fields;
    let auxiliaries: Vec<_> = bound
        .auxiliaries()
        .filter(|(attribute, _)| bound.field(attribute.key()).is_none())
        .collect();

    let mut header = vec!["template_id".to_string()];
    header.extend(bound.fields().map(|(name, _)| name.to_string()));
    header.extend(auxiliaries.iter().map(|(attribute, _)| attribute.key().to_string()));
    wtr.write_record(&header)?;

    let mut row = vec![output.template_id.clone()];
    row.extend(bound.fields().map(|(_, value)| value.to_string()));
    row.extend(auxiliaries.iter().map(|(_, value)| value.to_string()));
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(output: &ExtractionOutput) -> String {
    let mut text = String::new();

    text.push_str(&format!("Template: {}\n", output.template_id));
    if let Some(detected) = &output.detected_type {
        text.push_str(&format!("Type: {}\n", detected));
    }
    if let Some(category) = &output.detected_category {
        text.push_str(&format!("Category: {}\n", category));
    }
    if let Some(administration) = &output.detected_administration {
        text.push_str(&format!("Administration: {}\n", administration));
    }
    text.push_str(&format!("Audience: {}\n", output.detected_audience));
    text.push('\n');

    text.push_str("Fields:\n");
    for (name, value) in output.bound_fields.fields() {
        let marker = if value.is_filled() { "x" } else { " " };
        text.push_str(&format!("  [{}] {}: {}\n", marker, name, value));
    }

    let auxiliaries: Vec<_> = output.bound_fields.auxiliaries().collect();
    if !auxiliaries.is_empty() {
        text.push('\n');
        text.push_str("Detected:\n");
        for (attribute, value) in auxiliaries {
            text.push_str(&format!("  {}: {}\n", attribute.key(), value));
        }
    }

    text.push_str(&format!(
        "\nFilled: {}/{}\n",
        output.filled_count, output.total_count
    ));

    text
}
