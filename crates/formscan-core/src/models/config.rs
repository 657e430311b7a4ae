//! Configuration structures for the form filling pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FormscanError;

/// Main configuration for the formscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormscanConfig {
    /// Extraction configuration.
    pub extraction: ExtractionConfig,

    /// Review mode switch configuration.
    pub review: ReviewConfig,

    /// Template library configuration.
    pub templates: TemplateConfig,
}

/// Extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Run the defaulting pass after binding.
    pub apply_defaults: bool,

    /// Fall back to case-insensitive raw key matching (`TYPE` for `type`).
    pub case_insensitive_keys: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            apply_defaults: true,
            case_insensitive_keys: true,
        }
    }
}

/// Scanning to reviewing switch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Delay before switching to review mode, in milliseconds.
    pub delay_ms: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self { delay_ms: 500 }
    }
}

impl ReviewConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Template library configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// JSON file holding the template library.
    pub library: Option<PathBuf>,

    /// Append the built-in templates to the library.
    pub include_builtin: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            library: None,
            include_builtin: true,
        }
    }
}

impl FormscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FormscanError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FormscanConfig =
            serde_json::from_str(r#"{"review": {"delay_ms": 200}}"#).unwrap();

        assert_eq!(config.review.delay(), Duration::from_millis(200));
        assert!(config.extraction.apply_defaults);
        assert!(config.templates.include_builtin);
        assert!(config.templates.library.is_none());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"review": {"delay_ms": "soon"}}"#).unwrap();

        let err = FormscanConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, FormscanError::Config(_)));
    }
}
