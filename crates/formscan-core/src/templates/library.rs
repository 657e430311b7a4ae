//! Template library and its per-domain view.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::TemplateError;
use crate::models::config::TemplateConfig;
use crate::models::record::DocumentDomain;
use crate::models::template::FormTemplate;
use crate::templates::builtin::builtin_templates;

/// Ordered collection of templates with unique ids.
///
/// The library may hold several templates with the same name; views are
/// deduplicated on demand.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: Vec<FormTemplate>,
}

/// Accepted library file layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum LibraryFile {
    List(Vec<FormTemplate>),
    Wrapped { templates: Vec<FormTemplate> },
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library, rejecting duplicate ids.
    pub fn from_templates(templates: Vec<FormTemplate>) -> Result<Self, TemplateError> {
        let mut library = Self::new();
        library.extend(templates)?;
        Ok(library)
    }

    /// Parse a JSON array of templates, or an object with a `templates` array.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let file: LibraryFile =
            serde_json::from_str(json).map_err(|e| TemplateError::Parse(e.to_string()))?;

        let templates = match file {
            LibraryFile::List(templates) => templates,
            LibraryFile::Wrapped { templates } => templates,
        };

        Self::from_templates(templates)
    }

    /// Load a library file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let library = Self::from_json(&content)?;
        debug!("Loaded {} templates from {}", library.len(), path.display());
        Ok(library)
    }

    /// Library described by the configuration: the configured file, then the
    /// built-in templates whose ids are not taken yet.
    pub fn from_config(config: &TemplateConfig) -> crate::Result<Self> {
        let mut library = match &config.library {
            Some(path) => Self::from_file(path)?,
            None => Self::new(),
        };

        if config.include_builtin {
            for template in builtin_templates() {
                if library.get(&template.id).is_none() {
                    library.push(template)?;
                }
            }
        }

        Ok(library)
    }

    /// Add one template.
    pub fn push(&mut self, template: FormTemplate) -> Result<(), TemplateError> {
        if self.get(&template.id).is_some() {
            return Err(TemplateError::DuplicateId(template.id));
        }

        for issue in template.validate() {
            warn!("{}", issue);
        }
        self.templates.push(template);
        Ok(())
    }

    /// Append templates, keeping insertion order.
    pub fn extend<I>(&mut self, templates: I) -> Result<(), TemplateError>
    where
        I: IntoIterator<Item = FormTemplate>,
    {
        for template in templates {
            self.push(template)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&FormTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormTemplate> {
        self.templates.iter()
    }

    pub fn templates(&self) -> &[FormTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates of a domain, bindable and deduplicated by name.
    pub fn view(&self, domain: DocumentDomain) -> Vec<&FormTemplate> {
        self.view_by(|t| domain.accepts(t))
    }

    /// Templates accepted by `predicate`, bindable and deduplicated by name.
    pub fn view_by<P>(&self, predicate: P) -> Vec<&FormTemplate>
    where
        P: Fn(&FormTemplate) -> bool,
    {
        deduplicate(
            self.templates
                .iter()
                .filter(|t| t.is_bindable() && predicate(*t)),
        )
    }
}

impl FromIterator<FormTemplate> for TemplateLibrary {
    /// Collects templates, keeping the first of any duplicate id.
    fn from_iter<T: IntoIterator<Item = FormTemplate>>(iter: T) -> Self {
        let mut library = Self::new();
        for template in iter {
            if let Err(e) = library.push(template) {
                warn!("Skipping template: {}", e);
            }
        }
        library
    }
}

/// Keep the first template of every case-insensitive name, in input order.
pub fn deduplicate<'a, I>(templates: I) -> Vec<&'a FormTemplate>
where
    I: IntoIterator<Item = &'a FormTemplate>,
{
    let mut seen = HashSet::new();
    templates
        .into_iter()
        .filter(|t| seen.insert(t.name.to_lowercase()))
        .collect()
}
