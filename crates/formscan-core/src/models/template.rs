//! Form template models.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Input widget type of a template field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    /// Single line of text.
    #[default]
    Text,
    /// Multi-line text.
    Textarea,
    /// One choice among `options`.
    Select,
    /// Boolean toggle.
    Checkbox,
    /// Calendar date.
    Date,
    /// Link.
    Url,
    /// Numeric value.
    Number,
    /// Ordered list of strings (steps, required documents...).
    DynamicList,
}

/// One field of a form template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name, unique within its template.
    pub name: String,

    /// Display label.
    #[serde(default)]
    pub label: String,

    /// Widget type.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Whether the field must be filled before submission.
    #[serde(default)]
    pub required: bool,

    /// Choices for `select` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            options: Vec::new(),
            placeholder: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// A named data entry schema for one document or procedure category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    /// Unique identifier.
    pub id: String,

    /// Display name. Libraries are deduplicated on this, case-insensitively.
    pub name: String,

    /// Free-form type, e.g. "Loi" or "Procédure Administrative".
    #[serde(rename = "type", default)]
    pub template_type: String,

    /// Free-form category.
    #[serde(default)]
    pub category: String,

    /// Description.
    #[serde(default)]
    pub description: String,

    /// Ordered field list.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        template_type: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template_type: template_type.into(),
            category: category.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check template invariants and return a list of problems.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.id.trim().is_empty() {
            issues.push("Missing template id".to_string());
        }

        if self.name.trim().is_empty() {
            issues.push(format!("Template {} has no name", self.id));
        }

        if self.fields.is_empty() {
            issues.push(format!("Template {} has no fields", self.id));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                issues.push(format!("Template {} has a field without name", self.id));
            } else if !seen.insert(field.name.as_str()) {
                issues.push(format!(
                    "Template {} declares field {} more than once",
                    self.id, field.name
                ));
            }

            if field.field_type == FieldType::Select && field.options.is_empty() {
                issues.push(format!(
                    "Select field {} of template {} has no options",
                    field.name, self.id
                ));
            }
        }

        issues
    }

    /// A template can be offered to the binder only with a non-empty field list.
    pub fn is_bindable(&self) -> bool {
        !self.fields.is_empty()
    }
}
