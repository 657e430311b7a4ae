//! Raw OCR records and document domains.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RecordError;
use crate::models::template::FormTemplate;

/// Known legal text types, in the order offered to users.
pub const LEGAL_TEXT_TYPES: &[&str] = &[
    "Loi",
    "Décret",
    "Arrêté",
    "Ordonnance",
    "Circulaire",
    "Instruction",
    "Jurisprudence",
    "Fonction Publique",
    "Jurisprudence Fonction Publique",
    "Constitution",
    "Règlement",
    "Décision",
    "Texte Constitutionnel",
    "Accord",
    "Convention",
    "Code Juridique",
    "Déclaration",
    "Bulletin",
];

/// Known legal text categories.
pub const LEGAL_TEXT_CATEGORIES: &[&str] = &[
    "Textes Législatifs",
    "Textes Réglementaires",
    "Décisions Judiciaires",
    "Administration Publique",
    "Communications Officielles",
    "Textes Juridiques",
    "Publications",
    "Accords Internationaux",
    "Textes Constitutionnels",
];

/// Known administrative procedure types.
pub const PROCEDURE_TYPES: &[&str] = &[
    "Procédure Administrative",
    "Procédure",
    "Procedure Administrative",
];

/// Known administrative procedure categories.
pub const PROCEDURE_CATEGORIES: &[&str] = &[
    "Procédures Administratives",
    "Urbanisme",
    "État civil",
    "Social",
    "Fiscal",
    "Commerce",
    "Environnement",
    "Santé",
    "Éducation",
    "Transport",
    "Agriculture",
    "Fiscalité",
    "Fonction Publique",
    "État Civil",
    "Emploi",
];

/// Domain a document (and a template) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentDomain {
    /// Legal texts (laws, decrees, orders...).
    Legal,
    /// Administrative procedures.
    Procedure,
}

impl DocumentDomain {
    /// Discriminator string used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Procedure => "procedure",
        }
    }

    /// Known template types for this domain.
    pub fn known_types(&self) -> &'static [&'static str] {
        match self {
            Self::Legal => LEGAL_TEXT_TYPES,
            Self::Procedure => PROCEDURE_TYPES,
        }
    }

    /// Known template categories for this domain.
    pub fn known_categories(&self) -> &'static [&'static str] {
        match self {
            Self::Legal => LEGAL_TEXT_CATEGORIES,
            Self::Procedure => PROCEDURE_CATEGORIES,
        }
    }

    /// Raw type tag some template libraries use instead of a display type.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Legal => "textes_juridiques",
            Self::Procedure => "procedures_administratives",
        }
    }

    /// Type selected when nothing was detected.
    pub fn default_type(&self) -> &'static str {
        self.known_types()[0]
    }

    /// Default library filter: does this template belong to the domain?
    pub fn accepts(&self, template: &FormTemplate) -> bool {
        self.known_types().contains(&template.template_type.as_str())
            || self.known_categories().contains(&template.category.as_str())
            || template.template_type == self.type_tag()
    }
}

impl fmt::Display for DocumentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentDomain {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legal" | "juridique" => Ok(Self::Legal),
            "procedure" | "procédure" => Ok(Self::Procedure),
            other => Err(RecordError::UnknownDocumentType(other.to_string())),
        }
    }
}

/// Key/value output of the OCR step for one document.
///
/// Values that were not strings in the source JSON are coerced on the way in:
/// numbers and booleans keep their textual form, `null`, arrays and objects
/// become the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtractionRecord {
    /// Domain discriminator.
    pub document_type: DocumentDomain,

    /// Raw recognized fields.
    #[serde(default, deserialize_with = "deserialize_form_data")]
    pub form_data: HashMap<String, String>,
}

impl RawExtractionRecord {
    /// Create an empty record for a domain.
    pub fn new(document_type: DocumentDomain) -> Self {
        Self {
            document_type,
            form_data: HashMap::new(),
        }
    }

    /// Add a raw field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_data.insert(key.into(), value.into());
        self
    }

    /// Exact key lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.form_data.get(key).map(String::as_str)
    }

    /// Parse a record from its JSON boundary form.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json).map_err(|e| RecordError::Parse(e.to_string()))
    }

    /// Load a record from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

fn deserialize_form_data<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, coerce_text(value)))
        .collect())
}

fn coerce_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            String::new()
        }
    }
}
