//! Synonym resolution from raw OCR keys to canonical concepts.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::extraction::classifier::Classification;
use crate::models::record::{DocumentDomain, RawExtractionRecord};

/// Canonical concept vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Concept {
    Title,
    Reference,
    Date,
    Authority,
    Content,
    Description,
    Category,
    #[serde(rename = "type")]
    DocumentType,
    Language,
    Status,
    Keywords,
    Source,
}

impl Concept {
    pub const ALL: [Concept; 12] = [
        Self::Title,
        Self::Reference,
        Self::Date,
        Self::Authority,
        Self::Content,
        Self::Description,
        Self::Category,
        Self::DocumentType,
        Self::Language,
        Self::Status,
        Self::Keywords,
        Self::Source,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Reference => "reference",
            Self::Date => "date",
            Self::Authority => "authority",
            Self::Content => "content",
            Self::Description => "description",
            Self::Category => "category",
            Self::DocumentType => "type",
            Self::Language => "language",
            Self::Status => "status",
            Self::Keywords => "keywords",
            Self::Source => "source",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Raw key aliases in priority order.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Title => &["title", "titre", "name", "nom", "intitule", "denomination", "libelle"],
            Self::Reference => &["reference", "numero_ref", "numero_texte"],
            Self::Date => &["date_journal", "publicationDate", "date"],
            Self::Authority => &["authority", "organisation", "autorite_signataire"],
            Self::Content => &["content", "contenu", "text"],
            Self::Description => &["description", "objet", "details"],
            Self::Category => &["category", "domaine"],
            Self::DocumentType => &["type", "type_texte"],
            Self::Language => &["language", "langue"],
            Self::Status => &["status", "statut"],
            Self::Keywords => &["keywords", "mots_cles"],
            Self::Source => &["source"],
        }
    }

    /// Domain-specific aliases, tried before the common ones.
    pub fn domain_aliases(&self, domain: DocumentDomain) -> &'static [&'static str] {
        match (domain, self) {
            (DocumentDomain::Procedure, Self::Title) => &["procedureName"],
            (DocumentDomain::Procedure, Self::Authority) => &["institution"],
            (DocumentDomain::Procedure, Self::Category) => &["procedureCategory"],
            (DocumentDomain::Procedure, Self::DocumentType) => &["procedureType"],
            _ => &[],
        }
    }

    /// Value used when no alias carried the concept.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            Self::Language => Some("Français"),
            Self::Status => Some("En vigueur"),
            Self::Source => Some("Journal Officiel"),
            _ => None,
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Canonical values of one extraction.
///
/// Concepts that were not found are absent, never empty strings. Raw fields
/// are kept alongside for direct lookups of template field names.
#[derive(Debug, Clone)]
pub struct CanonicalValueMap {
    domain: DocumentDomain,
    values: BTreeMap<Concept, String>,
    defaulted: BTreeSet<Concept>,
    raw_fields: HashMap<String, String>,
    case_insensitive: bool,
    classification: Option<Classification>,
}

impl CanonicalValueMap {
    pub fn new(domain: DocumentDomain) -> Self {
        Self {
            domain,
            values: BTreeMap::new(),
            defaulted: BTreeSet::new(),
            raw_fields: HashMap::new(),
            case_insensitive: false,
            classification: None,
        }
    }

    pub fn domain(&self) -> DocumentDomain {
        self.domain
    }

    /// Value of a concept. Never returns an empty string.
    pub fn get(&self, concept: Concept) -> Option<&str> {
        self.values.get(&concept).map(String::as_str)
    }

    pub fn contains(&self, concept: Concept) -> bool {
        self.values.contains_key(&concept)
    }

    /// Set a concept value; empty values are ignored.
    pub fn insert(&mut self, concept: Concept, value: impl Into<String>) {
        let value = value.into();
        if !value.trim().is_empty() {
            self.defaulted.remove(&concept);
            self.values.insert(concept, value);
        }
    }

    /// Whether the concept holds a default rather than a recognized value.
    pub fn is_defaulted(&self, concept: Concept) -> bool {
        self.defaulted.contains(&concept)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn concepts(&self) -> impl Iterator<Item = (Concept, &str)> {
        self.values.iter().map(|(c, v)| (*c, v.as_str()))
    }

    /// Non-empty raw field, by exact name then (if enabled) ignoring case.
    pub fn raw(&self, key: &str) -> Option<&str> {
        let exact = self.raw_fields.get(key).filter(|v| !v.trim().is_empty());
        if exact.is_some() || !self.case_insensitive {
            return exact.map(String::as_str);
        }

        let wanted = key.to_lowercase();
        self.raw_fields
            .iter()
            .filter(|(k, v)| k.to_lowercase() == wanted && !v.trim().is_empty())
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, v)| v.as_str())
    }

    /// Direct lookup by field name: a concept with that key, else a raw field.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        Concept::from_key(name)
            .and_then(|c| self.get(c))
            .or_else(|| self.raw(name))
    }

    /// Text fed to pattern extraction. Missing content reads as empty text.
    pub fn content(&self) -> &str {
        self.get(Concept::Content).unwrap_or("")
    }

    /// Text fed to the keyword classifier.
    pub fn classification_text(&self) -> String {
        [Concept::Title, Concept::Description, Concept::Content]
            .into_iter()
            .filter_map(|c| self.get(c))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn set_classification(&mut self, classification: Classification) {
        self.classification = Some(classification);
    }

    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }
}

/// Maps raw OCR keys onto the canonical vocabulary.
#[derive(Debug, Clone)]
pub struct SynonymResolver {
    case_insensitive: bool,
    apply_defaults: bool,
}

impl SynonymResolver {
    pub fn new() -> Self {
        Self {
            case_insensitive: true,
            apply_defaults: true,
        }
    }

    /// Fall back to case-insensitive key matching.
    pub fn with_case_insensitive_keys(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Fill language, status and source defaults when absent.
    pub fn with_defaults(mut self, enabled: bool) -> Self {
        self.apply_defaults = enabled;
        self
    }

    /// Resolve every concept of the vocabulary from a raw record.
    ///
    /// For each concept, the first alias present with a non-empty value wins.
    pub fn resolve(&self, record: RawExtractionRecord, domain: DocumentDomain) -> CanonicalValueMap {
        let mut canonical = CanonicalValueMap::new(domain);
        canonical.case_insensitive = self.case_insensitive;
        canonical.raw_fields = record.form_data;

        for concept in Concept::ALL {
            let aliases = concept
                .domain_aliases(domain)
                .iter()
                .chain(concept.aliases().iter());

            let found = aliases
                .filter_map(|alias| canonical.raw(alias))
                .next()
                .map(str::to_string);

            match found {
                Some(value) => {
                    canonical.values.insert(concept, value);
                }
                None if self.apply_defaults => {
                    if let Some(default) = concept.default_value() {
                        canonical.values.insert(concept, default.to_string());
                        canonical.defaulted.insert(concept);
                    }
                }
                None => {}
            }
        }

        debug!(
            "Resolved {} of {} concepts from {} raw fields ({} defaulted)",
            canonical.len(),
            Concept::ALL.len(),
            canonical.raw_fields.len(),
            canonical.defaulted.len()
        );

        canonical
    }
}

impl Default for SynonymResolver {
    fn default() -> Self {
        Self::new()
    }
}
