//! Projection of canonical values onto a template's declared fields.
//!
//! Field names are dispatched through a declarative table: each rule lists
//! the field-name aliases it covers and an ordered list of value sources.
//! Sources are tried in order and the first non-empty value wins, so the
//! order of a rule encodes precedence (explicit, then pattern-extracted,
//! then keyword-classified, then constant).

use tracing::{debug, trace};

use crate::extraction::classifier::{CategoryClassifier, Classification, ClassifierAxis};
use crate::extraction::defaults;
use crate::extraction::rules::{ConceptExtractor, PatternConcept, PatternExtractor};
use crate::extraction::synonyms::{CanonicalValueMap, Concept};
use crate::models::form::{AuxiliaryAttribute, BoundFormData, BoundValue};
use crate::models::record::DocumentDomain;
use crate::models::template::{FieldDefinition, FieldType, FormTemplate};

/// Where a field value can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// A resolved canonical concept.
    Concept(Concept),
    /// A raw OCR field, looked up by name.
    Raw(&'static str),
    /// A pattern cascade run over the resolved content.
    Pattern(PatternConcept),
    /// A keyword classifier label.
    Classified(ClassifierAxis),
    /// A fixed value.
    Constant(&'static str),
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub aliases: &'static [&'static str],
    pub sources: &'static [ValueSource],
}

impl FieldRule {
    pub fn covers(&self, field_name: &str) -> bool {
        self.aliases.contains(&field_name)
    }
}

use ValueSource::{Classified, Concept as C, Constant, Pattern, Raw};

pub const LEGAL_FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        aliases: &["titre", "title"],
        sources: &[C(Concept::Title), Pattern(PatternConcept::Title)],
    },
    FieldRule {
        aliases: &["numero_texte", "reference", "numero_ref"],
        sources: &[C(Concept::Reference), Pattern(PatternConcept::Reference)],
    },
    FieldRule {
        aliases: &["date_journal", "date_promulgation", "date_signature", "date"],
        sources: &[C(Concept::Date), Pattern(PatternConcept::Date)],
    },
    FieldRule {
        aliases: &["organisation", "autorite_signataire", "authority"],
        sources: &[C(Concept::Authority)],
    },
    FieldRule {
        aliases: &["contenu", "content"],
        sources: &[C(Concept::Content)],
    },
    FieldRule {
        aliases: &["objet", "description"],
        sources: &[C(Concept::Description)],
    },
    FieldRule {
        aliases: &["type_texte", "type"],
        sources: &[C(Concept::DocumentType), Classified(ClassifierAxis::DocumentType)],
    },
    FieldRule {
        aliases: &["domaine", "category"],
        sources: &[C(Concept::Category)],
    },
    FieldRule {
        aliases: &["langue", "language"],
        sources: &[C(Concept::Language)],
    },
    FieldRule {
        aliases: &["statut", "status"],
        sources: &[C(Concept::Status)],
    },
    FieldRule {
        aliases: &["considerants"],
        sources: &[Raw("considerants"), Pattern(PatternConcept::Considerant)],
    },
    FieldRule {
        aliases: &["article_1", "article_premier"],
        sources: &[
            Raw("article_1"),
            Raw("article_premier"),
            Pattern(PatternConcept::ArticlePremier),
        ],
    },
    FieldRule {
        aliases: &["dispositions_finales"],
        sources: &[
            Raw("dispositions_finales"),
            Pattern(PatternConcept::DispositionsFinales),
        ],
    },
    FieldRule {
        aliases: &["mots_cles", "keywords"],
        sources: &[C(Concept::Keywords)],
    },
    FieldRule {
        aliases: &["source"],
        sources: &[C(Concept::Source)],
    },
];

pub const PROCEDURE_FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        aliases: &["procedureName", "name", "nom", "intitule", "titre", "title"],
        sources: &[C(Concept::Title), Pattern(PatternConcept::ProcedureTitle)],
    },
    FieldRule {
        aliases: &["description"],
        sources: &[C(Concept::Description), C(Concept::Content)],
    },
    FieldRule {
        aliases: &["procedureType"],
        sources: &[C(Concept::DocumentType), Constant("Demande")],
    },
    FieldRule {
        aliases: &["type"],
        sources: &[C(Concept::DocumentType), Classified(ClassifierAxis::DocumentType)],
    },
    FieldRule {
        aliases: &["procedureCategory", "category", "domaine"],
        sources: &[C(Concept::Category), Classified(ClassifierAxis::Category)],
    },
    FieldRule {
        aliases: &["sectorAdministration"],
        sources: &[
            Raw("sectorAdministration"),
            Raw("administration"),
            Classified(ClassifierAxis::Administration),
        ],
    },
    FieldRule {
        aliases: &["targetCategory"],
        sources: &[Raw("targetCategory"), Classified(ClassifierAxis::Audience)],
    },
    FieldRule {
        aliases: &["institution", "organisation", "authority"],
        sources: &[C(Concept::Authority)],
    },
    FieldRule {
        aliases: &["reference", "numero_ref", "numero_texte"],
        sources: &[C(Concept::Reference), Pattern(PatternConcept::Reference)],
    },
    FieldRule {
        aliases: &["date"],
        sources: &[C(Concept::Date), Pattern(PatternConcept::Date)],
    },
    FieldRule {
        aliases: &["contenu", "content"],
        sources: &[C(Concept::Content)],
    },
];

/// Dispatch table for a domain.
pub fn field_rules(domain: DocumentDomain) -> &'static [FieldRule] {
    match domain {
        DocumentDomain::Legal => LEGAL_FIELD_RULES,
        DocumentDomain::Procedure => PROCEDURE_FIELD_RULES,
    }
}

/// Rule covering `field_name`, if any.
pub fn rule_for(domain: DocumentDomain, field_name: &str) -> Option<&'static FieldRule> {
    field_rules(domain).iter().find(|r| r.covers(field_name))
}

/// Auxiliary attributes merged into the bound record, per domain.
pub fn auxiliary_attributes(domain: DocumentDomain) -> &'static [AuxiliaryAttribute] {
    match domain {
        DocumentDomain::Legal => &[AuxiliaryAttribute::SelectedType],
        DocumentDomain::Procedure => &[
            AuxiliaryAttribute::SelectedType,
            AuxiliaryAttribute::ProcedureCategory,
            AuxiliaryAttribute::SectorAdministration,
            AuxiliaryAttribute::TargetCategory,
        ],
    }
}

const SELECTED_TYPE_FIELDS: &[&str] = &["selectedType", "type", "type_texte"];

fn auxiliary_sources(attribute: AuxiliaryAttribute) -> &'static [ValueSource] {
    match attribute {
        AuxiliaryAttribute::SelectedType => &[
            Raw("selectedType"),
            C(Concept::DocumentType),
            Classified(ClassifierAxis::DocumentType),
        ],
        AuxiliaryAttribute::ProcedureCategory => {
            &[C(Concept::Category), Classified(ClassifierAxis::Category)]
        }
        AuxiliaryAttribute::SectorAdministration => &[
            Raw("sectorAdministration"),
            Raw("administration"),
            Classified(ClassifierAxis::Administration),
        ],
        AuxiliaryAttribute::TargetCategory => {
            &[Raw("targetCategory"), Classified(ClassifierAxis::Audience)]
        }
    }
}

/// The pattern cascade is a fallback for these canonical concepts only.
fn canonical_counterpart(concept: PatternConcept) -> Option<Concept> {
    match concept {
        PatternConcept::Title | PatternConcept::ProcedureTitle => Some(Concept::Title),
        PatternConcept::Reference => Some(Concept::Reference),
        PatternConcept::Date => Some(Concept::Date),
        _ => None,
    }
}

/// Binds canonical values onto template fields.
pub struct FieldBinder<E: ConceptExtractor = PatternExtractor> {
    extractor: E,
    apply_defaults: bool,
}

impl FieldBinder<PatternExtractor> {
    pub fn new() -> Self {
        Self {
            extractor: PatternExtractor::new(),
            apply_defaults: true,
        }
    }
}

impl Default for FieldBinder<PatternExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ConceptExtractor> FieldBinder<E> {
    /// Use another free-text extractor.
    pub fn with_extractor<F: ConceptExtractor>(self, extractor: F) -> FieldBinder<F> {
        FieldBinder {
            extractor,
            apply_defaults: self.apply_defaults,
        }
    }

    /// Run the defaulting pass after binding.
    pub fn with_defaults(mut self, enabled: bool) -> Self {
        self.apply_defaults = enabled;
        self
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Bind every declared field of `template`.
    ///
    /// The result always holds one entry per declared field, in template
    /// order. Unresolved fields carry the empty sentinel for their type.
    pub fn bind(&self, template: &FormTemplate, canonical: &CanonicalValueMap) -> BoundFormData {
        let domain = canonical.domain();
        let classification = canonical
            .classification()
            .cloned()
            .unwrap_or_else(|| CategoryClassifier::new(domain).classify(&canonical.classification_text()));

        let mut bound = BoundFormData::new();
        for field in &template.fields {
            let value = match rule_for(domain, &field.name) {
                Some(rule) => self.resolve(rule.sources, canonical, &classification),
                None => canonical.lookup(&field.name).map(str::to_string),
            };

            trace!("Field {} -> {:?}", field.name, value);
            bound.insert_field(field.name.clone(), convert(field, value.as_deref()));
        }

        for &attribute in auxiliary_attributes(domain) {
            let declared = match attribute {
                AuxiliaryAttribute::SelectedType => SELECTED_TYPE_FIELDS
                    .iter()
                    .find_map(|name| bound.text(name).filter(|v| !v.is_empty()))
                    .map(str::to_string),
                _ => bound
                    .text(attribute.key())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
            };

            let value = declared
                .or_else(|| self.resolve(auxiliary_sources(attribute), canonical, &classification));
            if let Some(value) = value {
                bound.set_auxiliary(attribute, value);
            }
        }

        if self.apply_defaults {
            defaults::apply_defaults(&mut bound, domain);
        }

        debug!(
            "Bound {} fields of template {} ({} auxiliary)",
            bound.field_count(),
            template.id,
            bound.auxiliaries().count()
        );

        bound
    }

    fn resolve(
        &self,
        sources: &[ValueSource],
        canonical: &CanonicalValueMap,
        classification: &Classification,
    ) -> Option<String> {
        sources
            .iter()
            .find_map(|source| self.evaluate(*source, canonical, classification))
            .filter(|v| !v.trim().is_empty())
    }

    fn evaluate(
        &self,
        source: ValueSource,
        canonical: &CanonicalValueMap,
        classification: &Classification,
    ) -> Option<String> {
        match source {
            ValueSource::Concept(concept) => canonical.get(concept).map(str::to_string),
            ValueSource::Raw(name) => canonical.raw(name).map(str::to_string),
            ValueSource::Pattern(concept) => {
                if canonical_counterpart(concept).is_some_and(|c| canonical.contains(c)) {
                    return None;
                }
                self.extractor
                    .extract(concept, canonical.content())
                    .filter(|v| !v.is_empty())
            }
            ValueSource::Classified(axis) => classification.axis(axis).map(str::to_string),
            ValueSource::Constant(value) => Some(value.to_string()),
        }
    }
}

/// Convert a resolved text into the value shape of the field.
fn convert(field: &FieldDefinition, value: Option<&str>) -> BoundValue {
    let text = value.unwrap_or("").trim();

    match field.field_type {
        FieldType::Checkbox => BoundValue::Flag(is_truthy(text)),
        FieldType::DynamicList => BoundValue::List(
            text.split(['\n', ';'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        FieldType::Select => {
            let option = field
                .options
                .iter()
                .find(|o| o.to_lowercase() == text.to_lowercase());
            BoundValue::Text(option.cloned().unwrap_or_else(|| text.to_string()))
        }
        _ => BoundValue::Text(text.to_string()),
    }
}

fn is_truthy(text: &str) -> bool {
    matches!(
        text.to_lowercase().as_str(),
        "true" | "oui" | "yes" | "1" | "on"
    )
}
