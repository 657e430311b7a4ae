//! Keyword-based classification of document text.
//!
//! Each axis is an ordered rule list. The first rule with at least one
//! keyword found in the lower-cased text gives the label, so the order of
//! the tables encodes domain priority.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::record::DocumentDomain;

/// Keyword set mapped to a label.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub label: &'static str,
}

const fn rule(keywords: &'static [&'static str], label: &'static str) -> KeywordRule {
    KeywordRule { keywords, label }
}

/// Sector of a procedure. "commerce" is checked before "agriculture" on purpose.
pub const CATEGORY_RULES: &[KeywordRule] = &[
    rule(&["commerce", "entreprise", "société"], "Commerce"),
    rule(&["urbanisme", "construction", "permis"], "Urbanisme"),
    rule(&["état civil", "naissance", "mariage"], "État Civil"),
    rule(&["fiscalité", "impôt", "taxe"], "Fiscalité"),
    rule(&["santé", "médical", "hôpital"], "Santé"),
    rule(&["éducation", "école", "université"], "Éducation"),
    rule(&["transport", "permis de conduire", "véhicule"], "Transport"),
    rule(&["environnement", "écologie", "pollution"], "Environnement"),
    rule(&["agriculture", "agricole", "exploitation"], "Agriculture"),
];

/// Administration in charge.
pub const ADMINISTRATION_RULES: &[KeywordRule] = &[
    rule(&["intérieur", "wilaya", "commune"], "Ministère de l'Intérieur"),
    rule(&["finance", "impôt", "fiscal"], "Ministère des Finances"),
    rule(&["justice", "tribunal", "juridique"], "Ministère de la Justice"),
    rule(&["santé", "médical", "hôpital"], "Ministère de la Santé"),
    rule(&["éducation", "école", "université"], "Ministère de l'Éducation"),
    rule(&["commerce", "entreprise", "commercial"], "Ministère du Commerce"),
    rule(&["agriculture", "agricole", "exploitation"], "Ministère de l'Agriculture"),
    rule(&["transport", "véhicule", "route"], "Ministère des Transports"),
];

/// Target population.
pub const AUDIENCE_RULES: &[KeywordRule] = &[
    rule(&["citoyen", "individu", "personne physique"], "citoyen"),
    rule(&["entreprise", "société", "personne morale"], "entreprise"),
    rule(&["professionnel", "métier", "profession"], "professionnel"),
    rule(&["association", "organisme", "collectif"], "association"),
    rule(&["étranger", "expatrié", "visa"], "etranger"),
];

/// Audience when no rule matches.
pub const DEFAULT_AUDIENCE: &str = "citoyen";

/// Legal text type, most specific enactments first.
pub const LEGAL_TYPE_RULES: &[KeywordRule] = &[
    rule(&["ordonnance"], "Ordonnance"),
    rule(&["décret", "decret"], "Décret"),
    rule(&["arrêté", "arrete"], "Arrêté"),
    rule(&["circulaire"], "Circulaire"),
    rule(&["instruction n°", "instruction ministérielle", "instruction interministérielle"], "Instruction"),
    rule(&["loi n°", "loi organique", "présente loi", "loi de finances"], "Loi"),
    rule(&["jurisprudence", "cour suprême", "conseil d'état"], "Jurisprudence"),
    rule(&["révision constitutionnelle", "constitution"], "Constitution"),
    rule(&["règlement"], "Règlement"),
    rule(&["décision"], "Décision"),
    rule(&["convention"], "Convention"),
    rule(&["accord"], "Accord"),
    rule(&["déclaration"], "Déclaration"),
    rule(&["bulletin"], "Bulletin"),
];

/// Procedure type.
pub const PROCEDURE_TYPE_RULES: &[KeywordRule] = &[rule(
    &["procédure", "démarche", "formalité", "demande"],
    "Procédure Administrative",
)];

/// Classification axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierAxis {
    DocumentType,
    Category,
    Administration,
    Audience,
}

/// Labels detected in one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration: Option<String>,

    pub audience: String,
}

impl Classification {
    pub fn axis(&self, axis: ClassifierAxis) -> Option<&str> {
        match axis {
            ClassifierAxis::DocumentType => self.document_type.as_deref(),
            ClassifierAxis::Category => self.category.as_deref(),
            ClassifierAxis::Administration => self.administration.as_deref(),
            ClassifierAxis::Audience => Some(&self.audience),
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            document_type: None,
            category: None,
            administration: None,
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }
}

/// First rule (in declared order) with a keyword contained in `lowered`.
pub fn first_match<'r>(rules: &'r [KeywordRule], lowered: &str) -> Option<&'r KeywordRule> {
    rules
        .iter()
        .find(|r| r.keywords.iter().any(|k| lowered.contains(k)))
}

/// Keyword classifier for one domain.
#[derive(Debug, Clone, Copy)]
pub struct CategoryClassifier {
    domain: DocumentDomain,
}

impl CategoryClassifier {
    pub fn new(domain: DocumentDomain) -> Self {
        Self { domain }
    }

    pub fn rules(&self, axis: ClassifierAxis) -> &'static [KeywordRule] {
        match axis {
            ClassifierAxis::DocumentType => match self.domain {
                DocumentDomain::Legal => LEGAL_TYPE_RULES,
                DocumentDomain::Procedure => PROCEDURE_TYPE_RULES,
            },
            ClassifierAxis::Category => CATEGORY_RULES,
            ClassifierAxis::Administration => ADMINISTRATION_RULES,
            ClassifierAxis::Audience => AUDIENCE_RULES,
        }
    }

    /// Label of one axis, if any rule matches.
    pub fn classify_axis(&self, axis: ClassifierAxis, text: &str) -> Option<&'static str> {
        first_match(self.rules(axis), &text.to_lowercase()).map(|r| r.label)
    }

    /// Classify text on every axis. Only the audience is always set.
    pub fn classify(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();
        let label = |axis| first_match(self.rules(axis), &lowered).map(|r| r.label.to_string());

        let classification = Classification {
            document_type: label(ClassifierAxis::DocumentType),
            category: label(ClassifierAxis::Category),
            administration: label(ClassifierAxis::Administration),
            audience: label(ClassifierAxis::Audience).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
        };

        debug!(
            "Classified {} chars as type={:?} category={:?} administration={:?} audience={}",
            text.len(),
            classification.document_type,
            classification.category,
            classification.administration,
            classification.audience
        );

        classification
    }
}
