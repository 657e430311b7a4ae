//! End-to-end form filling for one domain.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::extraction::binder::FieldBinder;
use crate::extraction::classifier::{CategoryClassifier, Classification};
use crate::extraction::synonyms::{CanonicalValueMap, Concept, SynonymResolver};
use crate::models::config::FormscanConfig;
use crate::models::form::ExtractionOutput;
use crate::models::record::{DocumentDomain, RawExtractionRecord};
use crate::models::template::FormTemplate;
use crate::notify::{summarize, CompletionHandler, LogHandler};
use crate::templates::{find_template, select_template, TemplateLibrary};

/// Result of one fill. None of the variants is an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FillOutcome {
    /// Fields were bound onto a template.
    Filled(ExtractionOutput),
    /// The library view was empty; the binder was not run.
    NoTemplate { classification: Classification },
    /// The record belongs to another domain and was dropped.
    DomainMismatch {
        expected: DocumentDomain,
        received: DocumentDomain,
    },
}

impl FillOutcome {
    pub fn output(&self) -> Option<&ExtractionOutput> {
        match self {
            Self::Filled(output) => Some(output),
            _ => None,
        }
    }

    pub fn into_output(self) -> Option<ExtractionOutput> {
        match self {
            Self::Filled(output) => Some(output),
            _ => None,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Filled(_))
    }
}

/// Runs resolver, classifier, matcher and binder for records of one domain.
pub struct FormFiller<H: CompletionHandler = LogHandler> {
    domain: DocumentDomain,
    resolver: SynonymResolver,
    classifier: CategoryClassifier,
    binder: FieldBinder,
    handler: H,
}

impl FormFiller<LogHandler> {
    pub fn new(domain: DocumentDomain) -> Self {
        Self {
            domain,
            resolver: SynonymResolver::new(),
            classifier: CategoryClassifier::new(domain),
            binder: FieldBinder::new(),
            handler: LogHandler,
        }
    }

    pub fn from_config(domain: DocumentDomain, config: &FormscanConfig) -> Self {
        let extraction = &config.extraction;
        Self {
            domain,
            resolver: SynonymResolver::new()
                .with_case_insensitive_keys(extraction.case_insensitive_keys)
                .with_defaults(extraction.apply_defaults),
            classifier: CategoryClassifier::new(domain),
            binder: FieldBinder::new().with_defaults(extraction.apply_defaults),
            handler: LogHandler,
        }
    }
}

impl<H: CompletionHandler> FormFiller<H> {
    /// Report outcomes to another handler.
    pub fn with_handler<H2: CompletionHandler>(self, handler: H2) -> FormFiller<H2> {
        FormFiller {
            domain: self.domain,
            resolver: self.resolver,
            classifier: self.classifier,
            binder: self.binder,
            handler,
        }
    }

    pub fn domain(&self) -> DocumentDomain {
        self.domain
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Resolve and classify a record without binding it.
    pub fn prepare(&self, record: RawExtractionRecord) -> CanonicalValueMap {
        let mut canonical = self.resolver.resolve(record, self.domain);
        let classification = self.classifier.classify(&canonical.classification_text());
        canonical.set_classification(classification);
        canonical
    }

    /// Fill a record against the domain view of `library`.
    pub fn fill(
        &self,
        record: RawExtractionRecord,
        library: &TemplateLibrary,
        preselected: Option<&str>,
    ) -> FillOutcome {
        self.fill_with_view(record, &library.view(self.domain), preselected)
    }

    /// Fill a record against an already filtered and deduplicated view.
    ///
    /// A preselected template (id or name) is used when present in the view;
    /// otherwise the template is selected from the detected type.
    pub fn fill_with_view(
        &self,
        record: RawExtractionRecord,
        view: &[&FormTemplate],
        preselected: Option<&str>,
    ) -> FillOutcome {
        if record.document_type != self.domain {
            warn!(
                "Dropping {} record in {} pipeline",
                record.document_type, self.domain
            );
            self.handler
                .on_domain_mismatch(self.domain, record.document_type);
            return FillOutcome::DomainMismatch {
                expected: self.domain,
                received: record.document_type,
            };
        }

        let canonical = self.prepare(record);
        let classification = canonical.classification().cloned().unwrap_or_default();
        let detected_type = canonical
            .get(Concept::DocumentType)
            .or(classification.document_type.as_deref());

        let template = match preselected.and_then(|key| find_template(view, key)) {
            Some(template) => Some(template),
            None => {
                if let Some(key) = preselected {
                    warn!("Template {} not in the {} library, selecting by type", key, self.domain);
                }
                select_template(view, detected_type).map(|m| m.template)
            }
        };

        let Some(template) = template else {
            info!("No {} template available", self.domain);
            self.handler.on_no_template(&classification);
            return FillOutcome::NoTemplate { classification };
        };

        let bound = self.binder.bind(template, &canonical);
        let summary = summarize(&bound);
        debug!("Filled {} of template {}", summary, template.id);

        let output = ExtractionOutput {
            template_id: template.id.clone(),
            detected_type: detected_type.map(str::to_string),
            detected_category: canonical
                .get(Concept::Category)
                .map(str::to_string)
                .or(classification.category.clone()),
            detected_administration: ["sectorAdministration", "administration"]
                .into_iter()
                .find_map(|key| canonical.raw(key))
                .map(str::to_string)
                .or(classification.administration.clone()),
            detected_audience: canonical
                .raw("targetCategory")
                .map(str::to_string)
                .unwrap_or(classification.audience.clone()),
            filled_count: summary.filled_count,
            total_count: summary.total_count,
            bound_fields: bound,
        };

        self.handler.on_complete(&output, &summary);
        FillOutcome::Filled(output)
    }
}
