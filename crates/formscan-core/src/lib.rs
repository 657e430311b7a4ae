//! Core library for OCR form filling.
//!
//! This crate provides:
//! - Synonym resolution of raw OCR keys onto canonical concepts
//! - Regex pattern cascades recovering titles, references, dates and clauses
//! - Keyword classification (type, category, administration, audience)
//! - Template library views, deduplication and selection
//! - Field binding and completion reporting

pub mod error;
pub mod extraction;
pub mod models;
pub mod notify;
pub mod templates;

pub use error::{FormscanError, RecordError, Result, TemplateError};
pub use extraction::rules::{extract, PatternConcept};
pub use extraction::{
    CanonicalValueMap, CategoryClassifier, Classification, Concept, FieldBinder, FillOutcome,
    FormFiller, SynonymResolver,
};
pub use models::config::FormscanConfig;
pub use models::form::{AuxiliaryAttribute, BoundFormData, BoundValue, ExtractionOutput};
pub use models::record::{DocumentDomain, RawExtractionRecord};
pub use models::template::{FieldDefinition, FieldType, FormTemplate};
pub use notify::{
    summarize, CompletionHandler, CompletionSummary, InputMode, LogHandler, ModeSwitch,
    ReviewTransition,
};
pub use templates::{builtin_templates, select_template, MatchStrategy, TemplateLibrary};
