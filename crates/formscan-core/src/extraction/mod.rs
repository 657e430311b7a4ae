//! Extraction pipeline: synonym resolution, free-text patterns, keyword
//! classification and field binding.

pub mod binder;
pub mod classifier;
pub mod defaults;
pub mod pipeline;
pub mod rules;
pub mod synonyms;

pub use binder::{FieldBinder, FieldRule, ValueSource};
pub use classifier::{CategoryClassifier, Classification, ClassifierAxis};
pub use defaults::apply_defaults;
pub use pipeline::{FillOutcome, FormFiller};
pub use synonyms::{CanonicalValueMap, Concept, SynonymResolver};
