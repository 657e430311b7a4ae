//! Rule-based extractors that recover facts from free document text.

pub mod cascade;
pub mod dates;
pub mod patterns;

pub use cascade::{extract, ConceptExtractor, PatternCascade, PatternConcept, PatternExtractor};
pub use dates::{extract_date, DateExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value recovered from free text, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the pattern in its cascade that produced the value.
    pub pattern_index: usize,
    /// Position of the captured value in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, pattern_index: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            pattern_index,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
