//! Ordered pattern cascades over free document text.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use tracing::{debug, trace};

use super::dates::extract_date;
use super::patterns::*;
use super::{ExtractionMatch, FieldExtractor};

/// Facts that can be recovered from free text when no field carried them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternConcept {
    /// Title of a legal text.
    Title,
    /// Name of an administrative procedure.
    ProcedureTitle,
    /// Enactment or reference number.
    Reference,
    /// First date mentioned, normalized to ISO.
    Date,
    /// Legal recitals ("considérant que ...").
    Considerant,
    /// Body of the first article.
    ArticlePremier,
    /// Final provisions.
    DispositionsFinales,
}

impl PatternConcept {
    pub const ALL: [PatternConcept; 7] = [
        Self::Title,
        Self::ProcedureTitle,
        Self::Reference,
        Self::Date,
        Self::Considerant,
        Self::ArticlePremier,
        Self::DispositionsFinales,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ProcedureTitle => "procedure_title",
            Self::Reference => "reference",
            Self::Date => "date",
            Self::Considerant => "considerant",
            Self::ArticlePremier => "article_1",
            Self::DispositionsFinales => "dispositions_finales",
        }
    }
}

impl fmt::Display for PatternConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PatternConcept {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown pattern concept: {}", s))
    }
}

/// Ordered regexes for one concept with a length window on the capture.
///
/// The first pattern whose first capturing group, once trimmed, fits in
/// `min_len..=max_len` characters wins. Later patterns are not tried.
pub struct PatternCascade {
    concept: PatternConcept,
    patterns: Vec<&'static Regex>,
    min_len: usize,
    max_len: usize,
}

impl PatternCascade {
    /// Cascade for a regex-driven concept. `Date` has no cascade, see [`extract_date`].
    pub fn for_concept(concept: PatternConcept) -> Option<Self> {
        let (patterns, min_len, max_len): (Vec<&'static Regex>, usize, usize) = match concept {
            PatternConcept::Title => (
                vec![&*TITLE_LABELED, &*FIRST_LINE, &*TITLE_ENACTMENT, &*TITLE_CONCERNING],
                10,
                200,
            ),
            PatternConcept::ProcedureTitle => (
                vec![
                    &*PROCEDURE_TITLE_LABELED,
                    &*FIRST_LINE,
                    &*PROCEDURE_ACTION,
                    &*PROCEDURE_REQUEST,
                ],
                10,
                200,
            ),
            PatternConcept::Reference => (vec![&*REFERENCE_ENACTMENT, &*REFERENCE_NUMBER], 1, 40),
            PatternConcept::Considerant => (vec![&*CONSIDERANT], 50, 200),
            PatternConcept::ArticlePremier => (vec![&*ARTICLE_PREMIER], 50, 300),
            PatternConcept::DispositionsFinales => (vec![&*DISPOSITIONS_FINALES], 30, 200),
            PatternConcept::Date => return None,
        };

        Some(Self {
            concept,
            patterns,
            min_len,
            max_len,
        })
    }

    pub fn concept(&self) -> PatternConcept {
        self.concept
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn capture(&self, index: usize, re: &Regex, text: &str) -> Option<ExtractionMatch<String>> {
        let caps = re.captures(text)?;
        let group = caps.get(1)?;
        let value = group.as_str().trim();
        let length = value.chars().count();

        if length < self.min_len || length > self.max_len {
            trace!(
                "{} pattern #{} captured {} chars, outside {}..={}",
                self.concept, index, length, self.min_len, self.max_len
            );
            return None;
        }

        let full_match = caps.get(0)?;
        Some(
            ExtractionMatch::new(value.to_string(), index, full_match.as_str())
                .with_position(group.start(), group.end()),
        )
    }
}

impl FieldExtractor for PatternCascade {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let found = self
            .patterns
            .iter()
            .enumerate()
            .find_map(|(i, re)| self.capture(i, re, text));

        if let Some(m) = &found {
            debug!("Extracted {} with pattern #{}", self.concept, m.pattern_index);
        }
        found
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.patterns
            .iter()
            .enumerate()
            .filter_map(|(i, re)| self.capture(i, re, text))
            .collect()
    }
}

/// Seam between the binder and free-text extraction.
pub trait ConceptExtractor {
    /// Recover `concept` from `text`, or `None` when nothing fits.
    fn extract(&self, concept: PatternConcept, text: &str) -> Option<String>;
}

/// Default extractor backed by the regex cascades.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ConceptExtractor for PatternExtractor {
    fn extract(&self, concept: PatternConcept, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        match PatternCascade::for_concept(concept) {
            Some(cascade) => cascade.extract(text).map(|m| m.value),
            None => extract_date(text),
        }
    }
}

/// Recover `concept` from `text` with the default cascades.
pub fn extract(concept: PatternConcept, text: &str) -> Option<String> {
    PatternExtractor::new().extract(concept, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_labeled() {
        let text = "Objet : réorganisation des services déconcentrés de l'État\nArticle 1";
        assert_eq!(
            extract(PatternConcept::Title, text),
            Some("réorganisation des services déconcentrés de l'État".to_string())
        );
    }

    #[test]
    fn test_title_first_line() {
        let text = "Protection des données à caractère personnel\nLe Président de la République";
        assert_eq!(
            extract(PatternConcept::Title, text),
            Some("Protection des données à caractère personnel".to_string())
        );
    }

    #[test]
    fn test_title_first_match_wins() {
        let text = "Note de service numéro quarante deux\nObjet : horaires d'ouverture des guichets";
        let cascade = PatternCascade::for_concept(PatternConcept::Title).unwrap();
        let found = cascade.extract(text).unwrap();

        assert_eq!(found.pattern_index, 0);
        assert_eq!(found.value, "horaires d'ouverture des guichets");
        assert_eq!(cascade.extract_all(text).len(), 2);
    }

    #[test]
    fn test_title_too_short() {
        assert_eq!(extract(PatternConcept::Title, "Objet : court"), None);
    }

    #[test]
    fn test_considerant() {
        let text = "Considérant que la loi doit être appliquée de manière uniforme sur tout le territoire national, il est décidé ce qui suit.";
        let value = extract(PatternConcept::Considerant, text).unwrap();

        assert!(value.starts_with("la loi doit être appliquée"));
        assert!(value.ends_with("il est décidé ce qui suit"));
        assert!(value.chars().count() >= 50);
    }

    #[test]
    fn test_article_premier() {
        let text = "Article 1er : Le présent décret a pour objet de fixer les modalités d'application de la loi susvisée. Article 2 : ...";
        assert_eq!(
            extract(PatternConcept::ArticlePremier, text),
            Some("Le présent décret a pour objet de fixer les modalités d'application de la loi susvisée".to_string())
        );
    }

    #[test]
    fn test_dispositions_finales() {
        let text = "Dispositions finales : le présent arrêté sera publié au Journal officiel.";
        assert_eq!(
            extract(PatternConcept::DispositionsFinales, text),
            Some("le présent arrêté sera publié au Journal officiel".to_string())
        );
    }

    #[test]
    fn test_article_dernier() {
        let text = "Article 2 : Sont abrogées les dispositions contraires.\nArticle dernier : Le présent décret sera publié au Journal officiel de la République.";
        assert_eq!(
            extract(PatternConcept::DispositionsFinales, text),
            Some("Le présent décret sera publié au Journal officiel de la République".to_string())
        );

        let text = "ARTICLE FINAL Le ministre de l'intérieur est chargé de l'exécution du présent arrêté.";
        assert_eq!(
            extract(PatternConcept::DispositionsFinales, text),
            Some("Le ministre de l'intérieur est chargé de l'exécution du présent arrêté".to_string())
        );

        assert_eq!(extract(PatternConcept::DispositionsFinales, "Article final : abrogé."), None);
    }

    #[test]
    fn test_reference() {
        assert_eq!(
            extract(PatternConcept::Reference, "Arrêté ministériel n° 2023/117 du 4 mai 2023"),
            Some("2023/117".to_string())
        );
        assert_eq!(
            extract(PatternConcept::Reference, "Dossier N°4512 en cours"),
            Some("4512".to_string())
        );
    }

    #[test]
    fn test_procedure_title() {
        let text = "Pour obtenir un extrait, la démarche pour obtention d'un extrait de naissance est simple";
        assert_eq!(
            extract(PatternConcept::ProcedureTitle, text),
            Some("obtention d'un extrait de naissance est simple".to_string())
        );
    }

    #[test]
    fn test_date_concept() {
        assert_eq!(
            extract(PatternConcept::Date, "Journal officiel du 3 février 2021"),
            Some("2021-02-03".to_string())
        );
    }

    #[test]
    fn test_empty_text() {
        for concept in PatternConcept::ALL {
            assert_eq!(extract(concept, ""), None);
            assert_eq!(extract(concept, "   "), None);
        }
    }

    #[test]
    fn test_concept_keys_round_trip() {
        for concept in PatternConcept::ALL {
            assert_eq!(concept.key().parse::<PatternConcept>().unwrap(), concept);
        }
    }
}
