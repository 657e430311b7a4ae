//! Template selection from a detected document type.

use serde::Serialize;
use tracing::debug;

use crate::models::template::FormTemplate;

/// Which step of the selection found the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Template type equals the detected type.
    Exact,
    /// One of the two contains the other, ignoring case.
    Substring,
    /// First template of the view.
    Fallback,
}

/// Selected template and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatch<'a> {
    pub template: &'a FormTemplate,
    pub strategy: MatchStrategy,
}

/// Select a template for `detected_type` from a deduplicated view.
///
/// An exact type match wins, then a case-insensitive substring match in
/// either direction, then the first template. Returns `None` only for an
/// empty view. A blank detected type counts as no detected type.
pub fn select_template<'a>(
    templates: &[&'a FormTemplate],
    detected_type: Option<&str>,
) -> Option<TemplateMatch<'a>> {
    let first = *templates.first()?;
    let detected = detected_type.map(str::trim).filter(|t| !t.is_empty());

    let found = detected.and_then(|detected| {
        if let Some(t) = templates.iter().find(|t| t.template_type == detected) {
            return Some(TemplateMatch {
                template: *t,
                strategy: MatchStrategy::Exact,
            });
        }

        let wanted = detected.to_lowercase();
        templates
            .iter()
            .find(|t| {
                let ty = t.template_type.to_lowercase();
                !ty.is_empty() && (ty.contains(&wanted) || wanted.contains(&ty))
            })
            .map(|t| TemplateMatch {
                template: *t,
                strategy: MatchStrategy::Substring,
            })
    });

    let selected = found.unwrap_or(TemplateMatch {
        template: first,
        strategy: MatchStrategy::Fallback,
    });

    debug!(
        "Selected template {} ({:?}) for type {:?}",
        selected.template.id, selected.strategy, detected
    );

    Some(selected)
}

/// Find a template by id, then by name ignoring case.
pub fn find_template<'a>(templates: &[&'a FormTemplate], key: &str) -> Option<&'a FormTemplate> {
    let wanted = key.trim().to_lowercase();

    templates
        .iter()
        .find(|t| t.id == key)
        .or_else(|| templates.iter().find(|t| t.name.to_lowercase() == wanted))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::{FieldDefinition, FieldType};

    fn template(id: &str, ty: &str) -> FormTemplate {
        FormTemplate::new(id, id, ty, "").with_field(FieldDefinition::new("titre", "Titre", FieldType::Text))
    }

    #[test]
    fn test_exact_before_substring() {
        let a = template("decret-exec", "Décret exécutif");
        let b = template("decret", "Décret");
        let view = vec![&a, &b];

        let m = select_template(&view, Some("Décret")).unwrap();
        assert_eq!(m.template.id, "decret");
        assert_eq!(m.strategy, MatchStrategy::Exact);
    }

    #[test]
    fn test_substring_either_direction() {
        let a = template("loi", "Loi");
        let b = template("arrete", "Arrêté interministériel");
        let view = vec![&a, &b];

        let m = select_template(&view, Some("ARRÊTÉ")).unwrap();
        assert_eq!(m.template.id, "arrete");
        assert_eq!(m.strategy, MatchStrategy::Substring);

        let m = select_template(&view, Some("Loi organique")).unwrap();
        assert_eq!(m.template.id, "loi");
        assert_eq!(m.strategy, MatchStrategy::Substring);
    }

    #[test]
    fn test_fallback_to_first() {
        let a = template("loi", "Loi");
        let b = template("decret", "Décret");
        let view = vec![&a, &b];

        for detected in [None, Some(""), Some("Circulaire")] {
            let m = select_template(&view, detected).unwrap();
            assert_eq!(m.template.id, "loi");
            assert_eq!(m.strategy, MatchStrategy::Fallback);
        }
    }

    #[test]
    fn test_untyped_template_not_substring_match() {
        let a = template("sans-type", "");
        let b = template("loi", "Loi");
        let view = vec![&a, &b];

        let m = select_template(&view, Some("loi")).unwrap();
        assert_eq!(m.template.id, "loi");
        assert_eq!(m.strategy, MatchStrategy::Substring);
    }

    #[test]
    fn test_empty_view() {
        assert!(select_template(&[], Some("Loi")).is_none());
        assert!(select_template(&[], None).is_none());
    }

    #[test]
    fn test_find_template() {
        let a = template("builtin-loi", "Loi");
        let b = FormTemplate::new("x1", "Procédure Passeport", "Procédure Administrative", "");
        let view = vec![&a, &b];

        assert_eq!(find_template(&view, "builtin-loi").map(|t| t.id.as_str()), Some("builtin-loi"));
        assert_eq!(find_template(&view, "procédure passeport").map(|t| t.id.as_str()), Some("x1"));
        assert!(find_template(&view, "inconnu").is_none());
    }
}
