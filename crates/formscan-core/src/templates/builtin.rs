//! Built-in template library embedded in the binary.

use tracing::warn;

use crate::models::template::FormTemplate;

/// Embedded library (legal: Loi, Décret, Arrêté; procedure: Procédure Administrative).
pub static BUILTIN_TEMPLATES_JSON: &str = include_str!("../../data/builtin_templates.json");

/// Parse the embedded library.
pub fn builtin_templates() -> Vec<FormTemplate> {
    match serde_json::from_str(BUILTIN_TEMPLATES_JSON) {
        Ok(templates) => templates,
        Err(e) => {
            warn!("Embedded template library is invalid: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::DocumentDomain;
    use crate::templates::TemplateLibrary;

    #[test]
    fn test_builtin_templates_are_valid() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 4);

        for template in &templates {
            assert!(template.validate().is_empty(), "{:?}", template.validate());
        }
    }

    #[test]
    fn test_builtin_domains() {
        let library = TemplateLibrary::from_templates(builtin_templates()).unwrap();

        let legal: Vec<&str> = library
            .view(DocumentDomain::Legal)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(legal, vec!["Loi", "Décret", "Arrêté"]);

        let procedure = library.view(DocumentDomain::Procedure);
        assert_eq!(procedure.len(), 1);
        assert_eq!(procedure[0].id, "builtin-procedure");
    }
}
