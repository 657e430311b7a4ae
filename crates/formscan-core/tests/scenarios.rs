//! End-to-end scenarios through the public API.

use formscan_core::extraction::rules::ConceptExtractor;
use formscan_core::templates::deduplicate;
use formscan_core::{
    AuxiliaryAttribute, BoundValue, CategoryClassifier, Concept, DocumentDomain, FieldBinder,
    FieldDefinition, FieldType, FillOutcome, FormFiller, FormTemplate, PatternConcept,
    RawExtractionRecord, SynonymResolver, TemplateLibrary, builtin_templates, select_template,
    summarize,
};
use pretty_assertions::assert_eq;
use std::cell::Cell;

fn legal_template(fields: &[&str]) -> FormTemplate {
    fields.iter().fold(
        FormTemplate::new("decret-tpl", "Décret", "Décret", "Textes Réglementaires"),
        |t, name| t.with_field(FieldDefinition::new(*name, *name, FieldType::Text)),
    )
}

#[test]
fn decree_record_binds_declared_fields() {
    let json = r#"{
        "documentType": "legal",
        "formData": {
            "titre": "Décret relatif à la protection des données",
            "date_journal": "2024-01-10"
        }
    }"#;
    let record = RawExtractionRecord::from_json(json).unwrap();
    let library = TemplateLibrary::from_templates(vec![legal_template(&["titre", "date_journal", "authority"])]).unwrap();

    let outcome = FormFiller::new(DocumentDomain::Legal).fill(record, &library, None);
    let output = outcome.into_output().unwrap();

    let fields = serde_json::to_value(&output.bound_fields).unwrap();
    assert_eq!(fields["titre"], "Décret relatif à la protection des données");
    assert_eq!(fields["date_journal"], "2024-01-10");
    assert_eq!(fields["authority"], "");
    assert_eq!(output.filled_count, 2);
    assert_eq!(output.total_count, 3);
}

#[test]
fn considerant_is_recovered_from_content() {
    let record = RawExtractionRecord::new(DocumentDomain::Legal).with_field(
        "content",
        "Considérant que la loi doit être appliquée de manière uniforme sur tout le territoire national, il est décidé ce qui suit.",
    );
    let canonical = SynonymResolver::new().resolve(record, DocumentDomain::Legal);
    let template = legal_template(&["considerants"]);

    let bound = FieldBinder::new().bind(&template, &canonical);
    let value = bound.text("considerants").unwrap();

    assert_eq!(value, value.trim());
    assert!(value.chars().count() >= 50);
    assert!(value.starts_with("la loi doit être appliquée"));
}

#[test]
fn empty_library_selects_nothing() {
    let library = TemplateLibrary::new();
    let view = library.view(DocumentDomain::Legal);

    assert!(select_template(&view, Some("Loi")).is_none());

    let record = RawExtractionRecord::new(DocumentDomain::Legal).with_field("titre", "Loi");
    let outcome = FormFiller::new(DocumentDomain::Legal).fill(record, &library, None);
    assert!(matches!(outcome, FillOutcome::NoTemplate { .. }));
}

#[test]
fn deduplication_is_idempotent() {
    let mut templates = builtin_templates();
    templates.extend(builtin_templates().into_iter().map(|mut t| {
        t.id = format!("copie-{}", t.id);
        t.name = t.name.to_uppercase();
        t
    }));

    let once: Vec<&FormTemplate> = deduplicate(&templates);
    let twice = deduplicate(once.iter().copied());

    assert_eq!(once.len(), 4);
    assert_eq!(once, twice);
    assert!(once.iter().all(|t| !t.id.starts_with("copie-")));
}

#[test]
fn resolver_takes_first_alias_in_priority_order() {
    let record = RawExtractionRecord::new(DocumentDomain::Legal)
        .with_field("libelle", "dernier")
        .with_field("denomination", "")
        .with_field("nom", "troisième")
        .with_field("name", "deuxième");
    let canonical = SynonymResolver::new().resolve(record, DocumentDomain::Legal);

    assert_eq!(canonical.get(Concept::Title), Some("deuxième"));
    assert!(canonical.len() <= Concept::ALL.len());
}

struct CountingExtractor {
    calls: Cell<usize>,
}

impl ConceptExtractor for CountingExtractor {
    fn extract(&self, _concept: PatternConcept, _text: &str) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        None
    }
}

#[test]
fn extractor_never_overrides_present_concepts() {
    let record = RawExtractionRecord::new(DocumentDomain::Legal)
        .with_field("titre", "Loi relative à la commande publique")
        .with_field("reference", "23-12")
        .with_field("date", "2023-08-05")
        .with_field("content", "Objet : autre chose\nLoi n° 99-01 du 1er janvier 1999");
    let canonical = SynonymResolver::new().resolve(record, DocumentDomain::Legal);
    let template = legal_template(&["titre", "numero_texte", "date_journal"]);

    let binder = FieldBinder::new().with_extractor(CountingExtractor { calls: Cell::new(0) });
    let bound = binder.bind(&template, &canonical);

    assert_eq!(binder.extractor().calls.get(), 0);
    assert_eq!(bound.text("numero_texte"), Some("23-12"));
    assert_eq!(bound.text("date_journal"), Some("2023-08-05"));
}

#[test]
fn binder_covers_every_declared_field() {
    for template in builtin_templates() {
        let domain = if DocumentDomain::Legal.accepts(&template) {
            DocumentDomain::Legal
        } else {
            DocumentDomain::Procedure
        };
        let canonical = SynonymResolver::new().resolve(RawExtractionRecord::new(domain), domain);
        let bound = FieldBinder::new().bind(&template, &canonical);

        let names: Vec<&str> = bound.fields().map(|(name, _)| name).collect();
        let declared: Vec<&str> = template.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, declared, "template {}", template.id);
        assert_eq!(summarize(&bound).total_count, declared.len());
    }
}

#[test]
fn classifier_is_deterministic() {
    let classifier = CategoryClassifier::new(DocumentDomain::Procedure);
    let text = "Demande de permis de construire déposée à la commune par une société";

    let first = classifier.classify(text);
    for _ in 0..10 {
        assert_eq!(classifier.classify(text), first);
    }

    assert_eq!(first.category.as_deref(), Some("Commerce"));
    assert_eq!(first.administration.as_deref(), Some("Ministère de l'Intérieur"));
    assert_eq!(first.audience, "entreprise");
}

#[test]
fn procedure_record_with_builtin_library() {
    let json = r#"{
        "documentType": "procedure",
        "formData": {
            "procedureName": "Délivrance du passeport biométrique",
            "content": "Procédure pour les citoyens. Pièces : acte de naissance; photo d'identité",
            "documents_requis": "Acte de naissance; Photo d'identité; Timbre fiscal",
            "en_ligne": "oui",
            "delai": 15
        }
    }"#;
    let record = RawExtractionRecord::from_json(json).unwrap();
    let library = TemplateLibrary::from_templates(builtin_templates()).unwrap();

    let outcome = FormFiller::new(DocumentDomain::Procedure).fill(record, &library, None);
    let output = outcome.output().unwrap();
    let bound = &output.bound_fields;

    assert_eq!(output.template_id, "builtin-procedure");
    assert_eq!(bound.text("procedureName"), Some("Délivrance du passeport biométrique"));
    assert_eq!(bound.text("procedureType"), Some("Demande"));
    assert_eq!(bound.text("procedureCategory"), Some("État Civil"));
    assert_eq!(bound.text("targetCategory"), Some("citoyen"));
    assert_eq!(bound.field("en_ligne"), Some(&BoundValue::Flag(true)));
    assert_eq!(bound.field("documents_requis").and_then(BoundValue::as_list).map(<[String]>::len), Some(3));
    assert_eq!(
        bound.auxiliary(AuxiliaryAttribute::SectorAdministration),
        Some("Ministère du Commerce")
    );
    assert_eq!(output.detected_type.as_deref(), Some("Procédure Administrative"));

    let fields = serde_json::to_value(bound).unwrap();
    assert_eq!(fields["sectorAdministration"], "Ministère du Commerce");
    assert_eq!(fields["institution"], "");
    assert_eq!((output.filled_count, output.total_count), (8, 9));
}

#[test]
fn output_uses_boundary_field_names() {
    let record = RawExtractionRecord::new(DocumentDomain::Legal).with_field("titre", "Loi n° 08-09");
    let library = TemplateLibrary::from_templates(vec![legal_template(&["titre"])]).unwrap();

    let outcome = FormFiller::new(DocumentDomain::Legal).fill(record, &library, None);
    let json = serde_json::to_value(outcome.output().unwrap()).unwrap();

    assert_eq!(json["templateId"], "decret-tpl");
    assert_eq!(json["boundFields"]["titre"], "Loi n° 08-09");
    assert_eq!(json["boundFields"]["selectedType"], "Loi");
    assert_eq!(json["detectedAudience"], "citoyen");
    assert_eq!(json["filledCount"], 1);
    assert_eq!(json["totalCount"], 1);
}
