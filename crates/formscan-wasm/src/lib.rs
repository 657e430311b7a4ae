//! WASM bindings for OCR form filling.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Records and template libraries cross the boundary as JSON strings; results
//! come back as plain JS objects.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

use formscan_core::notify::InputMode;
use formscan_core::{
    extract, BoundFormData, BoundValue, CategoryClassifier, Classification, CompletionHandler,
    CompletionSummary, DocumentDomain, ExtractionOutput, FormFiller, FormTemplate, ModeSwitch,
    PatternConcept, RawExtractionRecord, ReviewTransition, TemplateLibrary,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// Plain objects rather than JS `Map`s for bound fields.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn parse_domain(domain: &str) -> Result<DocumentDomain, JsValue> {
    DocumentDomain::from_str(domain).map_err(js_error)
}

fn load_library(templates_json: Option<String>) -> Result<TemplateLibrary, JsValue> {
    match templates_json {
        Some(json) => TemplateLibrary::from_json(&json).map_err(js_error),
        None => Ok(formscan_core::builtin_templates().into_iter().collect()),
    }
}

/// Reports pipeline outcomes on the browser console.
#[derive(Debug, Clone, Copy, Default)]
struct ConsoleHandler;

impl CompletionHandler for ConsoleHandler {
    fn on_complete(&self, _output: &ExtractionOutput, summary: &CompletionSummary) {
        console::log_1(&JsValue::from_str(&summary.message()));
    }

    fn on_no_template(&self, _classification: &Classification) {
        console::warn_1(&JsValue::from_str("Aucun modèle disponible"));
    }

    fn on_domain_mismatch(&self, expected: DocumentDomain, received: DocumentDomain) {
        console::warn_1(&JsValue::from_str(&format!(
            "Type de document incompatible : attendu {}, reçu {}",
            expected, received
        )));
    }
}

/// Fill a form from an OCR record.
///
/// `templates_json` defaults to the built-in library. Returns the fill
/// outcome, tagged by its `status` field.
#[wasm_bindgen]
pub fn fill_form(
    record_json: &str,
    domain: &str,
    templates_json: Option<String>,
    template: Option<String>,
) -> Result<JsValue, JsValue> {
    let record = RawExtractionRecord::from_json(record_json).map_err(js_error)?;
    let library = load_library(templates_json)?;

    let outcome = FormFiller::new(parse_domain(domain)?)
        .with_handler(ConsoleHandler)
        .fill(record, &library, template.as_deref());

    to_js(&outcome)
}

/// Template a detected type selects within a domain, or `null`.
#[wasm_bindgen]
pub fn select_template(
    domain: &str,
    detected_type: Option<String>,
    templates_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let library = load_library(templates_json)?;
    let view = library.view(parse_domain(domain)?);

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Selected<'a> {
        template_id: &'a str,
        name: &'a str,
        strategy: formscan_core::MatchStrategy,
    }

    match formscan_core::select_template(&view, detected_type.as_deref()) {
        Some(selected) => to_js(&Selected {
            template_id: &selected.template.id,
            name: &selected.template.name,
            strategy: selected.strategy,
        }),
        None => Ok(JsValue::NULL),
    }
}

/// Classify a text on every axis.
#[wasm_bindgen]
pub fn classify_text(text: &str, domain: &str) -> Result<JsValue, JsValue> {
    let classification = CategoryClassifier::new(parse_domain(domain)?).classify(text);
    to_js(&classification)
}

/// Run one pattern extractor (`title`, `reference`, `date`, `considerant`...).
#[wasm_bindgen]
pub fn extract_pattern(concept: &str, text: &str) -> Result<Option<String>, JsValue> {
    let concept = PatternConcept::from_str(concept).map_err(js_error)?;
    Ok(extract(concept, text))
}

/// Filled and total counts of edited bound fields, against the template's
/// declared fields. Keys the template does not declare are ignored.
#[wasm_bindgen]
pub fn summarize(bound_fields: JsValue, template_json: &str) -> Result<JsValue, JsValue> {
    let values: HashMap<String, BoundValue> =
        serde_wasm_bindgen::from_value(bound_fields).map_err(js_error)?;
    let template: FormTemplate = serde_json::from_str(template_json).map_err(js_error)?;

    let bound: BoundFormData = template
        .fields
        .iter()
        .map(|field| {
            let value = values.get(&field.name).cloned().unwrap_or_else(BoundValue::empty);
            (field.name.clone(), value)
        })
        .collect();

    let summary = formscan_core::summarize(&bound);
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SummaryJs {
        filled_count: usize,
        total_count: usize,
        message: String,
    }

    to_js(&SummaryJs {
        filled_count: summary.filled_count,
        total_count: summary.total_count,
        message: summary.message(),
    })
}

/// Completion message for a filled/total count.
#[wasm_bindgen]
pub fn completion_message(filled_count: usize, total_count: usize) -> String {
    CompletionSummary {
        filled_count,
        total_count,
    }
    .message()
}

/// Form filler class for browser use.
///
/// Holds the template library and the scanning/reviewing mode. The page
/// schedules the switch itself, `reviewDelayMs` after a successful fill.
#[wasm_bindgen]
pub struct FormFillerJs {
    domain: DocumentDomain,
    library: TemplateLibrary,
    switch: ModeSwitch,
    transition: ReviewTransition,
}

#[wasm_bindgen]
impl FormFillerJs {
    /// Create a filler for a domain, with the built-in templates.
    #[wasm_bindgen(constructor)]
    pub fn new(domain: &str) -> Result<FormFillerJs, JsValue> {
        Ok(Self {
            domain: parse_domain(domain)?,
            library: load_library(None)?,
            switch: ModeSwitch::new(),
            transition: ReviewTransition::default(),
        })
    }

    /// Replace the template library.
    #[wasm_bindgen]
    pub fn load_templates(&mut self, templates_json: &str) -> Result<usize, JsValue> {
        self.library = TemplateLibrary::from_json(templates_json).map_err(js_error)?;
        Ok(self.library.len())
    }

    /// Templates available to this filler, deduplicated.
    #[wasm_bindgen]
    pub fn templates(&self) -> Result<JsValue, JsValue> {
        to_js(&self.library.view(self.domain))
    }

    /// Delay before the page should call `completeReview`.
    #[wasm_bindgen(setter = reviewDelayMs)]
    pub fn set_review_delay_ms(&mut self, delay_ms: u32) {
        self.transition = ReviewTransition::new(std::time::Duration::from_millis(delay_ms.into()));
    }

    #[wasm_bindgen(getter = reviewDelayMs)]
    pub fn review_delay_ms(&self) -> u32 {
        self.transition.delay.as_millis().try_into().unwrap_or(u32::MAX)
    }

    /// Fill a form from an OCR record. Resets the mode to scanning.
    #[wasm_bindgen]
    pub fn fill(&self, record_json: &str, template: Option<String>) -> Result<JsValue, JsValue> {
        let record = RawExtractionRecord::from_json(record_json).map_err(js_error)?;
        self.switch.reset();

        let outcome = FormFiller::new(self.domain)
            .with_handler(ConsoleHandler)
            .fill(record, &self.library, template.as_deref());

        to_js(&outcome)
    }

    /// Switch to reviewing. Returns `true` only for the call that switched.
    #[wasm_bindgen]
    pub fn complete_review(&self) -> bool {
        self.transition.fire(&self.switch)
    }

    /// Current mode, `"scanning"` or `"reviewing"`.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        match self.switch.mode() {
            InputMode::Scanning => "scanning".to_string(),
            InputMode::Reviewing => "reviewing".to_string(),
        }
    }

    #[wasm_bindgen]
    pub fn reset(&self) {
        self.switch.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const RECORD: &str = r#"{
        "documentType": "legal",
        "formData": {"titre": "Arrêté du 2 mai 2022 portant organisation des services"}
    }"#;

    const RECORD_PROCEDURE: &str = r#"{
        "documentType": "procedure",
        "formData": {"procedureName": "Inscription au registre du commerce"}
    }"#;

    fn to_json(value: JsValue) -> serde_json::Value {
        serde_wasm_bindgen::from_value(value).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_fill_form_with_builtins() {
        let outcome = to_json(fill_form(RECORD, "legal", None, None).unwrap());

        assert_eq!(outcome["status"], "filled");
        assert_eq!(outcome["templateId"], "builtin-arrete");
        assert_eq!(outcome["boundFields"]["selectedType"], "Arrêté");
    }

    #[wasm_bindgen_test]
    fn test_fill_form_domain_mismatch() {
        let outcome = to_json(fill_form(RECORD, "procedure", None, None).unwrap());

        assert_eq!(outcome["status"], "domainMismatch");
        assert_eq!(outcome["expected"], "procedure");
        assert_eq!(outcome["received"], "legal");
    }

    #[wasm_bindgen_test]
    fn test_select_template_empty_library() {
        assert!(select_template("legal", Some("Loi".into()), Some("[]".into())).unwrap().is_null());
    }

    #[wasm_bindgen_test]
    fn test_extract_pattern() {
        let date = extract_pattern("date", "fait à Alger le 1er mars 2023").unwrap();
        assert_eq!(date.as_deref(), Some("2023-03-01"));
        assert!(extract_pattern("montant", "").is_err());
    }

    #[wasm_bindgen_test]
    fn test_summarize_ignores_undeclared_keys() {
        let template = r#"{"id": "t", "name": "T", "type": "Loi", "fields": [
            {"name": "titre", "type": "text"},
            {"name": "en_ligne", "type": "checkbox"},
            {"name": "pieces", "type": "dynamic-list"}
        ]}"#;
        let bound = to_js(&serde_json::json!({
            "titre": "Loi n° 08-09",
            "en_ligne": false,
            "pieces": ["Acte"],
            "selectedType": "Loi"
        }))
        .unwrap();

        let summary = to_json(summarize(bound, template).unwrap());
        assert_eq!(summary["filledCount"], 2);
        assert_eq!(summary["totalCount"], 3);
    }

    #[wasm_bindgen_test]
    fn test_completion_message() {
        assert_eq!(completion_message(1, 3), "1 champ a été rempli automatiquement.");
    }

    #[wasm_bindgen_test]
    fn test_filler_mode_switch() {
        let filler = FormFillerJs::new("legal").unwrap();
        assert_eq!(filler.mode(), "scanning");

        filler.fill(RECORD, None).unwrap();
        assert!(filler.complete_review());
        assert!(!filler.complete_review());
        assert_eq!(filler.mode(), "reviewing");

        filler.reset();
        assert_eq!(filler.mode(), "scanning");
    }

    #[wasm_bindgen_test]
    fn test_filler_review_delay() {
        let mut filler = FormFillerJs::new("procedure").unwrap();
        filler.set_review_delay_ms(250);
        assert_eq!(filler.review_delay_ms(), 250);

        filler.set_review_delay_ms(0);
        filler.fill(RECORD_PROCEDURE, None).unwrap();
        assert!(filler.complete_review());
        assert_eq!(filler.mode(), "reviewing");
    }
}
