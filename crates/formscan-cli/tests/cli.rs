use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DECREE_RECORD: &str = r#"{
    "documentType": "legal",
    "formData": {
        "titre": "Décret exécutif n° 24-10 relatif à la protection des données",
        "date_journal": "2024-01-10"
    }
}"#;

const PROCEDURE_RECORD: &str = r#"{
    "documentType": "procedure",
    "formData": {
        "procedureName": "Inscription au registre du commerce",
        "content": "Démarche réservée à toute société commerciale"
    }
}"#;

/// Temp dir with a config that switches to review mode immediately.
fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"review": {"delay_ms": 0}}"#).unwrap();
    (dir, config)
}

fn formscan(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("formscan").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn fill_prints_json_and_summary() {
    let (dir, config) = workspace();
    let record = dir.path().join("decret.json");
    fs::write(&record, DECREE_RECORD).unwrap();

    formscan(&config)
        .arg("fill")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""templateId": "builtin-decret""#))
        .stdout(predicate::str::contains(r#""selectedType": "Décret""#))
        .stderr(predicate::str::contains("remplis automatiquement"));
}

#[test]
fn fill_writes_text_output_file() {
    let (dir, config) = workspace();
    let record = dir.path().join("procedure.json");
    let output = dir.path().join("out.txt");
    fs::write(&record, PROCEDURE_RECORD).unwrap();

    formscan(&config)
        .args(["fill", "--no-review", "-f", "text", "-o"])
        .arg(&output)
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Template: builtin-procedure"));
    assert!(text.contains("Audience: entreprise"));
    assert!(text.contains("Filled:"));
}

#[test]
fn fill_reports_domain_mismatch_without_failing() {
    let (dir, config) = workspace();
    let record = dir.path().join("decret.json");
    fs::write(&record, DECREE_RECORD).unwrap();

    formscan(&config)
        .args(["fill", "--domain", "procedure"])
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Incompatible document type"));
}

#[test]
fn fill_missing_input_fails() {
    let (dir, config) = workspace();

    formscan(&config)
        .arg("fill")
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn fill_with_empty_library_reports_no_template() {
    let (dir, config) = workspace();
    fs::write(
        &config,
        r#"{"review": {"delay_ms": 0}, "templates": {"include_builtin": false}}"#,
    )
    .unwrap();
    let record = dir.path().join("decret.json");
    fs::write(&record, DECREE_RECORD).unwrap();

    formscan(&config)
        .arg("fill")
        .arg(&record)
        .assert()
        .success()
        .stderr(predicate::str::contains("No legal template available"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let (dir, config) = workspace();
    let records = dir.path().join("records");
    let out = dir.path().join("out");
    fs::create_dir_all(&records).unwrap();
    fs::write(records.join("decret.json"), DECREE_RECORD).unwrap();
    fs::write(records.join("procedure.json"), PROCEDURE_RECORD).unwrap();
    fs::write(records.join("broken.json"), "{ not json").unwrap();

    let pattern = format!("{}/*.json", records.display());
    formscan(&config)
        .args(["batch", &pattern, "--summary", "--continue-on-error", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 filled, 0 skipped, 1 failed"));

    assert!(out.join("decret.json").exists());
    assert!(out.join("procedure.json").exists());
    assert!(!out.join("broken.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("file,status,template,filled,total,processing_time_ms,error"));
    assert!(summary.contains("decret.json,filled,builtin-decret"));
    assert!(summary.contains("broken.json,error"));
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let (dir, config) = workspace();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    let pattern = format!("{}/*.json", dir.path().display());
    formscan(&config)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn templates_list_shows_domain_view() {
    let (_dir, config) = workspace();

    formscan(&config)
        .args(["templates", "list", "--domain", "legal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("builtin-loi"))
        .stdout(predicate::str::contains("builtin-arrete"))
        .stdout(predicate::str::contains("builtin-procedure").not());
}

#[test]
fn templates_match_uses_substring() {
    let (_dir, config) = workspace();

    formscan(&config)
        .args(["templates", "match", "décret exécutif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("builtin-decret"))
        .stdout(predicate::str::contains("Substring"));
}

#[test]
fn templates_from_library_file() {
    let (dir, config) = workspace();
    let library = dir.path().join("library.json");
    fs::write(
        &library,
        r#"[{"id": "ordonnance-tpl", "name": "Ordonnance", "type": "Ordonnance",
             "fields": [{"name": "titre", "label": "Titre", "type": "text"}]}]"#,
    )
    .unwrap();

    formscan(&config)
        .args(["templates", "show", "ordonnance-tpl", "--templates"])
        .arg(&library)
        .assert()
        .success()
        .stdout(predicate::str::contains("Type: Ordonnance"))
        .stdout(predicate::str::contains("titre"));
}

#[test]
fn classify_prints_json() {
    let (dir, config) = workspace();
    let text = dir.path().join("texte.txt");
    fs::write(
        &text,
        "Arrêté du 12 mars 2023 fixant les conditions d'exercice du commerce ambulant.",
    )
    .unwrap();

    formscan(&config)
        .args(["classify", "--json", "--patterns"])
        .arg(&text)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""documentType": "Arrêté""#))
        .stdout(predicate::str::contains(r#""category": "Commerce""#))
        .stdout(predicate::str::contains(r#""date": "2023-03-12""#));
}

#[test]
fn config_set_and_get() {
    let (dir, _) = workspace();
    let config = dir.path().join("nested").join("config.json");

    formscan(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    formscan(&config)
        .args(["config", "set", "review.delay_ms", "100"])
        .assert()
        .success();

    formscan(&config)
        .args(["config", "get", "review.delay_ms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100"));

    formscan(&config)
        .args(["config", "set", "review.unknown", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn fill_summary_lists_empty_fields() {
    let (dir, config) = workspace();
    let record = dir.path().join("decret.json");
    fs::write(&record, DECREE_RECORD).unwrap();

    formscan(&config)
        .args(["fill", "--summary", "-f", "csv"])
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("template_id,titre"))
        .stderr(predicate::str::contains("Left empty:"))
        .stderr(predicate::str::contains("numero_texte"));
}
