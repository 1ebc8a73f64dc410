use chronicle_cli::{Model, assemble, list, read_json};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn terms(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|t| t.to_string()).collect()
}

// ── normalize ────────────────────────────────────────────────────

#[test]
fn normalize_timeline_fills_defaults_and_formats_dates() {
    let input = json!({
        "identifier": "tl",
        "name": "Box 3",
        "documents": [{"id": "d1", "title": "Nota", "created_at": "2024-02-01"}],
    });
    let out = Model::Timeline.normalize(&input).unwrap();

    let doc = &out["documents"][0];
    assert_eq!(doc["created_at"], json!("2024-02-01T00:00:00+01:00"));
    assert_eq!(doc["publisher"], Value::Null);
    assert_eq!(doc["content_text"], json!([]));
    assert_eq!(out["beschrijving"], Value::Null);
}

#[test]
fn normalize_empty_mdto_builds_nested_defaults() {
    let out = Model::Mdto.normalize(&json!({})).unwrap();
    assert!(out["informatieobject"].is_object());
    assert_eq!(out["informatieobject"]["titel"], Value::Null);
    assert_eq!(out["informatieobject"]["relaties"], json!([]));
}

#[test]
fn normalize_rejects_wrong_shape() {
    assert!(Model::TimelineDocument.normalize(&json!([1, 2])).is_err());
}

// ── schema ───────────────────────────────────────────────────────

#[test]
fn schema_summary_lists_fields_in_order() {
    let summary = Model::Timeline.schema_summary();
    assert_eq!(summary.record, "Timeline");
    let names: Vec<&str> = summary.fields.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        ["identifier", "name", "documents", "beschrijving", "gegenereerd_op"]
    );
}

#[test]
fn schema_summary_shows_input_formats() {
    let summary = Model::TimelineDocument.schema_summary();
    let created = summary
        .fields
        .iter()
        .find(|f| f.name == "created_at")
        .unwrap();
    assert_eq!(created.input_formats, ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d"]);
}

// ── input ────────────────────────────────────────────────────────

#[test]
fn read_json_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.json");
    std::fs::write(&path, r#"{"name": "x"}"#).unwrap();
    assert_eq!(read_json(Some(path.as_path())).unwrap(), json!({"name": "x"}));
}

#[test]
fn read_json_reports_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(read_json(Some(path.as_path())).is_err());
    assert!(read_json(Some(dir.path().join("missing.json").as_path())).is_err());
}

// ── assemble / list ──────────────────────────────────────────────

#[test]
fn assemble_stores_timeline_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    let documents = json!([
        {"doc_identifier": "a", "title": "Nota", "created_at": "2024-02-01 09:30:00"},
        {"doc_identifier": "b", "title": "Brief"},
    ]);

    let published = assemble(dir.path(), &terms(&["", "Box 3"]), &documents).unwrap();
    assert_eq!(published.name, "Box 3");
    assert_eq!(published.documents_count, 2);

    let stored = list(dir.path(), 10).unwrap();
    assert_eq!(stored, vec![(published.identifier, "Box 3".to_string(), 2)]);
}

#[test]
fn assemble_requires_an_array() {
    let dir = tempfile::tempdir().unwrap();
    let err = assemble(dir.path(), &terms(&["x"]), &json!({"title": "x"})).unwrap_err();
    assert!(err.to_string().contains("array"));
}

#[test]
fn list_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    assert!(list(dir.path(), 10).unwrap().is_empty());
}
