use chrono::{DateTime, FixedOffset};
use chronicle_timeline::{
    MemoryIndex, Summarizer, Timeline, TimelineAssembler, TimelineError, TimelineRepository,
    TimelineResult, UNKNOWN_DOCUMENT_TITLE, UNKNOWN_TIMELINE_NAME, content_identifier,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::cell::RefCell;

fn fixed_now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").unwrap()
}

fn assembler() -> TimelineAssembler {
    TimelineAssembler::new().with_clock(fixed_now)
}

fn terms(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|t| t.to_string()).collect()
}

fn processed(title: &str, created_at: &str) -> Value {
    json!({
        "content_text": ["deel een", "deel twee"],
        "title": title,
        "doc_identifier": content_identifier(title),
        "created_at": created_at,
        "publisher": "Tweede Kamer",
        "publisher_link": format!("https://example.org/{title}"),
        "informatieobject": {"titel": title},
    })
}

/// Records calls and answers with canned text.
#[derive(Default)]
struct CannedSummarizer {
    documents: RefCell<Vec<String>>,
}

impl Summarizer for CannedSummarizer {
    fn summarize_document(&self, document: &Value, timeline_name: &str) -> TimelineResult<String> {
        let title = document["title"].as_str().unwrap_or_default().to_string();
        self.documents.borrow_mut().push(title.clone());
        Ok(format!("{timeline_name}: {title}"))
    }

    fn describe(&self, timeline_name: &str, summaries: &[&str]) -> TimelineResult<String> {
        Ok(format!("{timeline_name} ({} samenvattingen)", summaries.len()))
    }
}

// ── Normalisation ────────────────────────────────────────────────

#[test]
fn processed_document_keys_are_normalised() {
    let tree = TimelineAssembler::normalize_processed(&processed("Nota", "2024-02-01 00:00:00"));
    assert_eq!(tree["id"], json!(content_identifier("Nota")));
    assert!(tree.get("doc_identifier").is_none());
    assert_eq!(tree["summary"], Value::Null);
}

#[test]
fn missing_identifier_falls_back_to_title_hash() {
    let tree = TimelineAssembler::normalize_processed(&json!({"title": "Nota"}));
    assert_eq!(tree["id"], json!(content_identifier("Nota")));
}

#[test]
fn missing_title_falls_back_to_publisher_link() {
    let tree = TimelineAssembler::normalize_processed(&json!({"publisher_link": "https://x"}));
    assert_eq!(tree["id"], json!(content_identifier("https://x")));
    assert_eq!(tree["title"], json!(UNKNOWN_DOCUMENT_TITLE));
    assert_eq!(tree["content_text"], json!([]));
    assert_eq!(tree["informatieobject"], json!({}));
}

#[test]
fn document_accepts_both_shapes() {
    let from_processed = TimelineAssembler::document(&processed("Nota", "2024-02-01")).unwrap();
    assert_eq!(from_processed.id, content_identifier("Nota"));
    assert_eq!(from_processed.content_text.len(), 2);

    let stored = json!({"id": "x", "title": "Opgeslagen", "created_at": "2024-02-01"});
    assert_eq!(TimelineAssembler::document(&stored).unwrap().id, "x");
}

// ── Building ─────────────────────────────────────────────────────

#[test]
fn build_orders_documents_by_date() {
    let docs = vec![
        processed("later", "2024-03-01 10:00:00"),
        json!({"title": "zonder datum"}),
        processed("eerder", "2024-01-15"),
    ];
    let timeline = assembler().build(&terms(&["  Box 3 ", "Sparen"]), &docs).unwrap();

    assert_eq!(timeline.name, "Box 3");
    assert_eq!(timeline.identifier, TimelineAssembler::timeline_identifier("Box 3"));
    let titles: Vec<&str> = timeline.documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, ["zonder datum", "eerder", "later"]);
}

#[test]
fn build_without_terms_uses_placeholder_name() {
    let timeline = assembler().build(&[], &[processed("a", "2024-01-01")]).unwrap();
    assert_eq!(timeline.name, UNKNOWN_TIMELINE_NAME);
}

#[test]
fn build_without_documents_fails() {
    let err = assembler().build(&terms(&["x"]), &[]).unwrap_err();
    assert!(matches!(err, TimelineError::DocumentsNotFound));
}

#[test]
fn build_with_bad_date_reports_codec_error() {
    let err = assembler()
        .build(&terms(&["x"]), &[processed("a", "morgen")])
        .unwrap_err();
    assert!(matches!(err, TimelineError::Codec(_)));
}

#[test]
fn publish_stores_the_timeline() {
    let mut repo = TimelineRepository::new(MemoryIndex::new());
    let published = assembler()
        .publish(&mut repo, &terms(&["Box 3"]), &[processed("a", "2024-01-01")])
        .unwrap();
    assert_eq!(published.name, "Box 3");
    assert_eq!(published.documents_count, 1);
    assert!(repo.get(&published.identifier).unwrap().is_some());
}

// ── Summaries ────────────────────────────────────────────────────

#[test]
fn attach_summary_stamps_generation_time() {
    let mut timeline = assembler().build(&terms(&["t"]), &[processed("a", "2024-01-01")]).unwrap();
    let id = timeline.documents[0].id.clone();
    assembler().attach_summary(&mut timeline, &id, "kort".into()).unwrap();
    assert_eq!(timeline.documents[0].summary.as_deref(), Some("kort"));
    assert_eq!(timeline.gegenereerd_op, Some(fixed_now()));
}

#[test]
fn attach_summary_to_unknown_document_fails() {
    let mut timeline = Timeline::new("tl", "t");
    let err = assembler().attach_summary(&mut timeline, "nope", "x".into()).unwrap_err();
    assert!(matches!(err, TimelineError::DocumentNotFound { .. }));
    assert_eq!(timeline.gegenereerd_op, None);
}

#[test]
fn set_description_stamps_generation_time() {
    let mut timeline = Timeline::new("tl", "t");
    assembler().set_description(&mut timeline, Some("overzicht".into()));
    assert_eq!(timeline.beschrijving.as_deref(), Some("overzicht"));
    assert_eq!(timeline.gegenereerd_op, Some(fixed_now()));
}

#[test]
fn summarize_all_documents_and_describe() {
    let docs = vec![processed("a", "2024-01-01"), processed("b", "2024-01-02")];
    let mut timeline = assembler().build(&terms(&["Box 3"]), &docs).unwrap();
    let summarizer = CannedSummarizer::default();

    assembler().summarize(&mut timeline, None, &summarizer).unwrap();

    assert_eq!(*summarizer.documents.borrow(), ["a", "b"]);
    assert_eq!(timeline.documents[1].summary.as_deref(), Some("Box 3: b"));
    assert_eq!(timeline.beschrijving.as_deref(), Some("Box 3 (2 samenvattingen)"));
    assert_eq!(timeline.gegenereerd_op, Some(fixed_now()));
}

#[test]
fn summarize_single_document() {
    let docs = vec![processed("a", "2024-01-01"), processed("b", "2024-01-02")];
    let mut timeline = assembler().build(&terms(&["Box 3"]), &docs).unwrap();
    let summarizer = CannedSummarizer::default();
    let target = content_identifier("b");

    assembler().summarize(&mut timeline, Some(&target), &summarizer).unwrap();

    assert_eq!(*summarizer.documents.borrow(), ["b"]);
    assert_eq!(timeline.documents[0].summary, None);
    assert_eq!(timeline.beschrijving.as_deref(), Some("Box 3 (1 samenvattingen)"));
}

#[test]
fn summarize_empty_timeline_clears_description() {
    let mut timeline = Timeline::new("tl", "t");
    timeline.beschrijving = Some("oud".into());
    assembler().summarize(&mut timeline, None, &CannedSummarizer::default()).unwrap();
    assert_eq!(timeline.beschrijving, None);
}

#[test]
fn summarize_stored_updates_repository() {
    let mut repo = TimelineRepository::new(MemoryIndex::new());
    let published = assembler()
        .publish(&mut repo, &terms(&["Box 3"]), &[processed("a", "2024-01-01")])
        .unwrap();

    assembler()
        .summarize_stored(&mut repo, &published.identifier, None, &CannedSummarizer::default())
        .unwrap();

    let stored = repo.get(&published.identifier).unwrap().unwrap();
    assert_eq!(stored.documents[0].summary.as_deref(), Some("Box 3: a"));
    assert_eq!(stored.gegenereerd_op, Some(fixed_now()));
}

#[test]
fn summarize_stored_missing_timeline_fails() {
    let mut repo = TimelineRepository::new(MemoryIndex::new());
    let err = assembler()
        .summarize_stored(&mut repo, "nope", None, &CannedSummarizer::default())
        .unwrap_err();
    assert!(matches!(err, TimelineError::TimelineNotFound(id) if id == "nope"));
}
