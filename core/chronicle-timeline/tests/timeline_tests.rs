use chrono::{DateTime, FixedOffset, TimeZone};
use chronicle_codec::{RecordCodec, decode, encode};
use chronicle_model::{CodecError, Record};
use chronicle_timeline::{ContentChunk, Timeline, TimelineDocument, content_identifier};
use pretty_assertions::assert_eq;
use serde_json::{Map, json};

fn amsterdam(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
    chrono_tz::Europe::Amsterdam
        .with_ymd_and_hms(y, m, d, h, min, s)
        .unwrap()
        .fixed_offset()
}

fn sample_document() -> TimelineDocument {
    TimelineDocument {
        id: "doc-1".into(),
        title: "Beslisnota Box 3".into(),
        created_at: Some(amsterdam(2024, 2, 1, 0, 0, 0)),
        publisher: Some("Ministerie van Financiën".into()),
        summary: None,
        publisher_link: Some("https://example.org/doc-1".into()),
        content_text: vec![ContentChunk::from_text("eerste deel")],
        informatieobject: Map::new(),
    }
}

// ── ContentChunk ─────────────────────────────────────────────────

#[test]
fn chunk_from_text_uses_sha256_identifier() {
    let chunk = ContentChunk::from_text("abc");
    assert_eq!(
        chunk.chunk_identifier,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(chunk.content, "abc");
}

#[test]
fn content_identifier_is_stable() {
    assert_eq!(content_identifier("x"), content_identifier("x"));
    assert_ne!(content_identifier("x"), content_identifier("y"));
    assert_eq!(content_identifier("x").len(), 64);
}

// ── TimelineDocument ─────────────────────────────────────────────

#[test]
fn document_round_trips() {
    let doc = sample_document();
    let tree = encode(&doc).unwrap();
    assert_eq!(tree["created_at"], json!("2024-02-01T00:00:00+01:00"));
    assert_eq!(decode::<TimelineDocument>(&tree).unwrap(), doc);
}

#[test]
fn document_accepts_processed_date_formats() {
    let doc: TimelineDocument = decode(&json!({
        "id": "d", "title": "t", "created_at": "2024-02-01 13:45:00"
    }))
    .unwrap();
    assert_eq!(doc.created_at, Some(amsterdam(2024, 2, 1, 13, 45, 0)));

    let doc: TimelineDocument = decode(&json!({
        "id": "d", "title": "t", "created_at": "2024-02-01"
    }))
    .unwrap();
    assert_eq!(doc.created_at, Some(amsterdam(2024, 2, 1, 0, 0, 0)));
}

#[test]
fn document_without_date_decodes_as_none() {
    let doc: TimelineDocument = decode(&json!({"id": "d", "title": "t"})).unwrap();
    assert_eq!(doc.created_at, None);
    assert!(doc.content_text.is_empty());
    assert!(doc.informatieobject.is_empty());
}

#[test]
fn document_with_bad_date_names_field() {
    let err = decode::<TimelineDocument>(&json!({
        "id": "d", "title": "t", "created_at": "gisteren"
    }))
    .unwrap_err();
    assert_eq!(
        err,
        CodecError::DateTimeParse {
            field: "created_at".into(),
            value: "gisteren".into(),
        }
    );
}

#[test]
fn string_chunks_are_normalised() {
    let doc: TimelineDocument = decode(&json!({
        "id": "d",
        "title": "t",
        "content_text": [
            "plain text",
            null,
            {"chunk_identifier": "c2", "content": "stored"},
            42
        ]
    }))
    .unwrap();
    assert_eq!(
        doc.content_text,
        vec![
            ContentChunk::from_text("plain text"),
            ContentChunk {
                chunk_identifier: "c2".into(),
                content: "stored".into(),
            },
        ]
    );
}

#[test]
fn malformed_chunk_object_is_an_error() {
    let err = decode::<TimelineDocument>(&json!({
        "id": "d", "title": "t", "content_text": [{"content": "no id"}]
    }))
    .unwrap_err();
    assert_eq!(err.field(), "chunk_identifier");
}

#[test]
fn null_content_text_becomes_empty() {
    let doc: TimelineDocument = decode(&json!({"id": "d", "title": "t", "content_text": null})).unwrap();
    assert!(doc.content_text.is_empty());
}

#[test]
fn null_informatieobject_becomes_empty() {
    let doc: TimelineDocument = decode(&json!({
        "id": "d", "title": "t", "created_at": null, "informatieobject": null
    }))
    .unwrap();
    assert!(doc.informatieobject.is_empty());
    assert_eq!(encode(&doc).unwrap()["informatieobject"], json!({}));
}

#[test]
fn timeline_with_null_document_parts_still_decodes() {
    let timeline: Timeline = decode(&json!({
        "identifier": "tl",
        "name": "Box 3",
        "documents": [
            {"id": "d1", "title": "a", "content_text": null, "informatieobject": null},
            {"id": "d2", "title": "b", "content_text": ["tekst"]}
        ]
    }))
    .unwrap();
    assert_eq!(timeline.documents.len(), 2);
    assert!(timeline.documents[0].content_text.is_empty());
    assert_eq!(timeline.documents[1].content_text, vec![ContentChunk::from_text("tekst")]);
}

#[test]
fn informatieobject_is_kept_verbatim() {
    let meta = json!({"titel": "Motie", "organisatie": {"naam": "TK"}});
    let doc: TimelineDocument = decode(&json!({
        "id": "d", "title": "t", "informatieobject": meta
    }))
    .unwrap();
    assert_eq!(encode(&doc).unwrap()["informatieobject"], meta);
}

// ── Timeline ─────────────────────────────────────────────────────

#[test]
fn timeline_round_trips_with_documents() {
    let mut timeline = Timeline::new("tl-1", "Box 3");
    timeline.documents.push(sample_document());
    timeline.beschrijving = Some("Overzicht".into());
    timeline.gegenereerd_op = Some(amsterdam(2024, 3, 1, 12, 0, 0));

    let tree = timeline.to_tree().unwrap();
    assert_eq!(Timeline::from_tree(&tree).unwrap(), timeline);
}

#[test]
fn timeline_defaults_for_missing_keys() {
    let timeline: Timeline = decode(&json!({"identifier": "tl", "name": "n"})).unwrap();
    assert_eq!(timeline, Timeline::new("tl", "n"));
}

#[test]
fn doc_by_id_finds_documents() {
    let mut timeline = Timeline::new("tl", "n");
    timeline.documents.push(sample_document());
    assert_eq!(timeline.doc_by_id("doc-1").map(|d| d.title.as_str()), Some("Beslisnota Box 3"));
    assert!(timeline.doc_by_id("missing").is_none());

    timeline.doc_by_id_mut("doc-1").unwrap().summary = Some("kort".into());
    assert_eq!(timeline.documents[0].summary.as_deref(), Some("kort"));
}

#[test]
fn timeline_schemas_validate() {
    assert_eq!(Timeline::schema().validate(), Ok(()));
    assert_eq!(TimelineDocument::schema().validate(), Ok(()));
    assert_eq!(ContentChunk::schema().validate(), Ok(()));
}
