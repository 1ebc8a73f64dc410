//! Timeline records: a named, ordered collection of documents.

use chrono::{DateTime, FixedOffset};
use chronicle_codec::decode_fields;
use chronicle_model::{
    CodecResult, Datum, Field, FieldDescriptor, FieldHooks, FieldOverride, FieldValues,
    FormatConfig, Record, RecordDatum, RecordSchema,
};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;
use tracing::debug;

/// Stable identifier derived from text: lowercase hex SHA-256.
pub fn content_identifier(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// One piece of a document's extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentChunk {
    pub chunk_identifier: String,
    pub content: String,
}

impl ContentChunk {
    /// A chunk whose identifier is derived from its content.
    pub fn from_text(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            chunk_identifier: content_identifier(&content),
            content,
        }
    }
}

impl Record for ContentChunk {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            RecordSchema::builder("ContentChunk")
                .field(FieldDescriptor::required::<String>("chunk_identifier"))
                .field(FieldDescriptor::required::<String>("content"))
                .build()
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("chunk_identifier", &self.chunk_identifier)
            .with("content", &self.content)
    }

    fn from_fields(mut fields: FieldValues) -> CodecResult<Self> {
        Ok(Self {
            chunk_identifier: fields.take("chunk_identifier")?,
            content: fields.take("content")?,
        })
    }
}

/// A single document on a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineDocument {
    pub id: String,
    pub title: String,
    /// `None` when the source gave no date; such documents sort first.
    pub created_at: Option<DateTime<FixedOffset>>,
    pub publisher: Option<String>,
    pub summary: Option<String>,
    pub publisher_link: Option<String>,
    pub content_text: Vec<ContentChunk>,
    /// Raw MDTO `informatieobject` metadata, kept as-is.
    pub informatieobject: Map<String, Value>,
}

/// Accepts stored chunks as records or as plain strings, and reads a null
/// chunk list or null metadata as empty.
struct DocumentHooks;

impl FieldHooks for DocumentHooks {
    fn decode_field(&self, field: &FieldDescriptor, raw: &Value) -> CodecResult<FieldOverride<Datum>> {
        match (field.name(), raw) {
            ("content_text", Value::Null) => Ok(FieldOverride::Replace(Datum::Sequence(Vec::new()))),
            ("informatieobject", Value::Null) => Ok(FieldOverride::Replace(Datum::Mapping(Vec::new()))),
            ("content_text", Value::Array(items)) => decode_chunks(items).map(FieldOverride::Replace),
            _ => Ok(FieldOverride::Defer),
        }
    }
}

fn decode_chunks(items: &[Value]) -> CodecResult<Datum> {
    let schema = ContentChunk::schema();
    let mut chunks = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(text) => chunks.push(ContentChunk::from_text(text.as_str()).to_datum()),
            Value::Object(_) => {
                chunks.push(Datum::Record(RecordDatum::new(schema, decode_fields(schema, item)?)));
            }
            other => debug!("Dropping content chunk of unsupported shape: {}", other),
        }
    }
    Ok(Datum::Sequence(chunks))
}

impl Record for TimelineDocument {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            RecordSchema::builder("TimelineDocument")
                .field(FieldDescriptor::required::<String>("id"))
                .field(FieldDescriptor::required::<String>("title"))
                .field(FieldDescriptor::required::<Option<DateTime<FixedOffset>>>("created_at"))
                .field(FieldDescriptor::defaulted::<Option<String>>("publisher"))
                .field(FieldDescriptor::defaulted::<Option<String>>("summary"))
                .field(FieldDescriptor::defaulted::<Option<String>>("publisher_link"))
                .field(FieldDescriptor::factory::<Vec<ContentChunk>>("content_text"))
                .field(FieldDescriptor::factory::<Map<String, Value>>("informatieobject"))
                .formats(
                    FormatConfig::new()
                        .with_input_formats("created_at", ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d"]),
                )
                .hooks(DocumentHooks)
                .build()
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("id", &self.id)
            .with("title", &self.title)
            .with("created_at", &self.created_at)
            .with("publisher", &self.publisher)
            .with("summary", &self.summary)
            .with("publisher_link", &self.publisher_link)
            .with("content_text", &self.content_text)
            .with("informatieobject", &self.informatieobject)
    }

    fn from_fields(mut fields: FieldValues) -> CodecResult<Self> {
        Ok(Self {
            id: fields.take("id")?,
            title: fields.take("title")?,
            created_at: fields.take("created_at")?,
            publisher: fields.take_or_default("publisher")?,
            summary: fields.take_or_default("summary")?,
            publisher_link: fields.take_or_default("publisher_link")?,
            content_text: fields.take_or_default("content_text")?,
            informatieobject: fields.take_or_default("informatieobject")?,
        })
    }
}

/// A named timeline of documents, ordered by creation date.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub identifier: String,
    pub name: String,
    pub documents: Vec<TimelineDocument>,
    pub beschrijving: Option<String>,
    pub gegenereerd_op: Option<DateTime<FixedOffset>>,
}

impl Timeline {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            documents: Vec::new(),
            beschrijving: None,
            gegenereerd_op: None,
        }
    }

    /// Looks up a document by its identifier.
    pub fn doc_by_id(&self, doc_id: &str) -> Option<&TimelineDocument> {
        self.documents.iter().find(|d| d.id == doc_id)
    }

    pub fn doc_by_id_mut(&mut self, doc_id: &str) -> Option<&mut TimelineDocument> {
        self.documents.iter_mut().find(|d| d.id == doc_id)
    }
}

impl Record for Timeline {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            RecordSchema::builder("Timeline")
                .field(FieldDescriptor::required::<String>("identifier"))
                .field(FieldDescriptor::required::<String>("name"))
                .field(FieldDescriptor::factory::<Vec<TimelineDocument>>("documents"))
                .field(FieldDescriptor::defaulted::<Option<String>>("beschrijving"))
                .field(FieldDescriptor::defaulted::<Option<DateTime<FixedOffset>>>("gegenereerd_op"))
                .build()
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("identifier", &self.identifier)
            .with("name", &self.name)
            .with("documents", &self.documents)
            .with("beschrijving", &self.beschrijving)
            .with("gegenereerd_op", &self.gegenereerd_op)
    }

    fn from_fields(mut fields: FieldValues) -> CodecResult<Self> {
        Ok(Self {
            identifier: fields.take("identifier")?,
            name: fields.take("name")?,
            documents: fields.take_or_default("documents")?,
            beschrijving: fields.take_or_default("beschrijving")?,
            gegenereerd_op: fields.take_or_default("gegenereerd_op")?,
        })
    }
}
