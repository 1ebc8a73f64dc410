//! Records exchanged with the document search service.

use crate::mdto::Mdto;
use chronicle_codec::encode;
use chronicle_model::{
    CodecError, CodecResult, CustomCodec, Datum, Field, FieldDescriptor, FieldType, FieldValues,
    Record, RecordSchema, json_kind,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A search against the document repository. The term is stored trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    term: String,
    document_types: Vec<String>,
}

impl SearchQuery {
    pub fn new(term: &str, document_types: Vec<String>) -> Self {
        Self {
            term: term.trim().to_string(),
            document_types,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn document_types(&self) -> &[String] {
        &self.document_types
    }
}

impl Record for SearchQuery {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            RecordSchema::builder("SearchQuery")
                .field(FieldDescriptor::required::<String>("term"))
                .field(FieldDescriptor::required::<Vec<String>>("document_types"))
                .build()
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("term", &self.term)
            .with("document_types", &self.document_types)
    }

    /// A null `document_types` is read as an empty list.
    fn from_fields(mut fields: FieldValues) -> CodecResult<Self> {
        let term: String = fields.take("term")?;
        let document_types: Option<Vec<String>> = fields.take("document_types")?;
        Ok(Self::new(&term, document_types.unwrap_or_default()))
    }
}

/// A scraped document with its resolved metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    publisher_link: String,
    document_link: String,
    metadata: Map<String, Value>,
}

impl RawDocument {
    pub fn new(publisher_link: impl Into<String>, document_link: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self {
            publisher_link: publisher_link.into(),
            document_link: document_link.into(),
            metadata,
        }
    }

    /// Builds a document whose metadata is the encoded MDTO record.
    pub fn from_mdto(
        publisher_link: impl Into<String>,
        document_link: impl Into<String>,
        mdto: &Mdto,
    ) -> CodecResult<Self> {
        match encode(mdto)? {
            Value::Object(metadata) => Ok(Self::new(publisher_link, document_link, metadata)),
            other => Err(CodecError::shape("object", json_kind(&other))),
        }
    }

    pub fn publisher_link(&self) -> &str {
        &self.publisher_link
    }

    pub fn document_link(&self) -> &str {
        &self.document_link
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// The MDTO `informatieobject` section of the metadata, if present.
    pub fn informatieobject(&self) -> Option<&Map<String, Value>> {
        self.metadata.get("informatieobject").and_then(Value::as_object)
    }
}

impl Record for RawDocument {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            RecordSchema::builder("RawDocument")
                .field(FieldDescriptor::required::<String>("publisher_link"))
                .field(FieldDescriptor::required::<String>("document_link"))
                .field(FieldDescriptor::required::<Map<String, Value>>("metadata"))
                .build()
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("publisher_link", &self.publisher_link)
            .with("document_link", &self.document_link)
            .with("metadata", &self.metadata)
    }

    fn from_fields(mut fields: FieldValues) -> CodecResult<Self> {
        Ok(Self {
            publisher_link: fields.take("publisher_link")?,
            document_link: fields.take("document_link")?,
            metadata: fields.take("metadata")?,
        })
    }
}

/// Document ids found on each result page, keyed by page number.
///
/// In the tree this is an object with numeric-string keys. A sequence of
/// `[page, ids]` pairs is accepted on input as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIndex(BTreeMap<u32, Vec<String>>);

impl PageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, page: u32, ids: Vec<String>) {
        self.0.insert(page, ids);
    }

    pub fn get(&self, page: u32) -> Option<&[String]> {
        self.0.get(&page).map(Vec::as_slice)
    }

    pub fn pages(&self) -> impl Iterator<Item = (u32, &[String])> {
        self.0.iter().map(|(page, ids)| (*page, ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, Vec<String>)> for PageIndex {
    fn from_iter<T: IntoIterator<Item = (u32, Vec<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn page_number(value: &Value) -> CodecResult<u32> {
    let page = match value {
        Value::String(s) => s.trim().parse::<u32>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };
    page.ok_or_else(|| CodecError::shape("page number", value.to_string()))
}

fn page_ids(value: &Value) -> CodecResult<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(CodecError::shape("array of document ids", json_kind(value)));
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| CodecError::shape("document id string", json_kind(item)))
        })
        .collect()
}

impl CustomCodec for PageIndex {
    fn encode(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(page, ids)| (page.to_string(), Value::from(ids.clone())))
                .collect(),
        )
    }

    fn decode(value: &Value) -> CodecResult<Self> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(page, ids)| Ok((page_number(&Value::String(page.clone()))?, page_ids(ids)?)))
                .collect(),
            Value::Array(pairs) => pairs
                .iter()
                .map(|pair| match pair.as_array().map(Vec::as_slice) {
                    Some([page, ids]) => Ok((page_number(page)?, page_ids(ids)?)),
                    _ => Err(CodecError::shape("[page, ids] pair", json_kind(pair))),
                })
                .collect(),
            other => Err(CodecError::shape("object or array of pairs", json_kind(other))),
        }
    }

    fn empty() -> Option<Self> {
        Some(Self::new())
    }
}

impl Field for PageIndex {
    fn field_type() -> FieldType {
        FieldType::custom::<PageIndex>()
    }

    fn to_datum(&self) -> Datum {
        Datum::custom(self.clone())
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        datum.into_custom()
    }
}

/// Everything one search call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSearchResult {
    pub query: SearchQuery,
    pub documents: Vec<RawDocument>,
    pub total_pages: u32,
    pub page_document_ids: PageIndex,
}

impl DocumentSearchResult {
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Each document in tree form, for consumers that expect plain objects.
    pub fn documents_as_trees(&self) -> CodecResult<Vec<Value>> {
        self.documents.iter().map(encode).collect()
    }
}

impl Record for DocumentSearchResult {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            RecordSchema::builder("DocumentSearchResult")
                .field(FieldDescriptor::required::<SearchQuery>("query"))
                .field(FieldDescriptor::required::<Vec<RawDocument>>("documents"))
                .field(FieldDescriptor::required::<u32>("total_pages"))
                .field(FieldDescriptor::required::<PageIndex>("page_document_ids"))
                .build()
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("query", &self.query)
            .with("documents", &self.documents)
            .with("total_pages", &self.total_pages)
            .with("page_document_ids", &self.page_document_ids)
    }

    fn from_fields(mut fields: FieldValues) -> CodecResult<Self> {
        Ok(Self {
            query: fields.take("query")?,
            documents: fields.take("documents")?,
            total_pages: fields.take("total_pages")?,
            page_document_ids: fields.take("page_document_ids")?,
        })
    }
}
