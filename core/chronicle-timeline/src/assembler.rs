//! Building timelines from processed documents and keeping their summaries current.

use crate::error::{TimelineError, TimelineResult};
use crate::repository::{SearchIndex, TimelineRepository};
use crate::timeline::{Timeline, TimelineDocument, content_identifier};
use chrono::{DateTime, FixedOffset, Utc};
use chronicle_codec::{decode, encode};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

/// Title given to documents that arrive without one.
pub const UNKNOWN_DOCUMENT_TITLE: &str = "Onbekend document";

/// Name given to timelines built without a search term.
pub const UNKNOWN_TIMELINE_NAME: &str = "Onbekend";

/// Produces summary text for documents and timelines.
pub trait Summarizer {
    /// Summarises one document, given in tree form, for the named timeline.
    fn summarize_document(&self, document: &Value, timeline_name: &str) -> TimelineResult<String>;

    /// Writes an overall description from the documents' summaries.
    fn describe(&self, timeline_name: &str, summaries: &[&str]) -> TimelineResult<String>;
}

/// Outcome of [`TimelineAssembler::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedTimeline {
    pub name: String,
    pub identifier: String,
    pub documents_count: usize,
}

/// Turns processed documents into [`Timeline`]s and maintains their summaries.
#[derive(Debug, Clone, Copy)]
pub struct TimelineAssembler {
    clock: fn() -> DateTime<FixedOffset>,
}

impl Default for TimelineAssembler {
    fn default() -> Self {
        Self {
            clock: || Utc::now().fixed_offset(),
        }
    }
}

impl TimelineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `clock` for generation timestamps instead of the system time.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<FixedOffset>) -> Self {
        self.clock = clock;
        self
    }

    /// Identifier of the timeline with the given name.
    pub fn timeline_identifier(name: &str) -> String {
        content_identifier(name)
    }

    /// Rewrites a processed document into the stored document shape.
    ///
    /// `doc_identifier` becomes `id`. Without either, the id is derived from
    /// the title, the publisher link, the document link, or the whole input,
    /// whichever comes first.
    pub fn normalize_processed(raw: &Value) -> Value {
        let id = non_empty(raw, "doc_identifier")
            .or_else(|| non_empty(raw, "id"))
            .map(str::to_string)
            .unwrap_or_else(|| {
                let source = non_empty(raw, "title")
                    .or_else(|| non_empty(raw, "publisher_link"))
                    .or_else(|| non_empty(raw, "document_link"))
                    .map(str::to_string)
                    .unwrap_or_else(|| raw.to_string());
                content_identifier(&source)
            });

        json!({
            "id": id,
            "title": non_empty(raw, "title").unwrap_or(UNKNOWN_DOCUMENT_TITLE),
            "created_at": value_or(raw, "created_at", Value::Null),
            "publisher": value_or(raw, "publisher", Value::Null),
            "summary": value_or(raw, "summary", Value::Null),
            "publisher_link": value_or(raw, "publisher_link", Value::Null),
            "content_text": value_or(raw, "content_text", Value::Array(Vec::new())),
            "informatieobject": value_or(raw, "informatieobject", Value::Object(Map::new())),
        })
    }

    /// Decodes a document, normalising it first if it is still in processed form.
    pub fn document(raw: &Value) -> TimelineResult<TimelineDocument> {
        let processed = raw.get("doc_identifier").is_some() && raw.get("id").is_none();
        let document = if processed {
            decode(&Self::normalize_processed(raw))?
        } else {
            decode(raw)?
        };
        Ok(document)
    }

    /// Builds a timeline named after the first search term from processed
    /// documents, ordered by creation date (undated documents first).
    pub fn build(&self, search_terms: &[String], documents: &[Value]) -> TimelineResult<Timeline> {
        if documents.is_empty() {
            return Err(TimelineError::DocumentsNotFound);
        }

        let name = search_terms
            .iter()
            .map(|term| term.trim())
            .find(|term| !term.is_empty())
            .unwrap_or(UNKNOWN_TIMELINE_NAME);

        let mut timeline = Timeline::new(Self::timeline_identifier(name), name);
        timeline.documents = documents
            .iter()
            .map(|raw| decode(&Self::normalize_processed(raw)))
            .collect::<Result<Vec<TimelineDocument>, _>>()?;
        timeline.documents.sort_by_key(|doc| doc.created_at);

        debug!("Built timeline {} with {} documents", timeline.identifier, timeline.documents.len());
        Ok(timeline)
    }

    /// Builds a timeline and stores it.
    pub fn publish<I: SearchIndex>(
        &self,
        repository: &mut TimelineRepository<I>,
        search_terms: &[String],
        documents: &[Value],
    ) -> TimelineResult<PublishedTimeline> {
        let timeline = self.build(search_terms, documents)?;
        repository.upsert(&timeline)?;
        info!("Published timeline {} ({})", timeline.name, timeline.identifier);
        Ok(PublishedTimeline {
            name: timeline.name,
            identifier: timeline.identifier,
            documents_count: timeline.documents.len(),
        })
    }

    /// Sets one document's summary and stamps the generation time.
    pub fn attach_summary(&self, timeline: &mut Timeline, doc_id: &str, summary: String) -> TimelineResult<()> {
        let Some(document) = timeline.doc_by_id_mut(doc_id) else {
            return Err(TimelineError::DocumentNotFound {
                timeline: timeline.identifier.clone(),
                document: doc_id.to_string(),
            });
        };
        document.summary = Some(summary);
        timeline.gegenereerd_op = Some((self.clock)());
        Ok(())
    }

    /// Sets the timeline description and stamps the generation time.
    pub fn set_description(&self, timeline: &mut Timeline, description: Option<String>) {
        timeline.beschrijving = description;
        timeline.gegenereerd_op = Some((self.clock)());
    }

    /// Regenerates summaries for one document, or for all of them when
    /// `doc_id` is `None`, then rewrites the description from the summaries.
    pub fn summarize<S: Summarizer>(
        &self,
        timeline: &mut Timeline,
        doc_id: Option<&str>,
        summarizer: &S,
    ) -> TimelineResult<()> {
        let name = timeline.name.clone();
        match doc_id {
            Some(doc_id) => {
                let Some(document) = timeline.doc_by_id(doc_id) else {
                    return Err(TimelineError::DocumentNotFound {
                        timeline: timeline.identifier.clone(),
                        document: doc_id.to_string(),
                    });
                };
                let summary = summarizer.summarize_document(&encode(document)?, &name)?;
                self.attach_summary(timeline, doc_id, summary)?;
            }
            None => {
                for document in &mut timeline.documents {
                    let summary = summarizer.summarize_document(&encode(&*document)?, &name)?;
                    document.summary = Some(summary);
                }
            }
        }

        let summaries: Vec<&str> = timeline
            .documents
            .iter()
            .filter_map(|doc| doc.summary.as_deref())
            .collect();
        let description = if summaries.is_empty() {
            None
        } else {
            Some(summarizer.describe(&name, &summaries)?)
        };
        self.set_description(timeline, description);
        Ok(())
    }

    /// Loads a stored timeline, summarises it and stores the result.
    pub fn summarize_stored<I: SearchIndex, S: Summarizer>(
        &self,
        repository: &mut TimelineRepository<I>,
        identifier: &str,
        doc_id: Option<&str>,
        summarizer: &S,
    ) -> TimelineResult<Timeline> {
        let mut timeline = repository
            .get(identifier)?
            .ok_or_else(|| TimelineError::TimelineNotFound(identifier.to_string()))?;
        self.summarize(&mut timeline, doc_id, summarizer)?;
        repository.update(&timeline)?;
        Ok(timeline)
    }
}

fn non_empty<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// The value under `key`, or `fallback` when it is missing or null.
fn value_or(raw: &Value, key: &str, fallback: Value) -> Value {
    match raw.get(key) {
        Some(Value::Null) | None => fallback,
        Some(value) => value.clone(),
    }
}
