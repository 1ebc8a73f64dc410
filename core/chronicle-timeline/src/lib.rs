//! Timeline domain for Chronicle.
//!
//! Records and services built on the codec:
//! - [`Timeline`], [`TimelineDocument`], [`ContentChunk`]: the stored timeline shape
//! - [`mdto`]: MDTO metadata records attached to scraped documents
//! - [`SearchQuery`], [`RawDocument`], [`DocumentSearchResult`]: search service exchange records
//! - [`TimelineRepository`]: timelines persisted through a [`SearchIndex`]
//! - [`TimelineAssembler`]: builds timelines from processed documents and maintains summaries

mod assembler;
mod error;
pub mod mdto;
mod repository;
mod scraper;
mod timeline;

pub use assembler::{
    PublishedTimeline, Summarizer, TimelineAssembler, UNKNOWN_DOCUMENT_TITLE, UNKNOWN_TIMELINE_NAME,
};
pub use error::{TimelineError, TimelineResult};
pub use repository::{DirectoryIndex, MemoryIndex, SearchIndex, TimelineRepository};
pub use scraper::{DocumentSearchResult, PageIndex, RawDocument, SearchQuery};
pub use timeline::{ContentChunk, Timeline, TimelineDocument, content_identifier};
