//! Commands behind the `chronicle` binary.

use anyhow::{Context, Result, bail};
use chronicle_codec::{decode, encode};
use chronicle_model::{Record, SchemaSummary};
use chronicle_timeline::{
    DirectoryIndex, DocumentSearchResult, PublishedTimeline, Timeline, TimelineAssembler,
    TimelineDocument, TimelineRepository, mdto::Mdto,
};
use clap::ValueEnum;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Record types the command line can work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Model {
    Timeline,
    TimelineDocument,
    Mdto,
    SearchResult,
}

impl Model {
    pub fn schema_summary(self) -> SchemaSummary {
        match self {
            Self::Timeline => Timeline::schema().summary(),
            Self::TimelineDocument => TimelineDocument::schema().summary(),
            Self::Mdto => Mdto::schema().summary(),
            Self::SearchResult => DocumentSearchResult::schema().summary(),
        }
    }

    /// Decodes `input` as this model and encodes it again.
    pub fn normalize(self, input: &Value) -> Result<Value> {
        let tree = match self {
            Self::Timeline => encode(&decode::<Timeline>(input)?)?,
            Self::TimelineDocument => encode(&decode::<TimelineDocument>(input)?)?,
            Self::Mdto => encode(&decode::<Mdto>(input)?)?,
            Self::SearchResult => encode(&decode::<DocumentSearchResult>(input)?)?,
        };
        Ok(tree)
    }
}

/// Parses JSON from `path`, or from stdin when no path is given.
pub fn read_json(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };
    serde_json::from_str(&text).context("Input is not valid JSON")
}

/// Builds a timeline from an array of processed documents and stores it under `store`.
pub fn assemble(store: &Path, search_terms: &[String], documents: &Value) -> Result<PublishedTimeline> {
    let Value::Array(documents) = documents else {
        bail!("Expected a JSON array of documents");
    };
    debug!("Assembling {} documents into {}", documents.len(), store.display());

    let mut repository = TimelineRepository::new(DirectoryIndex::open(store)?);
    let published = TimelineAssembler::new().publish(&mut repository, search_terms, documents)?;
    Ok(published)
}

/// Lists up to `limit` stored timelines as `(identifier, name, documents)`.
pub fn list(store: &Path, limit: usize) -> Result<Vec<(String, String, usize)>> {
    let repository = TimelineRepository::new(DirectoryIndex::open(store)?);
    let timelines = repository.find_all(limit)?;
    Ok(timelines
        .into_iter()
        .map(|tl| {
            let count = tl.documents.len();
            (tl.identifier, tl.name, count)
        })
        .collect())
}
