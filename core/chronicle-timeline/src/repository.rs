//! Timeline persistence over a document index.
//!
//! Timelines are stored in their tree form, keyed by identifier. A stored
//! tree that no longer decodes is treated as missing.

use crate::error::{TimelineError, TimelineResult};
use crate::timeline::Timeline;
use chronicle_codec::{decode, encode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A keyed store of JSON documents.
pub trait SearchIndex {
    /// Stores `document` under `id`, replacing any previous document.
    fn index(&mut self, id: &str, document: Value) -> TimelineResult<()>;

    fn get(&self, id: &str) -> TimelineResult<Option<Value>>;

    /// Up to `limit` stored documents, in identifier order.
    fn search(&self, limit: usize) -> TimelineResult<Vec<Value>>;
}

/// An index held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    documents: BTreeMap<String, Value>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl SearchIndex for MemoryIndex {
    fn index(&mut self, id: &str, document: Value) -> TimelineResult<()> {
        self.documents.insert(id.to_string(), document);
        Ok(())
    }

    fn get(&self, id: &str) -> TimelineResult<Option<Value>> {
        Ok(self.documents.get(id).cloned())
    }

    fn search(&self, limit: usize) -> TimelineResult<Vec<Value>> {
        Ok(self.documents.values().take(limit).cloned().collect())
    }
}

/// An index stored as one `<id>.json` file per document in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    root: PathBuf,
}

impl DirectoryIndex {
    /// Opens (creating if needed) an index rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> TimelineResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, id: &str) -> TimelineResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !id.starts_with('.');
        if !valid {
            return Err(TimelineError::InvalidData(format!("invalid document id: {id:?}")));
        }
        Ok(self.root.join(format!("{id}.json")))
    }
}

impl SearchIndex for DirectoryIndex {
    fn index(&mut self, id: &str, document: Value) -> TimelineResult<()> {
        let path = self.path_for(id)?;
        fs::write(&path, serde_json::to_vec_pretty(&document)?)?;
        debug!("Indexed {} at {}", id, path.display());
        Ok(())
    }

    fn get(&self, id: &str) -> TimelineResult<Option<Value>> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&fs::read(path)?)?))
    }

    fn search(&self, limit: usize) -> TimelineResult<Vec<Value>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        paths
            .into_iter()
            .take(limit)
            .map(|path| -> TimelineResult<Value> { Ok(serde_json::from_slice(&fs::read(path)?)?) })
            .collect()
    }
}

/// Stores and retrieves [`Timeline`]s through a [`SearchIndex`].
#[derive(Debug)]
pub struct TimelineRepository<I> {
    index: I,
}

impl<I: SearchIndex> TimelineRepository<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Creates or replaces the timeline stored under its identifier.
    pub fn upsert(&mut self, timeline: &Timeline) -> TimelineResult<()> {
        let tree = encode(timeline)?;
        self.index.index(&timeline.identifier, tree)
    }

    pub fn update(&mut self, timeline: &Timeline) -> TimelineResult<()> {
        self.upsert(timeline)
    }

    /// The timeline stored under `identifier`, or `None` if there is none
    /// or it no longer decodes.
    pub fn get(&self, identifier: &str) -> TimelineResult<Option<Timeline>> {
        let Some(tree) = self.index.get(identifier)? else {
            return Ok(None);
        };
        match decode::<Timeline>(&tree) {
            Ok(timeline) => Ok(Some(timeline)),
            Err(e) => {
                warn!("Stored timeline {} could not be decoded: {}", identifier, e);
                Ok(None)
            }
        }
    }

    /// Up to `limit` stored timelines; entries that do not decode are skipped.
    pub fn find_all(&self, limit: usize) -> TimelineResult<Vec<Timeline>> {
        let timelines = self
            .index
            .search(limit)?
            .iter()
            .filter_map(|tree| match decode::<Timeline>(tree) {
                Ok(timeline) => Some(timeline),
                Err(e) => {
                    warn!("Skipping stored timeline that could not be decoded: {}", e);
                    None
                }
            })
            .collect();
        Ok(timelines)
    }
}
