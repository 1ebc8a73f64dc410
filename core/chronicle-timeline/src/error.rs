//! Error types for timeline storage and assembly.

use chronicle_model::CodecError;
use thiserror::Error;

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Errors that can occur while storing or assembling timelines.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// A record could not be converted to or from its tree form.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing usable was left to build a timeline from.
    #[error("no documents found or processed")]
    DocumentsNotFound,

    /// Timeline not found.
    #[error("timeline not found: {0}")]
    TimelineNotFound(String),

    /// Document not found within a timeline.
    #[error("document {document} not found in timeline {timeline}")]
    DocumentNotFound { timeline: String, document: String },

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
