//! Error types for records and their descriptors.

use thiserror::Error;

/// Result type for encode/decode operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while converting between records and the generic tree.
///
/// Conversions deep inside a value do not know which field they belong to;
/// they leave `field` empty and the caller fills it in with [`CodecError::in_field`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// No configured or fallback format matched a date/time value.
    #[error("invalid datetime for field '{field}': {value:?}")]
    DateTimeParse { field: String, value: String },

    /// The value's shape disagrees with the declared type.
    #[error("field '{field}': expected {expected}, found {found}")]
    ShapeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// The decoded value cannot become the field's Rust type.
    #[error("field '{field}' has no applicable conversion: {detail}")]
    UnsupportedType { field: String, detail: String },

    /// An output format string chrono cannot render.
    #[error("invalid format {format:?} for field '{field}'")]
    InvalidFormat { field: String, format: String },
}

impl CodecError {
    /// A shape mismatch not yet tied to a field.
    pub fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            field: String::new(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// An unsupported conversion not yet tied to a field.
    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self::UnsupportedType {
            field: String::new(),
            detail: detail.into(),
        }
    }

    /// Names the field this error belongs to, unless a deeper field already did.
    #[must_use]
    pub fn in_field(mut self, name: &str) -> Self {
        let slot = match &mut self {
            Self::DateTimeParse { field, .. }
            | Self::ShapeMismatch { field, .. }
            | Self::UnsupportedType { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        };
        if slot.is_empty() {
            *slot = name.to_string();
        }
        self
    }

    /// The field this error belongs to (empty if not yet known).
    pub fn field(&self) -> &str {
        match self {
            Self::DateTimeParse { field, .. }
            | Self::ShapeMismatch { field, .. }
            | Self::UnsupportedType { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

/// Mistakes in a record's descriptor table, found by `RecordSchema::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{record}: field '{field}' is declared more than once")]
    DuplicateField { record: String, field: String },

    #[error("{record}: format configured for unknown field '{field}'")]
    UnknownFormatField { record: String, field: String },

    #[error("{record}: format configured for field '{field}' which holds no date/time")]
    NotADateTimeField { record: String, field: String },

    #[error("{record}: invalid format {format:?} for field '{field}'")]
    InvalidFormat {
        record: String,
        field: String,
        format: String,
    },
}
