//! Record descriptors for Chronicle.
//!
//! Everything the codec needs to know about a typed record lives here:
//! - [`Record`]: a Rust type the codec can map to and from the generic tree
//! - [`Field`]: the conversion between one field's Rust type and a [`Datum`]
//! - [`RecordSchema`]: a record's ordered [`FieldDescriptor`]s plus its [`FormatConfig`]
//! - [`FieldType`]: the declared type that drives encoding and decoding
//! - [`FieldHooks`]: optional per-field overrides, consulted before the default rules
//! - [`CustomCodec`]: types that bring their own conversion from the tree
//!
//! The generic tree itself is [`serde_json::Value`]. The conversion engine is
//! in `chronicle-codec`; this crate only describes records and moves their
//! values in and out.

mod custom;
mod datum;
mod error;
mod field;
mod format;
mod hooks;
mod record;
mod schema;

pub use custom::CustomCodec;
pub use datum::{CustomValue, Datum, FieldValues, RecordDatum, json_kind};
pub use error::{CodecError, CodecResult, SchemaError};
pub use field::Field;
pub use format::{FormatConfig, is_valid_format};
pub use hooks::{FieldHooks, FieldOverride};
pub use record::Record;
pub use schema::{
    CustomType, FieldDefault, FieldDescriptor, FieldSummary, FieldType, RecordSchema,
    RecordSchemaBuilder, RecordType, ScalarKind, SchemaSummary,
};
