use crate::custom::{CustomCodec, decode_erased, empty_erased};
use crate::error::{CodecResult, SchemaError};
use crate::format::{FormatConfig, is_valid_format};
use crate::hooks::FieldHooks;
use crate::{Datum, Field, Record};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Describes a record type's fields and formatting rules.
///
/// Built once per type and kept for the life of the process; nothing
/// mutates a schema after [`RecordSchemaBuilder::build`].
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    formats: FormatConfig,
    hooks: Option<Box<dyn FieldHooks>>,
}

impl RecordSchema {
    pub fn builder(name: &'static str) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name,
            fields: Vec::new(),
            formats: FormatConfig::default(),
            hooks: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn formats(&self) -> &FormatConfig {
        &self.formats
    }

    pub fn hooks(&self) -> Option<&dyn FieldHooks> {
        self.hooks.as_deref()
    }

    /// True if an instance can be built with no input at all, i.e. every
    /// field has a default.
    pub fn is_default_constructible(&self) -> bool {
        self.fields.iter().all(FieldDescriptor::has_default)
    }

    /// Checks the descriptor table for mistakes a decode would only hit at runtime.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name) {
                return Err(SchemaError::DuplicateField {
                    record: self.name.to_string(),
                    field: field.name.to_string(),
                });
            }
        }

        for (name, format) in self.formats.entries() {
            let Some(field) = self.field(name) else {
                return Err(SchemaError::UnknownFormatField {
                    record: self.name.to_string(),
                    field: name.to_string(),
                });
            };
            if !field.field_type.holds_datetime() {
                return Err(SchemaError::NotADateTimeField {
                    record: self.name.to_string(),
                    field: name.to_string(),
                });
            }
            if !is_valid_format(format) {
                return Err(SchemaError::InvalidFormat {
                    record: self.name.to_string(),
                    field: name.to_string(),
                    format: format.to_string(),
                });
            }
        }
        Ok(())
    }

    /// A serializable description of this schema.
    pub fn summary(&self) -> SchemaSummary {
        SchemaSummary {
            record: self.name,
            output_timezone: self.formats.output_timezone().name().to_string(),
            input_naive_timezone: self.formats.input_naive_timezone().name().to_string(),
            fields: self
                .fields
                .iter()
                .map(|f| FieldSummary {
                    name: f.name,
                    field_type: f.field_type.to_string(),
                    default: f.default,
                    output_format: self.formats.output_format(f.name).map(str::to_string),
                    input_formats: self.formats.input_formats(f.name).to_vec(),
                })
                .collect(),
        }
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("formats", &self.formats)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

/// Collects the parts of a [`RecordSchema`].
pub struct RecordSchemaBuilder {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    formats: FormatConfig,
    hooks: Option<Box<dyn FieldHooks>>,
}

impl RecordSchemaBuilder {
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn formats(mut self, formats: FormatConfig) -> Self {
        self.formats = formats;
        self
    }

    #[must_use]
    pub fn hooks(mut self, hooks: impl FieldHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn build(self) -> RecordSchema {
        RecordSchema {
            name: self.name,
            fields: self.fields,
            formats: self.formats,
            hooks: self.hooks,
        }
    }
}

/// One field of a record: name, declared type and whether it has a default.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: &'static str,
    field_type: FieldType,
    default: FieldDefault,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, field_type: FieldType, default: FieldDefault) -> Self {
        Self {
            name,
            field_type,
            default,
        }
    }

    /// A field that must be supplied (or decoded from null).
    pub fn required<T: Field>(name: &'static str) -> Self {
        Self::new(name, T::field_type(), FieldDefault::None)
    }

    /// A field with a fixed default value.
    pub fn defaulted<T: Field>(name: &'static str) -> Self {
        Self::new(name, T::field_type(), FieldDefault::Fixed)
    }

    /// A field whose default is built fresh for every instance.
    pub fn factory<T: Field>(name: &'static str) -> Self {
        Self::new(name, T::field_type(), FieldDefault::Factory)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn default(&self) -> FieldDefault {
        self.default
    }

    pub fn has_default(&self) -> bool {
        self.default != FieldDefault::None
    }
}

/// How a field is filled when the input does not mention it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDefault {
    /// No default: a missing key decodes as null.
    #[default]
    None,
    /// A fixed value.
    Fixed,
    /// A value produced by a zero-argument constructor.
    Factory,
}

/// The declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Scalar(ScalarKind),
    DateTime,
    Record(RecordType),
    /// Exactly one non-null alternative plus null.
    Optional(Box<FieldType>),
    /// Elements of the given type, or untyped elements passed through as-is.
    Sequence(Option<Box<FieldType>>),
    /// String keys; values of the given type, or untyped.
    Mapping(Option<Box<FieldType>>),
    /// A type with its own encode/decode pair.
    Custom(CustomType),
}

impl FieldType {
    pub fn optional(inner: FieldType) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn sequence_of(element: FieldType) -> Self {
        Self::Sequence(Some(Box::new(element)))
    }

    pub fn mapping_of(value: FieldType) -> Self {
        Self::Mapping(Some(Box::new(value)))
    }

    pub fn custom<C: CustomCodec>() -> Self {
        Self::Custom(CustomType::of::<C>())
    }

    /// Strips one `Optional` layer.
    pub fn non_null(&self) -> &FieldType {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }

    /// True if date/time values can appear under this type, directly or as
    /// elements of its containers.
    pub fn holds_datetime(&self) -> bool {
        match self {
            Self::DateTime => true,
            Self::Optional(inner) => inner.holds_datetime(),
            Self::Sequence(Some(inner)) | Self::Mapping(Some(inner)) => inner.holds_datetime(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::DateTime => f.write_str("datetime"),
            Self::Record(record) => write!(f, "record<{}>", record.short_name()),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::Sequence(Some(inner)) => write!(f, "sequence<{inner}>"),
            Self::Sequence(None) => f.write_str("sequence"),
            Self::Mapping(Some(inner)) => write!(f, "mapping<string, {inner}>"),
            Self::Mapping(None) => f.write_str("mapping"),
            Self::Custom(custom) => write!(f, "custom<{}>", custom.short_name()),
        }
    }
}

/// The kind of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Bool,
    /// Any tree value, kept unchanged.
    Any,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Any => "any",
        })
    }
}

/// A reference to a nested record type.
///
/// The schema is resolved on use, so record types may refer to each other
/// (or to themselves) without initialising schemas during construction.
#[derive(Clone, Copy)]
pub struct RecordType {
    type_name: &'static str,
    schema: fn() -> &'static RecordSchema,
}

impl RecordType {
    pub fn of<R: Record>() -> Self {
        Self {
            type_name: std::any::type_name::<R>(),
            schema: R::schema,
        }
    }

    pub fn schema(&self) -> &'static RecordSchema {
        (self.schema)()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.type_name).finish()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

/// A type that decodes itself from the generic tree.
#[derive(Clone, Copy)]
pub struct CustomType {
    type_name: &'static str,
    decode: fn(&Value) -> CodecResult<Datum>,
    empty: fn() -> Option<Datum>,
}

impl CustomType {
    pub fn of<C: CustomCodec>() -> Self {
        Self {
            type_name: std::any::type_name::<C>(),
            decode: decode_erased::<C>,
            empty: empty_erased::<C>,
        }
    }

    /// Runs the type's own decoder on a non-null value.
    pub fn decode(&self, value: &Value) -> CodecResult<Datum> {
        (self.decode)(value)
    }

    /// The type's zero-argument value, if it has one.
    pub fn empty(&self) -> Option<Datum> {
        (self.empty)()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomType").field(&self.type_name).finish()
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

fn short_type_name(type_name: &'static str) -> &'static str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// Serializable view of a [`RecordSchema`], e.g. for `chronicle schema`.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummary {
    pub record: &'static str,
    pub output_timezone: String,
    pub input_naive_timezone: String,
    pub fields: Vec<FieldSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub name: &'static str,
    pub field_type: String,
    pub default: FieldDefault,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input_formats: Vec<String>,
}
