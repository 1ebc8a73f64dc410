use crate::custom::CustomCodec;
use crate::error::{CodecError, CodecResult};
use crate::{Field, RecordSchema};
use chronicle_types::Timestamp;
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// The typed value of one field, between a record and the generic tree.
///
/// Records hand their fields to the encoder as `Datum`s and are rebuilt from
/// the `Datum`s the decoder produces.
#[derive(Debug)]
pub enum Datum {
    Null,
    /// A string, number, bool, or any untyped tree value.
    Scalar(Value),
    DateTime(Timestamp),
    Record(RecordDatum),
    Sequence(Vec<Datum>),
    /// Entries in their original order; keys are never transformed.
    Mapping(Vec<(String, Datum)>),
    Custom(CustomValue),
    /// A value with no tree form, such as a non-finite float. Encoding it fails.
    Unrepresentable(String),
}

impl Datum {
    pub fn custom<C: CustomCodec>(value: C) -> Self {
        Self::Custom(CustomValue::new(value))
    }

    /// True for `Null` and for a scalar holding JSON null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Scalar(Value::Null))
    }

    /// Short description of this value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(value) => json_kind(value),
            Self::DateTime(_) => "datetime",
            Self::Record(_) => "record",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Custom(_) => "custom value",
            Self::Unrepresentable(_) => "unrepresentable value",
        }
    }

    /// Converts this value into the custom type `C`.
    ///
    /// Raw tree values are run through `C`'s own decoder, so a hook may
    /// hand back either form.
    pub fn into_custom<C: CustomCodec>(self) -> CodecResult<C> {
        match self {
            Self::Custom(value) => value.downcast::<C>().map_err(|value| {
                CodecError::unsupported(format!(
                    "expected {}, found {}",
                    std::any::type_name::<C>(),
                    value.type_name()
                ))
            }),
            Self::Null | Self::Scalar(Value::Null) => {
                C::empty().ok_or_else(|| CodecError::shape(std::any::type_name::<C>(), "null"))
            }
            Self::Scalar(raw) => C::decode(&raw),
            other => Err(CodecError::unsupported(format!(
                "cannot convert {} into {}",
                other.kind(),
                std::any::type_name::<C>()
            ))),
        }
    }
}

/// Describes the shape of a tree value, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A nested record's fields together with the schema that describes them.
pub struct RecordDatum {
    schema: &'static RecordSchema,
    fields: FieldValues,
}

impl RecordDatum {
    pub fn new(schema: &'static RecordSchema, fields: FieldValues) -> Self {
        Self { schema, fields }
    }

    /// A record with no fields set; every field takes its default.
    pub fn empty(schema: &'static RecordSchema) -> Self {
        Self::new(schema, FieldValues::new())
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn into_fields(self) -> FieldValues {
        self.fields
    }
}

impl fmt::Debug for RecordDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDatum")
            .field("schema", &self.schema.name())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Field values of one record, keyed by field name.
///
/// On the encode side a record lists all its fields; on the decode side a
/// field is missing when the input left it out and the field has a default.
#[derive(Debug, Default)]
pub struct FieldValues {
    entries: Vec<(&'static str, Datum)>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Adds `value` under `name`.
    #[must_use]
    pub fn with<T: Field>(mut self, name: &'static str, value: &T) -> Self {
        self.insert(name, value.to_datum());
        self
    }

    /// Sets `name`, replacing any earlier value.
    pub fn insert(&mut self, name: &'static str, datum: Datum) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = datum,
            None => self.entries.push((name, datum)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Datum> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, datum)| datum)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Datum> {
        let index = self.entries.iter().position(|(n, _)| *n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Datum)> {
        self.entries.iter().map(|(name, datum)| (*name, datum))
    }

    /// Removes and converts a field that has no default.
    pub fn take<T: Field>(&mut self, name: &'static str) -> CodecResult<T> {
        match self.remove(name) {
            Some(datum) => T::from_datum(datum).map_err(|e| e.in_field(name)),
            None => Err(CodecError::ShapeMismatch {
                field: name.to_string(),
                expected: T::field_type().to_string(),
                found: "nothing".to_string(),
            }),
        }
    }

    /// Removes and converts a field, falling back to `default` when absent.
    pub fn take_or_else<T: Field>(
        &mut self,
        name: &'static str,
        default: impl FnOnce() -> T,
    ) -> CodecResult<T> {
        match self.remove(name) {
            Some(datum) => T::from_datum(datum).map_err(|e| e.in_field(name)),
            None => Ok(default()),
        }
    }

    /// Removes and converts a field, falling back to `T::default()` when absent.
    pub fn take_or_default<T: Field + Default>(&mut self, name: &'static str) -> CodecResult<T> {
        self.take_or_else(name, T::default)
    }
}

/// A value of a [`CustomCodec`] type with its concrete type erased.
pub struct CustomValue {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    encode: fn(&(dyn Any + Send + Sync)) -> CodecResult<Value>,
}

impl CustomValue {
    pub fn new<C: CustomCodec>(value: C) -> Self {
        Self {
            value: Box::new(value),
            type_name: std::any::type_name::<C>(),
            encode: encode_erased::<C>,
        }
    }

    /// Runs the wrapped type's own encoder.
    pub fn encode(&self) -> CodecResult<Value> {
        (self.encode)(self.value.as_ref())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recovers the concrete value, or gives `self` back if it is not a `C`.
    pub fn downcast<C: CustomCodec>(self) -> Result<C, Self> {
        let Self {
            value,
            type_name,
            encode,
        } = self;
        match value.downcast::<C>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self {
                value,
                type_name,
                encode,
            }),
        }
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomValue").field(&self.type_name).finish()
    }
}

fn encode_erased<C: CustomCodec>(value: &(dyn Any + Send + Sync)) -> CodecResult<Value> {
    value
        .downcast_ref::<C>()
        .map(C::encode)
        .ok_or_else(|| CodecError::unsupported(format!("value is not a {}", std::any::type_name::<C>())))
}
