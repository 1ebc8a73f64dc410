use crate::error::CodecResult;
use crate::{Datum, FieldDescriptor};
use serde_json::Value;

/// What a hook decided for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOverride<T> {
    /// Let the codec handle the field as declared.
    Defer,
    /// Use this value as-is; the codec does not look inside it.
    Replace(T),
    /// Treat the field as holding nothing (null).
    Absent,
}

/// Per-field overrides for one record type.
///
/// Most records do not need this; the codec derives everything from the
/// field descriptors. Hooks are consulted once per top-level field, before
/// any type-directed conversion, and are never called for container elements.
pub trait FieldHooks: Send + Sync {
    /// Called before encoding `field`, with the record's current value for it.
    fn encode_field(&self, field: &FieldDescriptor, value: &Datum) -> CodecResult<FieldOverride<Value>> {
        let _ = (field, value);
        Ok(FieldOverride::Defer)
    }

    /// Called before decoding `field` from the raw tree value. Not called for
    /// keys the input leaves out.
    fn decode_field(&self, field: &FieldDescriptor, raw: &Value) -> CodecResult<FieldOverride<Datum>> {
        let _ = (field, raw);
        Ok(FieldOverride::Defer)
    }
}
