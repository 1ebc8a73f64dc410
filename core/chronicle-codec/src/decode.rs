use crate::datetime::parse_timestamp;
use chronicle_model::{
    CodecError, CodecResult, Datum, FieldDescriptor, FieldOverride, FieldType, FieldValues,
    FormatConfig, Record, RecordDatum, RecordSchema, json_kind,
};
use serde_json::Value;
use tracing::debug;

/// Decodes an object into a record of type `R`.
pub fn decode<R: Record>(value: &Value) -> CodecResult<R> {
    R::from_fields(decode_fields(R::schema(), value)?)
}

/// Decodes an object against `schema`.
///
/// Fields left out of the input are omitted from the result when they have a
/// default, so the record's own default applies; otherwise they are decoded
/// from null. Keys the schema does not declare are ignored.
pub fn decode_fields(schema: &'static RecordSchema, value: &Value) -> CodecResult<FieldValues> {
    let Value::Object(map) = value else {
        return Err(CodecError::shape(
            format!("object for {}", schema.name()),
            json_kind(value),
        ));
    };

    for key in map.keys().filter(|key| schema.field(key).is_none()) {
        debug!("Ignoring unknown key '{}' for {}", key, schema.name());
    }

    let mut fields = FieldValues::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let datum = match map.get(field.name()) {
            Some(raw) => decode_field(schema, field, raw)?,
            None if field.has_default() => continue,
            None => decode_value(schema.formats(), field.name(), field.field_type(), &Value::Null)
                .map_err(|e| e.in_field(field.name()))?,
        };
        fields.insert(field.name(), datum);
    }
    Ok(fields)
}

fn decode_field(schema: &RecordSchema, field: &FieldDescriptor, raw: &Value) -> CodecResult<Datum> {
    let formats = schema.formats();
    let decoded = match schema.hooks() {
        Some(hooks) => match hooks.decode_field(field, raw) {
            Ok(FieldOverride::Replace(datum)) => Ok(datum),
            Ok(FieldOverride::Absent) => {
                decode_value(formats, field.name(), field.field_type(), &Value::Null)
            }
            Ok(FieldOverride::Defer) => decode_value(formats, field.name(), field.field_type(), raw),
            Err(e) => Err(e),
        },
        None => decode_value(formats, field.name(), field.field_type(), raw),
    };
    decoded.map_err(|e| e.in_field(field.name()))
}

fn decode_value(
    formats: &FormatConfig,
    field: &str,
    field_type: &FieldType,
    raw: &Value,
) -> CodecResult<Datum> {
    if raw.is_null() {
        return Ok(coalesce_null(field, field_type));
    }

    match field_type {
        FieldType::Custom(custom) => custom.decode(raw),
        FieldType::Optional(inner) => decode_value(formats, field, inner, raw),
        FieldType::DateTime => match raw {
            Value::String(text) => parse_timestamp(formats, field, text).map(Datum::DateTime),
            other => Err(CodecError::DateTimeParse {
                field: field.to_string(),
                value: other.to_string(),
            }),
        },
        FieldType::Record(record) => {
            if !raw.is_object() {
                return Err(CodecError::shape(
                    format!("object for {}", record.schema().name()),
                    json_kind(raw),
                ));
            }
            let schema = record.schema();
            decode_fields(schema, raw).map(|fields| Datum::Record(RecordDatum::new(schema, fields)))
        }
        FieldType::Sequence(element) => {
            let Value::Array(items) = raw else {
                return Err(CodecError::shape("array", json_kind(raw)));
            };
            match element {
                Some(element) => items
                    .iter()
                    .map(|item| decode_value(formats, field, element, item))
                    .collect::<CodecResult<Vec<_>>>()
                    .map(Datum::Sequence),
                None => Ok(Datum::Scalar(raw.clone())),
            }
        }
        FieldType::Mapping(value_type) => {
            let Value::Object(map) = raw else {
                return Err(CodecError::shape("object", json_kind(raw)));
            };
            match value_type {
                Some(value_type) => map
                    .iter()
                    .map(|(key, item)| Ok((key.clone(), decode_value(formats, field, value_type, item)?)))
                    .collect::<CodecResult<Vec<_>>>()
                    .map(Datum::Mapping),
                None => Ok(Datum::Scalar(raw.clone())),
            }
        }
        FieldType::Scalar(_) => Ok(Datum::Scalar(raw.clone())),
    }
}

/// What a null input becomes for `field_type`.
///
/// Record types whose fields all have defaults become an empty record, and
/// custom types with an empty value become that value. Everything else stays null.
fn coalesce_null(field: &str, field_type: &FieldType) -> Datum {
    match field_type {
        FieldType::Record(record) if record.schema().is_default_constructible() => {
            debug!("Null for '{}' coalesced to empty {}", field, record.schema().name());
            Datum::Record(RecordDatum::empty(record.schema()))
        }
        FieldType::Custom(custom) => match custom.empty() {
            Some(datum) => {
                debug!("Null for '{}' coalesced to empty {}", field, custom.type_name());
                datum
            }
            None => Datum::Null,
        },
        _ => Datum::Null,
    }
}
