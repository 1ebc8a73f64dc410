use crate::datetime::format_timestamp;
use chronicle_model::{
    CodecError, CodecResult, Datum, FieldDescriptor, FieldOverride, FieldValues, FormatConfig, Record,
    RecordSchema,
};
use serde_json::{Map, Value};

/// Encodes a record into an object keyed by field name, in declaration order.
pub fn encode<R: Record>(record: &R) -> CodecResult<Value> {
    encode_fields(R::schema(), &record.to_fields())
}

/// Encodes field values against `schema`. Declared fields with no value
/// encode as null; values for undeclared names are not emitted.
pub fn encode_fields(schema: &RecordSchema, fields: &FieldValues) -> CodecResult<Value> {
    let mut out = Map::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let value = match fields.get(field.name()) {
            Some(datum) => encode_field(schema, field, datum)?,
            None => Value::Null,
        };
        out.insert(field.name().to_string(), value);
    }
    Ok(Value::Object(out))
}

fn encode_field(schema: &RecordSchema, field: &FieldDescriptor, datum: &Datum) -> CodecResult<Value> {
    if let Some(hooks) = schema.hooks() {
        match hooks
            .encode_field(field, datum)
            .map_err(|e| e.in_field(field.name()))?
        {
            FieldOverride::Replace(value) => return Ok(value),
            FieldOverride::Absent => return Ok(Value::Null),
            FieldOverride::Defer => {}
        }
    }
    encode_datum(schema.formats(), field.name(), datum).map_err(|e| e.in_field(field.name()))
}

/// Container elements share the owning field's formats; nested records
/// switch to their own schema.
fn encode_datum(formats: &FormatConfig, field: &str, datum: &Datum) -> CodecResult<Value> {
    match datum {
        Datum::Null => Ok(Value::Null),
        Datum::Scalar(value) => Ok(value.clone()),
        Datum::DateTime(ts) => format_timestamp(formats, field, *ts).map(Value::String),
        Datum::Record(record) => encode_fields(record.schema(), record.fields()),
        Datum::Sequence(items) => items
            .iter()
            .map(|item| encode_datum(formats, field, item))
            .collect::<CodecResult<Vec<_>>>()
            .map(Value::Array),
        Datum::Mapping(entries) => entries
            .iter()
            .map(|(key, item)| Ok((key.clone(), encode_datum(formats, field, item)?)))
            .collect::<CodecResult<Map<_, _>>>()
            .map(Value::Object),
        Datum::Custom(custom) => custom.encode(),
        Datum::Unrepresentable(detail) => Err(CodecError::unsupported(detail.clone())),
    }
}
