use crate::error::{CodecError, CodecResult};
use crate::schema::{FieldType, RecordSchema, RecordType};
use crate::{Datum, Field, FieldValues, RecordDatum};

/// A typed record the codec can map to and from the generic tree.
///
/// Implementors describe their fields once, in a [`RecordSchema`] kept in a
/// `static`, and move field values in and out through [`FieldValues`]:
///
/// ```ignore
/// impl Record for Point {
///     fn schema() -> &'static RecordSchema {
///         static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
///         SCHEMA.get_or_init(|| {
///             RecordSchema::builder("Point")
///                 .field(FieldDescriptor::required::<i64>("x"))
///                 .field(FieldDescriptor::defaulted::<i64>("y"))
///                 .build()
///         })
///     }
///
///     fn to_fields(&self) -> FieldValues {
///         FieldValues::new().with("x", &self.x).with("y", &self.y)
///     }
///
///     fn from_fields(mut fields: FieldValues) -> CodecResult<Self> {
///         Ok(Self { x: fields.take("x")?, y: fields.take_or_default("y")? })
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    fn schema() -> &'static RecordSchema;

    /// Every declared field's current value.
    fn to_fields(&self) -> FieldValues;

    /// Builds an instance from decoded values. Fields missing from `fields`
    /// take their defaults.
    fn from_fields(fields: FieldValues) -> CodecResult<Self>;
}

impl<R: Record> Field for R {
    fn field_type() -> FieldType {
        FieldType::Record(RecordType::of::<R>())
    }

    fn to_datum(&self) -> Datum {
        Datum::Record(RecordDatum::new(R::schema(), self.to_fields()))
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match datum {
            Datum::Record(record) if std::ptr::eq(record.schema(), R::schema()) => {
                R::from_fields(record.into_fields())
            }
            Datum::Record(record) => Err(CodecError::unsupported(format!(
                "expected record {}, found record {}",
                R::schema().name(),
                record.schema().name()
            ))),
            other => Err(CodecError::shape(
                format!("record {}", R::schema().name()),
                other.kind(),
            )),
        }
    }
}
