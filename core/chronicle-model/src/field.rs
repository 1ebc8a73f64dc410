use crate::error::{CodecError, CodecResult};
use crate::schema::{FieldType, ScalarKind};
use crate::{Datum, json_kind};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chronicle_types::Timestamp;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// A Rust type that can be the type of a record field.
///
/// Each implementation states its declared [`FieldType`] and converts between
/// itself and a [`Datum`]. Record types get an implementation for free through
/// [`crate::Record`].
pub trait Field: Sized {
    fn field_type() -> FieldType;

    fn to_datum(&self) -> Datum;

    /// Errors from this call leave the field name empty; callers attach it.
    fn from_datum(datum: Datum) -> CodecResult<Self>;
}

fn expect_scalar(datum: Datum, expected: &str) -> CodecResult<Value> {
    match datum {
        Datum::Null => Err(CodecError::shape(expected, "null")),
        Datum::Scalar(value) => Ok(value),
        other => Err(CodecError::unsupported(format!(
            "cannot convert {} into {expected}",
            other.kind()
        ))),
    }
}

impl Field for String {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::String)
    }

    fn to_datum(&self) -> Datum {
        Datum::Scalar(Value::String(self.clone()))
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match expect_scalar(datum, "string")? {
            Value::String(s) => Ok(s),
            other => Err(CodecError::shape("string", json_kind(&other))),
        }
    }
}

impl Field for bool {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::Bool)
    }

    fn to_datum(&self) -> Datum {
        Datum::Scalar(Value::Bool(*self))
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match expect_scalar(datum, "bool")? {
            Value::Bool(b) => Ok(b),
            other => Err(CodecError::shape("bool", json_kind(&other))),
        }
    }
}

impl Field for f64 {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::Float)
    }

    /// Non-finite values have no tree form; encoding them fails.
    fn to_datum(&self) -> Datum {
        match Number::from_f64(*self) {
            Some(n) => Datum::Scalar(Value::Number(n)),
            None => Datum::Unrepresentable(format!("non-finite float {self}")),
        }
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match expect_scalar(datum, "float")? {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| CodecError::shape("float", n.to_string())),
            other => Err(CodecError::shape("float", json_kind(&other))),
        }
    }
}

macro_rules! integer_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn field_type() -> FieldType {
                    FieldType::Scalar(ScalarKind::Integer)
                }

                fn to_datum(&self) -> Datum {
                    Datum::Scalar(Value::from(*self))
                }

                fn from_datum(datum: Datum) -> CodecResult<Self> {
                    match expect_scalar(datum, "integer")? {
                        Value::Number(n) => n
                            .as_i64()
                            .and_then(|i| <$ty>::try_from(i).ok())
                            .or_else(|| n.as_u64().and_then(|u| <$ty>::try_from(u).ok()))
                            .ok_or_else(|| CodecError::shape(stringify!($ty), n.to_string())),
                        other => Err(CodecError::shape("integer", json_kind(&other))),
                    }
                }
            }
        )*
    };
}

integer_field!(i32, i64, u32, u64, usize);

/// Any tree value, passed through untouched. JSON null is a value here.
impl Field for Value {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::Any)
    }

    fn to_datum(&self) -> Datum {
        Datum::Scalar(self.clone())
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match datum {
            Datum::Null => Ok(Value::Null),
            Datum::Scalar(value) => Ok(value),
            other => Err(CodecError::unsupported(format!(
                "cannot convert {} into a tree value",
                other.kind()
            ))),
        }
    }
}

/// An untyped mapping; values pass through unchanged.
impl Field for Map<String, Value> {
    fn field_type() -> FieldType {
        FieldType::Mapping(None)
    }

    fn to_datum(&self) -> Datum {
        Datum::Mapping(
            self.iter()
                .map(|(k, v)| (k.clone(), Datum::Scalar(v.clone())))
                .collect(),
        )
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match datum {
            Datum::Null => Err(CodecError::shape("mapping", "null")),
            Datum::Scalar(Value::Object(map)) => Ok(map),
            Datum::Scalar(other) => Err(CodecError::shape("mapping", json_kind(&other))),
            Datum::Mapping(entries) => entries
                .into_iter()
                .map(|(k, v)| Value::from_datum(v).map(|v| (k, v)))
                .collect(),
            other => Err(CodecError::unsupported(format!(
                "cannot convert {} into a mapping",
                other.kind()
            ))),
        }
    }
}

impl Field for Timestamp {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }

    fn to_datum(&self) -> Datum {
        Datum::DateTime(*self)
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match datum {
            Datum::DateTime(ts) => Ok(ts),
            Datum::Null => Err(CodecError::shape("datetime", "null")),
            Datum::Scalar(value) => Err(CodecError::shape("datetime", json_kind(&value))),
            other => Err(CodecError::unsupported(format!(
                "cannot convert {} into a datetime",
                other.kind()
            ))),
        }
    }
}

/// Decoded values always carry an offset, so this is the usual choice.
impl Field for DateTime<FixedOffset> {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }

    fn to_datum(&self) -> Datum {
        Datum::DateTime(Timestamp::Zoned(*self))
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match Timestamp::from_datum(datum)? {
            Timestamp::Zoned(dt) => Ok(dt),
            Timestamp::Naive(_) => Err(CodecError::shape("zoned datetime", "naive datetime")),
        }
    }
}

impl Field for DateTime<Utc> {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }

    fn to_datum(&self) -> Datum {
        Datum::DateTime(Timestamp::from(*self))
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        DateTime::<FixedOffset>::from_datum(datum).map(|dt| dt.with_timezone(&Utc))
    }
}

/// Wall-clock time. A zoned value keeps its local time and drops the offset.
impl Field for NaiveDateTime {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }

    fn to_datum(&self) -> Datum {
        Datum::DateTime(Timestamp::Naive(*self))
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        Timestamp::from_datum(datum).map(|ts| ts.naive_local())
    }
}

impl<T: Field> Field for Option<T> {
    fn field_type() -> FieldType {
        FieldType::optional(T::field_type())
    }

    fn to_datum(&self) -> Datum {
        match self {
            Some(value) => value.to_datum(),
            None => Datum::Null,
        }
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        if datum.is_null() {
            Ok(None)
        } else {
            T::from_datum(datum).map(Some)
        }
    }
}

impl<T: Field> Field for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::sequence_of(T::field_type())
    }

    fn to_datum(&self) -> Datum {
        Datum::Sequence(self.iter().map(Field::to_datum).collect())
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match datum {
            Datum::Sequence(items) => items.into_iter().map(T::from_datum).collect(),
            Datum::Scalar(Value::Array(items)) => items
                .into_iter()
                .map(|item| T::from_datum(Datum::Scalar(item)))
                .collect(),
            Datum::Null => Err(CodecError::shape("sequence", "null")),
            Datum::Scalar(other) => Err(CodecError::shape("sequence", json_kind(&other))),
            other => Err(CodecError::unsupported(format!(
                "cannot convert {} into a sequence",
                other.kind()
            ))),
        }
    }
}

impl<T: Field> Field for BTreeMap<String, T> {
    fn field_type() -> FieldType {
        FieldType::mapping_of(T::field_type())
    }

    fn to_datum(&self) -> Datum {
        Datum::Mapping(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_datum()))
                .collect(),
        )
    }

    fn from_datum(datum: Datum) -> CodecResult<Self> {
        match datum {
            Datum::Mapping(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_datum(v).map(|v| (k, v)))
                .collect(),
            Datum::Scalar(Value::Object(map)) => map
                .into_iter()
                .map(|(k, v)| T::from_datum(Datum::Scalar(v)).map(|v| (k, v)))
                .collect(),
            Datum::Null => Err(CodecError::shape("mapping", "null")),
            Datum::Scalar(other) => Err(CodecError::shape("mapping", json_kind(&other))),
            other => Err(CodecError::unsupported(format!(
                "cannot convert {} into a mapping",
                other.kind()
            ))),
        }
    }
}
