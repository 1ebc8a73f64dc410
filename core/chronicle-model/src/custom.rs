use crate::Datum;
use crate::error::CodecResult;
use serde_json::Value;

/// A field type that knows how to convert itself to and from the generic tree.
///
/// The codec hands the raw tree value to [`CustomCodec::decode`] and leaves the
/// value's interior alone. Nulls never reach `decode`: a null input becomes
/// [`CustomCodec::empty`], or is rejected when the type has no empty value.
pub trait CustomCodec: Sized + Send + Sync + 'static {
    fn encode(&self) -> Value;

    fn decode(value: &Value) -> CodecResult<Self>;

    /// The value built from no input, used when the tree holds null.
    fn empty() -> Option<Self> {
        None
    }
}

pub(crate) fn decode_erased<C: CustomCodec>(value: &Value) -> CodecResult<Datum> {
    C::decode(value).map(Datum::custom)
}

pub(crate) fn empty_erased<C: CustomCodec>() -> Option<Datum> {
    C::empty().map(Datum::custom)
}
