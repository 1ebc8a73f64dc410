//! Conversion between typed records and the generic tree.
//!
//! The tree is [`serde_json::Value`]. Conversion is driven entirely by each
//! record's [`RecordSchema`](chronicle_model::RecordSchema):
//! - [`encode`] / [`encode_fields`]: record to tree, with date/times rendered
//!   in the record's output zone and format
//! - [`decode`] / [`decode_fields`]: tree to record, with null coalescing and
//!   ordered date/time format fallback
//! - [`RecordCodec`]: the same operations as methods on every record type
//!
//! Both directions are synchronous and keep no state between calls.

mod datetime;
mod decode;
mod encode;

pub use chronicle_model::{CodecError, CodecResult};
pub use datetime::{format_timestamp, parse_timestamp};
pub use decode::{decode, decode_fields};
pub use encode::{encode, encode_fields};

use chronicle_model::Record;
use serde_json::Value;

/// Tree conversion as methods on any [`Record`].
pub trait RecordCodec: Record {
    fn to_tree(&self) -> CodecResult<Value> {
        encode(self)
    }

    fn from_tree(value: &Value) -> CodecResult<Self> {
        decode(value)
    }
}

impl<R: Record> RecordCodec for R {}
