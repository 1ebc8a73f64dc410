//! Core type definitions for Chronicle.
//!
//! This crate defines the plain value types shared by the model layer and
//! the codec engine:
//! - [`Timestamp`]: a date/time that may or may not carry an offset
//! - [`localize`]: attaching an IANA zone to a wall-clock time
//!
//! Everything that knows about records, descriptors or the generic tree
//! lives in `chronicle-model` and `chronicle-codec`.

mod timestamp;

pub use chrono_tz::Tz;
pub use timestamp::{DEFAULT_TIMEZONE, Timestamp, localize};
