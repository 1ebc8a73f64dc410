//! Date/time parsing and rendering for record fields.
//!
//! Decoding tries, in order, the field's input formats, its output format,
//! ISO-8601, and finally two fixed fallbacks. Whatever matches first wins.

use chronicle_model::{CodecError, CodecResult, FormatConfig, is_valid_format};
use chronicle_types::Timestamp;
use chrono::format::{ParseErrorKind, Parsed, StrftimeItems};
use chrono::{DateTime, TimeZone};
use std::fmt::Write;
use tracing::trace;

/// Tried last, after every configured format and ISO-8601.
const FALLBACK_FORMATS: [&str; 2] = ["%d-%m-%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// ISO-8601 forms beyond RFC 3339, most specific first. `%#z` also takes
/// offsets written as `+HH`.
const ISO_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H",
    "%Y-%m-%d",
];

/// Parses `raw` for `field` using the owning record's formats.
///
/// The result always carries an offset: values written without one are
/// placed in the record's input naive timezone.
pub fn parse_timestamp(formats: &FormatConfig, field: &str, raw: &str) -> CodecResult<Timestamp> {
    let mut configured = formats
        .input_formats(field)
        .iter()
        .map(String::as_str)
        .chain(formats.output_format(field));

    let parsed = configured
        .find_map(|format| parse_with(format, raw).map(|ts| (format, ts)))
        .or_else(|| parse_iso(raw).map(|ts| ("ISO-8601", ts)))
        .or_else(|| {
            FALLBACK_FORMATS
                .iter()
                .find_map(|format| parse_with(format, raw).map(|ts| (*format, ts)))
        });

    match parsed {
        Some((format, ts)) => {
            trace!("Parsed '{}' for field '{}' with {}", raw, field, format);
            Ok(Timestamp::Zoned(ts.or_in_zone(formats.input_naive_timezone())))
        }
        None => Err(CodecError::DateTimeParse {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Renders `ts` for `field` in the record's output timezone.
///
/// A naive value is taken as wall-clock time in that zone. Without an
/// output format for the field the result is RFC 3339.
pub fn format_timestamp(formats: &FormatConfig, field: &str, ts: Timestamp) -> CodecResult<String> {
    let local = ts.in_zone(formats.output_timezone());
    let Some(format) = formats.output_format(field) else {
        return Ok(local.to_rfc3339());
    };

    let invalid = || CodecError::InvalidFormat {
        field: field.to_string(),
        format: format.to_string(),
    };
    if !is_valid_format(format) {
        return Err(invalid());
    }
    let mut out = String::new();
    write!(out, "{}", local.format(format)).map_err(|_| invalid())?;
    Ok(out)
}

/// Parses with a strftime format. Time components the format leaves out
/// default to zero, so date-only formats yield midnight.
fn parse_with(format: &str, raw: &str) -> Option<Timestamp> {
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, raw, StrftimeItems::new(format)).ok()?;
    let date = parsed.to_naive_date().ok()?;

    if matches!(parsed.to_naive_time(), Err(e) if e.kind() == ParseErrorKind::NotEnough) {
        // Setters fail without effect when the component is already set.
        let _ = parsed.set_hour(0);
        let _ = parsed.set_minute(0);
    }
    let naive = date.and_time(parsed.to_naive_time().ok()?);

    match parsed.to_fixed_offset() {
        Ok(offset) => offset.from_local_datetime(&naive).single().map(Timestamp::Zoned),
        Err(_) => Some(Timestamp::Naive(naive)),
    }
}

fn parse_iso(raw: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Timestamp::Zoned(dt));
    }
    ISO_FORMATS.iter().find_map(|format| parse_with(format, raw))
}
