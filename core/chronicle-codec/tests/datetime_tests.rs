use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use chronicle_codec::{format_timestamp, parse_timestamp};
use chronicle_model::{CodecError, FormatConfig};
use chronicle_types::Timestamp;

fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn zoned(ts: Timestamp) -> DateTime<chrono::FixedOffset> {
    match ts {
        Timestamp::Zoned(dt) => dt,
        Timestamp::Naive(n) => panic!("expected zoned value, got {n}"),
    }
}

// ── Parse fallback order ─────────────────────────────────────────

#[test]
fn configured_input_formats_are_tried_in_order() {
    let formats = FormatConfig::new().with_input_formats("at", ["%d-%m-%Y", "%Y-%m-%d"]);
    let dt = zoned(parse_timestamp(&formats, "at", "01-02-2024").unwrap());
    assert_eq!(dt.naive_local(), naive(2024, 2, 1, 0, 0, 0));
}

#[test]
fn output_format_is_tried_after_input_formats() {
    let formats = FormatConfig::new()
        .with_input_formats("at", ["%Y"])
        .with_output_format("at", "%d/%m/%Y %H.%M");
    let dt = zoned(parse_timestamp(&formats, "at", "05/03/2024 14.45").unwrap());
    assert_eq!(dt.naive_local(), naive(2024, 3, 5, 14, 45, 0));
}

#[test]
fn formats_of_other_fields_are_not_used() {
    let formats = FormatConfig::new().with_input_formats("other", ["%d/%m/%Y"]);
    assert!(parse_timestamp(&formats, "at", "05/03/2024").is_err());
}

#[test]
fn iso_with_offset_keeps_its_offset() {
    let dt = zoned(parse_timestamp(&FormatConfig::default(), "at", "2024-02-01T10:00:00-05:00").unwrap());
    assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
    assert_eq!(dt.hour(), 10);
}

#[test]
fn iso_variants_are_accepted() {
    let formats = FormatConfig::default();
    for raw in [
        "2024-02-01T10:00:00",
        "2024-02-01T10:00:00.250",
        "2024-02-01 10:00",
        "2024-02-01T10:00",
        "2024-02-01T10:00:00Z",
        "2024-02-01T10:00+01:00",
        "2024-02-01 10:00+01:00",
        "2024-02-01T10:00:00+01",
        "2024-02-01T10",
        "2024-02-01",
    ] {
        assert!(parse_timestamp(&formats, "at", raw).is_ok(), "{raw} should parse");
    }
}

#[test]
fn iso_offset_without_seconds_is_kept() {
    let dt = zoned(parse_timestamp(&FormatConfig::default(), "at", "2024-07-02T10:00+01:00").unwrap());
    assert_eq!(dt.offset().local_minus_utc(), 3600);
    assert_eq!(dt.naive_local(), naive(2024, 7, 2, 10, 0, 0));
}

#[test]
fn iso_hour_only_offset_is_accepted() {
    let dt = zoned(parse_timestamp(&FormatConfig::default(), "at", "2024-07-02T10:00:00-05").unwrap());
    assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
    assert_eq!(dt.hour(), 10);
}

#[test]
fn iso_hour_only_time_gets_naive_zone() {
    let dt = zoned(parse_timestamp(&FormatConfig::default(), "at", "2024-02-01T10").unwrap());
    assert_eq!(dt.naive_local(), naive(2024, 2, 1, 10, 0, 0));
    assert_eq!(dt.offset().local_minus_utc(), 3600);
}

#[test]
fn day_first_fallback_with_time() {
    let dt = zoned(parse_timestamp(&FormatConfig::default(), "at", "01-02-2024 13:14:15").unwrap());
    assert_eq!(dt.naive_local(), naive(2024, 2, 1, 13, 14, 15));
}

#[test]
fn unparseable_text_names_field_and_value() {
    let err = parse_timestamp(&FormatConfig::default(), "created_at", "not-a-date").unwrap_err();
    assert_eq!(
        err,
        CodecError::DateTimeParse {
            field: "created_at".into(),
            value: "not-a-date".into(),
        }
    );
}

#[test]
fn trailing_text_does_not_match_a_format() {
    let formats = FormatConfig::new().with_input_formats("at", ["%Y-%m-%d"]);
    assert!(parse_timestamp(&formats, "at", "2024-02-01 garbage").is_err());
}

// ── Timezone attachment ──────────────────────────────────────────

#[test]
fn naive_input_gets_input_naive_timezone() {
    let formats = FormatConfig::new().with_input_naive_timezone(chrono_tz::America::New_York);
    let dt = zoned(parse_timestamp(&formats, "at", "2024-02-01 10:00:00").unwrap());
    assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
}

#[test]
fn naive_input_defaults_to_amsterdam() {
    let dt = zoned(parse_timestamp(&FormatConfig::default(), "at", "2024-07-01 10:00:00").unwrap());
    assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
}

#[test]
fn decode_and_encode_use_different_zones() {
    let formats = FormatConfig::new()
        .with_input_naive_timezone(chrono_tz::UTC)
        .with_output_timezone(chrono_tz::Europe::Amsterdam);
    let ts = parse_timestamp(&formats, "at", "2024-02-01 10:00:00").unwrap();
    assert_eq!(
        format_timestamp(&formats, "at", ts).unwrap(),
        "2024-02-01T11:00:00+01:00"
    );
}

// ── Rendering ────────────────────────────────────────────────────

#[test]
fn naive_value_is_wall_clock_in_output_zone() {
    let formats = FormatConfig::new().with_output_timezone(chrono_tz::Europe::London);
    let out = format_timestamp(&formats, "at", Timestamp::Naive(naive(2024, 7, 1, 9, 0, 0))).unwrap();
    assert_eq!(out, "2024-07-01T09:00:00+01:00");
}

#[test]
fn zoned_value_is_converted_to_output_zone() {
    let dt = DateTime::parse_from_rfc3339("2024-02-01T09:00:00+00:00").unwrap();
    let out = format_timestamp(&FormatConfig::default(), "at", Timestamp::Zoned(dt)).unwrap();
    assert_eq!(out, "2024-02-01T10:00:00+01:00");
}

#[test]
fn output_format_is_applied() {
    let formats = FormatConfig::new().with_output_format("at", "%d-%m-%Y %H:%M");
    let dt = DateTime::parse_from_rfc3339("2024-02-01T09:30:00+00:00").unwrap();
    assert_eq!(
        format_timestamp(&formats, "at", Timestamp::Zoned(dt)).unwrap(),
        "01-02-2024 10:30"
    );
}

#[test]
fn invalid_output_format_is_reported() {
    let formats = FormatConfig::new().with_output_format("at", "%Q");
    let err = format_timestamp(&formats, "at", Timestamp::Naive(naive(2024, 1, 1, 0, 0, 0))).unwrap_err();
    assert!(matches!(err, CodecError::InvalidFormat { .. }));
}

#[test]
fn formatted_value_parses_back_with_same_config() {
    let formats = FormatConfig::new().with_output_format("at", "%d-%m-%Y %H:%M");
    let original = Timestamp::Naive(naive(2024, 11, 3, 8, 15, 0));
    let text = format_timestamp(&formats, "at", original).unwrap();
    let back = zoned(parse_timestamp(&formats, "at", &text).unwrap());
    assert_eq!(back.naive_local(), naive(2024, 11, 3, 8, 15, 0));
}
