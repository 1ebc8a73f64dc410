//! Date/time values as they travel between records and the generic tree.
//!
//! A value read from text may or may not carry an offset. Rather than force
//! one representation, [`Timestamp`] keeps the distinction so the codec can
//! apply the owning record's zone rules:
//! - `Naive`: wall-clock time with no zone information
//! - `Zoned`: an instant with a fixed UTC offset

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone used for naive values when a record does not configure one.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Amsterdam;

/// A date/time that may or may not carry zone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timestamp {
    /// Wall-clock time without an offset.
    Naive(NaiveDateTime),
    /// An instant with a fixed UTC offset.
    Zoned(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Returns true if this value carries no zone information.
    #[must_use]
    pub const fn is_naive(&self) -> bool {
        matches!(self, Self::Naive(_))
    }

    /// Returns the zoned value, attaching `zone` first if this value is naive.
    ///
    /// Zoned values keep their own offset.
    #[must_use]
    pub fn or_in_zone(self, zone: Tz) -> DateTime<FixedOffset> {
        match self {
            Self::Naive(naive) => localize(zone, naive).fixed_offset(),
            Self::Zoned(dt) => dt,
        }
    }

    /// Expresses this value in `zone`.
    ///
    /// A naive value is taken as already being wall-clock time in `zone`;
    /// a zoned value is converted.
    #[must_use]
    pub fn in_zone(self, zone: Tz) -> DateTime<Tz> {
        match self {
            Self::Naive(naive) => localize(zone, naive),
            Self::Zoned(dt) => dt.with_timezone(&zone),
        }
    }

    /// Returns the wall-clock component, in whatever offset the value carries.
    #[must_use]
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Self::Naive(naive) => *naive,
            Self::Zoned(dt) => dt.naive_local(),
        }
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Naive(naive)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Zoned(dt)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Zoned(dt.fixed_offset())
    }
}

impl From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Zoned(dt.fixed_offset())
    }
}

/// Attaches `zone` to a wall-clock time.
///
/// Ambiguous times (the repeated hour when clocks go back) resolve to the
/// earlier instant. Times inside a gap (clocks go forward) keep the offset
/// that was in force before the transition, so `02:30` on the spring-forward
/// night in Amsterdam becomes `03:30+02:00`.
#[must_use]
pub fn localize(zone: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = zone.offset_from_utc_datetime(&(naive - TimeDelta::days(1)));
            let utc = naive - TimeDelta::seconds(i64::from(before.fix().local_minus_utc()));
            zone.from_utc_datetime(&utc)
        }
    }
}
