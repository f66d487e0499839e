//! Reference clock and time zone.
//!
//! "Today" and "now" are always read in one reference zone, never in the
//! host's local zone. The clock is injected so conversations can be
//! replayed against a fixed instant.

use chrono::{DateTime, Offset, TimeZone};
use chrono_tz::Tz;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> OffsetDateTime;
}

/// The host's wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);

impl FixedClock {
    /// Pin the clock to an RFC 3339 timestamp, e.g. `2026-03-01T17:00:00Z`.
    pub fn parse_rfc3339(value: &str) -> Result<Self, time::error::Parse> {
        OffsetDateTime::parse(value, &time::format_description::well_known::Rfc3339).map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.0
    }
}

/// An IANA time zone, resolved through the tz database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone(Tz);

impl ReferenceZone {
    pub const US_EASTERN: ReferenceZone = ReferenceZone(chrono_tz::America::New_York);

    pub fn new(tz: Tz) -> Self {
        ReferenceZone(tz)
    }

    /// Resolve a zone name such as `America/New_York` or `Europe/London`.
    pub fn parse(name: &str) -> Result<Self, String> {
        name.trim()
            .parse::<Tz>()
            .map(ReferenceZone)
            .map_err(|e| e.to_string())
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// The offset in effect at `instant`.
    pub fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        let Some(utc) = DateTime::from_timestamp(instant.unix_timestamp(), 0) else {
            return UtcOffset::UTC;
        };
        let seconds = self
            .0
            .offset_from_utc_datetime(&utc.naive_utc())
            .fix()
            .local_minus_utc();
        UtcOffset::from_whole_seconds(seconds).unwrap_or(UtcOffset::UTC)
    }

    /// Wall-clock date and time at `instant`.
    pub fn local(&self, instant: OffsetDateTime) -> PrimitiveDateTime {
        let local = instant.to_offset(self.offset_at(instant));
        PrimitiveDateTime::new(local.date(), local.time())
    }
}

impl Default for ReferenceZone {
    fn default() -> Self {
        ReferenceZone::US_EASTERN
    }
}
