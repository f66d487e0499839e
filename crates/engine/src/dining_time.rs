//! Dining times: free-text reading and the business-hours policy.
//!
//! Canonical form is 24-hour `HH:MM`. Every candidate, including a value
//! that is already canonical, goes through [`parse_time_text`] first so
//! re-validating a confirmed time is a no-op.

use std::sync::LazyLock;

use regex::Regex;
use time::macros::format_description;
use time::{PrimitiveDateTime, Time};

use crate::dining_date;
use crate::outcome::{RejectionKind, ValidationOutcome};
use crate::policy::Policy;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("clock pattern"));

static MERIDIEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm)$").expect("meridiem pattern")
});

static BARE_HOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})$").expect("bare hour pattern"));

/// Read a free-text time into `HH:MM`, without range checks.
///
/// - `7:30`, `19:00` pass through, zero-padded
/// - `7pm`, `7:30 pm`, `12am` are converted from 12-hour form
/// - a bare `1`..`9` is read as an evening hour; other bare numbers are
///   taken literally
pub fn parse_time_text(raw: &str) -> Option<String> {
    let value = raw.trim().to_lowercase();

    if let Some(caps) = CLOCK_RE.captures(&value) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        return Some(format!("{:02}:{:02}", hour, minute));
    }

    if let Some(caps) = MERIDIEM_RE.captures(&value) {
        let mut hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        match &caps[3] {
            "pm" if hour != 12 => hour += 12,
            "am" if hour == 12 => hour = 0,
            _ => {}
        }
        return Some(format!("{:02}:{:02}", hour, minute));
    }

    if let Some(caps) = BARE_HOUR_RE.captures(&value) {
        let mut hour: u32 = caps[1].parse().ok()?;
        if (1..=9).contains(&hour) {
            hour += 12;
        }
        return Some(format!("{:02}:00", hour));
    }

    None
}

/// Apply the time policy to a canonical `HH:MM` value.
///
/// `confirmed_date` is the already-confirmed dining date, if any. When it
/// is today (in the reference zone, per `now`) the time must be later than
/// the current minute. A date that does not parse skips that check.
pub fn validate_time(
    canonical: &str,
    policy: &Policy,
    confirmed_date: Option<&str>,
    now: PrimitiveDateTime,
) -> ValidationOutcome {
    let value = canonical.trim();
    let Some((hour, minute)) = split_clock(value) else {
        return ValidationOutcome::invalid(
            RejectionKind::Syntax,
            format!("Sorry, '{}' is not a valid time.", value),
        );
    };

    if policy.closed_hours.contains(hour) {
        return ValidationOutcome::invalid(
            RejectionKind::Domain,
            format!(
                "Sorry, I can't make reservations between {} and {}. Please enter a valid dining time.",
                hour_label(policy.closed_hours.start),
                hour_label(policy.closed_hours.end)
            ),
        );
    }

    let same_day = confirmed_date
        .and_then(dining_date::parse_iso)
        .is_some_and(|date| date == now.date());
    if same_day && (hour, minute) <= (now.hour(), now.minute()) {
        return ValidationOutcome::invalid(
            RejectionKind::Past,
            "Sorry, that time has already passed today. Please enter a future time.",
        );
    }

    ValidationOutcome::valid(format!("{:02}:{:02}", hour, minute))
}

/// Read and validate a time, preferring the extracted slot value.
pub fn resolve_time(
    slot: Option<&str>,
    utterance: &str,
    policy: &Policy,
    confirmed_date: Option<&str>,
    now: PrimitiveDateTime,
) -> ValidationOutcome {
    let candidate = slot
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| utterance.trim());

    match parse_time_text(candidate) {
        Some(canonical) => validate_time(&canonical, policy, confirmed_date, now),
        None => ValidationOutcome::invalid(
            RejectionKind::Syntax,
            format!(
                "Sorry, '{}' is not a valid time. Please enter a valid time.",
                candidate
            ),
        ),
    }
}

/// `19:00` as `07:00 PM`. Values that are not canonical are returned as is.
pub fn format_12_hour(canonical: &str) -> String {
    split_clock(canonical)
        .and_then(|(hour, minute)| Time::from_hms(hour, minute, 0).ok())
        .and_then(|t| {
            t.format(format_description!("[hour repr:12]:[minute] [period]"))
                .ok()
        })
        .unwrap_or_else(|| canonical.to_string())
}

fn split_clock(value: &str) -> Option<(u8, u8)> {
    let (hour, minute) = value.split_once(':')?;
    let hour: u8 = hour.parse().ok()?;
    let minute: u8 = minute.parse().ok()?;
    (hour <= 23 && minute <= 59).then_some((hour, minute))
}

fn hour_label(hour: u8) -> String {
    match hour % 24 {
        0 => "12 AM".to_string(),
        h @ 1..=11 => format!("{} AM", h),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}
