//! Natural-language dining dates.
//!
//! Relative words are tried first, then ISO dates, then a fixed table of
//! written formats. The first format that consumes the whole input wins.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::parsing::Parsed;
use time::{Date, Duration};

use crate::outcome::{RejectionKind, ValidationOutcome};

/// How a format carries the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearForm {
    /// No year in the input; the current year is assumed.
    Assumed,
    Full,
    /// Two digits: `69..=99` is 19xx, `00..=68` is 20xx.
    LastTwo,
}

type DateFormat = (&'static [BorrowedFormatItem<'static>], YearForm);

const ISO: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month padding:none]-[day padding:none]");

const WRITTEN_FORMATS: &[DateFormat] = &[
    (
        format_description!("[month repr:long case_sensitive:false] [day padding:none]"),
        YearForm::Assumed,
    ),
    (
        format_description!("[month repr:short case_sensitive:false] [day padding:none]"),
        YearForm::Assumed,
    ),
    (
        format_description!("[day padding:none] [month repr:long case_sensitive:false]"),
        YearForm::Assumed,
    ),
    (
        format_description!("[day padding:none] [month repr:short case_sensitive:false]"),
        YearForm::Assumed,
    ),
    (
        format_description!("[month padding:none]/[day padding:none]/[year]"),
        YearForm::Full,
    ),
    (
        format_description!("[month padding:none]/[day padding:none]/[year repr:last_two]"),
        YearForm::LastTwo,
    ),
    (
        format_description!("[month repr:long case_sensitive:false] [day padding:none] [year]"),
        YearForm::Full,
    ),
    (
        format_description!("[month repr:short case_sensitive:false] [day padding:none] [year]"),
        YearForm::Full,
    ),
    (
        format_description!("[day padding:none] [month repr:long case_sensitive:false] [year]"),
        YearForm::Full,
    ),
    (
        format_description!("[day padding:none] [month repr:short case_sensitive:false] [year]"),
        YearForm::Full,
    ),
];

const PAST_PHRASES: &[&str] = &["yesterday", "last week", "last month"];

/// Result of reading a date phrase, before the past-date policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePhrase {
    /// A calendar date. `year_assumed` is set when the input named no year.
    Date { date: Date, year_assumed: bool },
    /// A relative phrase that always lies in the past.
    Past,
    Unrecognized,
}

/// Read a date phrase relative to `today`.
pub fn parse_date(raw: &str, today: Date) -> DatePhrase {
    let value = collapse_whitespace(raw);
    let lower = value.to_lowercase();

    match lower.as_str() {
        "today" => {
            return DatePhrase::Date {
                date: today,
                year_assumed: false,
            }
        }
        "tomorrow" => {
            return match today.checked_add(Duration::days(1)) {
                Some(date) => DatePhrase::Date {
                    date,
                    year_assumed: false,
                },
                None => DatePhrase::Unrecognized,
            }
        }
        _ => {}
    }
    if PAST_PHRASES.contains(&lower.as_str()) {
        return DatePhrase::Past;
    }

    if let Some(date) = parse_with(&value, ISO, YearForm::Full, today) {
        return DatePhrase::Date {
            date,
            year_assumed: false,
        };
    }

    WRITTEN_FORMATS
        .iter()
        .find_map(|(items, form)| {
            parse_with(&value, items, *form, today).map(|date| DatePhrase::Date {
                date,
                year_assumed: *form == YearForm::Assumed,
            })
        })
        .unwrap_or(DatePhrase::Unrecognized)
}

/// Validate a date phrase against `today`.
///
/// On success the value is `YYYY-MM-DD` and the display is the trimmed input.
pub fn validate_date(raw: &str, today: Date) -> ValidationOutcome {
    let value = raw.trim();
    match parse_date(value, today) {
        DatePhrase::Date { date, year_assumed } if date < today => {
            if year_assumed {
                ValidationOutcome::invalid(
                    RejectionKind::Past,
                    format!("Sorry, '{}' is a past date. Please enter a future date.", value),
                )
            } else {
                past_dates()
            }
        }
        DatePhrase::Date { date, .. } => ValidationOutcome::valid_with_display(iso(date), value),
        DatePhrase::Past => past_dates(),
        DatePhrase::Unrecognized => ValidationOutcome::invalid(
            RejectionKind::Syntax,
            format!("Sorry, '{}' is not a valid date. Please enter a valid date.", value),
        ),
    }
}

/// Validate the date from two sources.
///
/// The extracted slot value is tried first. If it fails and the utterance
/// says something different, the utterance is tried. When both fail the
/// first rejection is reported. The display value is always the utterance,
/// or the slot value when there is no utterance.
pub fn resolve_date(slot: Option<&str>, utterance: &str, today: Date) -> ValidationOutcome {
    let utterance = utterance.trim();
    let slot = slot.map(str::trim).filter(|s| !s.is_empty());

    let outcome = match slot {
        Some(slot) => {
            let first = validate_date(slot, today);
            if first.is_valid() || slot == utterance || utterance.is_empty() {
                first
            } else {
                let second = validate_date(utterance, today);
                if second.is_valid() {
                    second
                } else {
                    first
                }
            }
        }
        None => validate_date(utterance, today),
    };

    match outcome {
        ValidationOutcome::Valid { value, display } => {
            let display = if utterance.is_empty() {
                display.unwrap_or_else(|| value.clone())
            } else {
                utterance.to_string()
            };
            ValidationOutcome::valid_with_display(value, display)
        }
        invalid => invalid,
    }
}

/// Parse a canonical `YYYY-MM-DD` date, as stored in session state.
pub fn parse_iso(value: &str) -> Option<Date> {
    Date::parse(value.trim(), ISO).ok()
}

/// Format a date as `YYYY-MM-DD`.
pub fn iso(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn past_dates() -> ValidationOutcome {
    ValidationOutcome::invalid(
        RejectionKind::Past,
        "Sorry, I can't make reservations for past dates.",
    )
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_with(
    value: &str,
    items: &[BorrowedFormatItem<'_>],
    form: YearForm,
    today: Date,
) -> Option<Date> {
    let mut parsed = Parsed::new();
    let rest = parsed.parse_items(value.as_bytes(), items).ok()?;
    if !rest.is_empty() {
        return None;
    }

    let year = match form {
        YearForm::Assumed => today.year(),
        YearForm::Full => parsed.year()?,
        YearForm::LastTwo => {
            let two = i32::from(parsed.year_last_two()?);
            if two >= 69 {
                1900 + two
            } else {
                2000 + two
            }
        }
    };
    Date::from_calendar_date(year, parsed.month()?, parsed.day()?.get()).ok()
}
