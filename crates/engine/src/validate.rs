//! Single-field validators for location, cuisine, email and party size.
//!
//! Dates and times need real parsing and live in `dining_date` and
//! `dining_time`. Every validator trims its input first.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::outcome::{RejectionKind, ValidationOutcome};
use crate::policy::Policy;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

// ──────────────────────────────────────────────
// Location
// ──────────────────────────────────────────────

/// True when the utterance asks for help ("I'm hungry, recommend something")
/// instead of naming a place. Substring match, case-insensitive.
pub fn is_help_request(policy: &Policy, utterance: &str) -> bool {
    let lower = utterance.to_lowercase();
    policy
        .help_triggers
        .iter()
        .any(|word| lower.contains(word.as_str()))
}

/// Accept a known location alias. The value is kept as the user typed it.
pub fn validate_location(policy: &Policy, raw: &str) -> ValidationOutcome {
    let value = raw.trim();
    let lower = value.to_lowercase();
    if policy.locations.iter().any(|alias| *alias == lower) {
        ValidationOutcome::valid(value)
    } else {
        ValidationOutcome::invalid(
            RejectionKind::Unsupported,
            format!(
                "Sorry, I can't fulfill requests for {}. Please enter a valid location.",
                value
            ),
        )
    }
}

// ──────────────────────────────────────────────
// Cuisine
// ──────────────────────────────────────────────

/// Accept a supported cuisine; the value is capitalized ("Italian").
pub fn validate_cuisine(policy: &Policy, raw: &str) -> ValidationOutcome {
    let value = raw.trim();
    let lower = value.to_lowercase();
    if policy.cuisines.iter().any(|c| *c == lower) {
        ValidationOutcome::valid(capitalize(&lower))
    } else {
        ValidationOutcome::invalid(
            RejectionKind::Unsupported,
            format!(
                "Sorry, I don't have suggestions for {} cuisine. I support {}. Which would you like?",
                value,
                supported_cuisines(policy)
            ),
        )
    }
}

/// "Chinese, Italian, Japanese, Mexican, and Indian"
pub fn supported_cuisines(policy: &Policy) -> String {
    let names: Vec<String> = policy.cuisines.iter().map(|c| capitalize(c)).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

fn capitalize(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ──────────────────────────────────────────────
// Email
// ──────────────────────────────────────────────

/// Accept a syntactically valid address at an allowed domain; lower-cased.
pub fn validate_email(policy: &Policy, raw: &str) -> ValidationOutcome {
    let value = raw.trim();
    if !EMAIL_RE.is_match(value) {
        return ValidationOutcome::invalid(
            RejectionKind::Syntax,
            "That doesn't look like a valid email address. Please enter a valid one.",
        );
    }

    let domain = value
        .split_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .unwrap_or_default();
    if !policy.email_domains.iter().any(|d| *d == domain) {
        return ValidationOutcome::invalid(
            RejectionKind::Domain,
            format!("I don't recognize '{}' as a valid email domain.", domain),
        );
    }

    ValidationOutcome::valid(value.to_lowercase())
}

// ──────────────────────────────────────────────
// Party size
// ──────────────────────────────────────────────

/// Accept a number whose integer part is within the policy's party size.
///
/// Parsed as an exact decimal, plain (`5`, `5.0`) or scientific (`1e1`),
/// then truncated toward zero.
pub fn validate_party_size(policy: &Policy, raw: &str) -> ValidationOutcome {
    let value = raw.trim();
    let parsed = Decimal::from_str(value).or_else(|_| Decimal::from_scientific(value));
    let Ok(number) = parsed else {
        return ValidationOutcome::invalid(
            RejectionKind::Syntax,
            format!("Sorry, '{}' is not a valid number.", value),
        );
    };

    let whole = number.trunc();
    let range = policy.party_size;
    if whole < Decimal::from(range.min) {
        let noun = if range.min == 1 { "person" } else { "people" };
        return ValidationOutcome::invalid(
            RejectionKind::Domain,
            format!(
                "Sorry, I can't fulfill a reservation for less than {} {}. How many people will be dining?",
                range.min, noun
            ),
        );
    }
    if whole > Decimal::from(range.max) {
        return ValidationOutcome::invalid(
            RejectionKind::Domain,
            format!(
                "Sorry, I can't fulfill reservations for more than {} people. How many people will be dining?",
                range.max
            ),
        );
    }

    match whole.to_u32() {
        Some(n) => ValidationOutcome::valid(n.to_string()),
        None => ValidationOutcome::invalid(
            RejectionKind::Syntax,
            format!("Sorry, '{}' is not a valid number.", value),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> Policy {
        Policy::default()
    }

    // ── Location ──

    #[test]
    fn every_alias_is_accepted_in_any_case() {
        for alias in ["manhattan", "New York", "NYC", "new york city", "Ny"] {
            let outcome = validate_location(&policy(), alias);
            assert_eq!(outcome, ValidationOutcome::valid(alias), "alias {alias}");
        }
    }

    #[test]
    fn other_locations_are_unsupported() {
        for place in ["brooklyn", "paris", "new yorkk", ""] {
            let outcome = validate_location(&policy(), place);
            let rejection = outcome.rejection().unwrap();
            assert_eq!(rejection.kind, RejectionKind::Unsupported);
        }
        assert_eq!(
            validate_location(&policy(), " Boston ").message(),
            "Sorry, I can't fulfill requests for Boston. Please enter a valid location."
        );
    }

    #[test]
    fn help_requests_are_detected() {
        assert!(is_help_request(&policy(), "I'm HUNGRY"));
        assert!(is_help_request(&policy(), "any restaurant suggestions?"));
        assert!(!is_help_request(&policy(), "manhattan"));
        assert!(!is_help_request(&policy(), "new york city"));
    }

    // ── Cuisine ──

    #[test]
    fn supported_cuisines_are_capitalized() {
        assert_eq!(validate_cuisine(&policy(), "ITALIAN"), ValidationOutcome::valid("Italian"));
        assert_eq!(validate_cuisine(&policy(), " indian "), ValidationOutcome::valid("Indian"));
    }

    #[test]
    fn unsupported_cuisine_lists_the_menu() {
        let outcome = validate_cuisine(&policy(), "Thai");
        assert_eq!(
            outcome.message(),
            "Sorry, I don't have suggestions for Thai cuisine. I support Chinese, Italian, \
             Japanese, Mexican, and Indian. Which would you like?"
        );
        assert_eq!(outcome.rejection().unwrap().kind, RejectionKind::Unsupported);
    }

    #[test]
    fn cuisine_phrase_adapts_to_list_length() {
        let mut p = policy();
        p.cuisines = vec!["thai".to_string()];
        assert_eq!(supported_cuisines(&p), "Thai");
        p.cuisines.push("greek".to_string());
        assert_eq!(supported_cuisines(&p), "Thai and Greek");
    }

    // ── Email ──

    #[test]
    fn email_syntax_failures() {
        for bad in ["a@b", "user@gmail", "no-at-sign.com", "two@@gmail.com", "sp ace@gmail.com"] {
            let outcome = validate_email(&policy(), bad);
            assert_eq!(outcome.rejection().unwrap().kind, RejectionKind::Syntax, "{bad}");
        }
    }

    #[test]
    fn email_domain_failure_names_the_domain() {
        let outcome = validate_email(&policy(), "user@Unknown.xyz");
        assert_eq!(
            outcome.message(),
            "I don't recognize 'unknown.xyz' as a valid email domain."
        );
        assert_eq!(outcome.rejection().unwrap().kind, RejectionKind::Domain);
    }

    #[test]
    fn email_is_lower_cased() {
        assert_eq!(
            validate_email(&policy(), "First.Last@GMail.com"),
            ValidationOutcome::valid("first.last@gmail.com")
        );
        assert!(validate_email(&policy(), "student@nyu.edu").is_valid());
        assert!(validate_email(&policy(), "x@yahoo.co.uk").is_valid());
    }

    // ── Party size ──

    #[test]
    fn party_size_bounds() {
        let zero = validate_party_size(&policy(), "0");
        assert!(zero.message().contains("less than 1 person"));
        let many = validate_party_size(&policy(), "21");
        assert!(many.message().contains("more than 20 people"));
        assert_eq!(validate_party_size(&policy(), "1"), ValidationOutcome::valid("1"));
        assert_eq!(validate_party_size(&policy(), "20"), ValidationOutcome::valid("20"));
    }

    #[test]
    fn party_size_truncates_decimals() {
        assert_eq!(validate_party_size(&policy(), "5.0"), ValidationOutcome::valid("5"));
        assert_eq!(validate_party_size(&policy(), "4.9"), ValidationOutcome::valid("4"));
        assert_eq!(validate_party_size(&policy(), "1e1"), ValidationOutcome::valid("10"));
        assert!(!validate_party_size(&policy(), "0.5").is_valid());
        assert_eq!(validate_party_size(&policy(), "20.5"), ValidationOutcome::valid("20"));
    }

    #[test]
    fn party_size_rejects_words() {
        let outcome = validate_party_size(&policy(), "four");
        assert_eq!(outcome.message(), "Sorry, 'four' is not a valid number.");
        assert_eq!(outcome.rejection().unwrap().kind, RejectionKind::Syntax);
    }

    #[test]
    fn party_size_follows_policy() {
        let mut p = policy();
        p.party_size.min = 2;
        p.party_size.max = 6;
        assert!(validate_party_size(&p, "1").message().contains("less than 2 people"));
        assert!(validate_party_size(&p, "7").message().contains("more than 6 people"));
    }

    #[test]
    fn revalidating_normalized_values_is_stable() {
        let p = policy();
        let once = validate_party_size(&p, "5.0");
        assert_eq!(validate_party_size(&p, once.value().unwrap()), once);
        let once = validate_email(&p, "User@Gmail.com");
        assert_eq!(validate_email(&p, once.value().unwrap()), once);
        let once = validate_cuisine(&p, "mexican");
        assert_eq!(validate_cuisine(&p, once.value().unwrap()), once);
    }
}
