//! The collectible fields and the ordered table that drives the dialog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::outcome::ValidationOutcome;
use crate::policy::Policy;
use crate::state::ConversationState;
use crate::{dining_date, dining_time, validate};

/// One of the six values a conversation collects, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Location,
    Cuisine,
    DiningDate,
    DiningTime,
    NumberOfPeople,
    Email,
}

impl Field {
    /// Every field, highest priority first.
    pub const ALL: [Field; 6] = [
        Field::Location,
        Field::Cuisine,
        Field::DiningDate,
        Field::DiningTime,
        Field::NumberOfPeople,
        Field::Email,
    ];

    /// Slot name on the wire.
    pub fn slot_name(self) -> &'static str {
        match self {
            Field::Location => "Location",
            Field::Cuisine => "Cuisine",
            Field::DiningDate => "DiningDate",
            Field::DiningTime => "DiningTime",
            Field::NumberOfPeople => "NumberOfPeople",
            Field::Email => "Email",
        }
    }

    /// Session attribute key holding the confirmed value.
    pub fn state_key(self) -> &'static str {
        match self {
            Field::Location => "confirmedLocation",
            Field::Cuisine => "confirmedCuisine",
            Field::DiningDate => "confirmedDate",
            Field::DiningTime => "confirmedTime",
            Field::NumberOfPeople => "confirmedPeople",
            Field::Email => "confirmedEmail",
        }
    }

    pub fn from_state_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.state_key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slot_name())
    }
}

/// A field name that matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown field '{}' (expected one of: location, cuisine, date, time, people, email)",
            self.0
        )
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts slot names and short aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "location" => Ok(Field::Location),
            "cuisine" => Ok(Field::Cuisine),
            "date" | "diningdate" => Ok(Field::DiningDate),
            "time" | "diningtime" => Ok(Field::DiningTime),
            "people" | "party" | "numberofpeople" => Ok(Field::NumberOfPeople),
            "email" => Ok(Field::Email),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

// ──────────────────────────────────────────────
// Validation inputs
// ──────────────────────────────────────────────

/// What a validator may read besides its own input.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub policy: &'a Policy,
    /// Wall-clock now in the reference zone.
    pub now: PrimitiveDateTime,
    /// The confirmed dining date, for the same-day time check.
    pub confirmed_date: Option<&'a str>,
}

impl ValidationContext<'_> {
    pub fn today(&self) -> Date {
        self.now.date()
    }
}

/// The two sources of a field value in one turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldInput<'a> {
    /// Value extracted upstream, if any.
    pub slot: Option<&'a str>,
    /// Raw user utterance.
    pub utterance: &'a str,
}

impl<'a> FieldInput<'a> {
    pub fn new(slot: Option<&'a str>, utterance: &'a str) -> Self {
        FieldInput { slot, utterance }
    }

    /// The slot value when present and non-blank, else the utterance.
    pub fn candidate(&self) -> &'a str {
        self.slot
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.utterance.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.candidate().is_empty()
    }
}

pub type Validator = fn(&ValidationContext<'_>, &FieldInput<'_>) -> ValidationOutcome;

/// Checked against the raw utterance before validation. A hit re-prompts
/// for the field instead of rejecting the input.
pub type Intercept = fn(&Policy, &str) -> bool;

/// One row of the field table.
#[derive(Clone)]
pub struct FieldSpec {
    pub field: Field,
    pub prompt: String,
    pub validate: Validator,
    pub intercept: Option<Intercept>,
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("field", &self.field)
            .field("prompt", &self.prompt)
            .field("intercept", &self.intercept.is_some())
            .finish()
    }
}

// ──────────────────────────────────────────────
// Table
// ──────────────────────────────────────────────

/// Fields in priority order with their prompts and validators.
#[derive(Debug, Clone)]
pub struct FieldTable {
    specs: Vec<FieldSpec>,
}

impl FieldTable {
    pub fn new(policy: &Policy) -> Self {
        let specs = Field::ALL
            .into_iter()
            .map(|field| FieldSpec {
                field,
                prompt: first_prompt(field, policy),
                validate: validator(field),
                intercept: match field {
                    Field::Location => Some(validate::is_help_request as Intercept),
                    _ => None,
                },
            })
            .collect();
        FieldTable { specs }
    }

    pub fn spec(&self, field: Field) -> &FieldSpec {
        &self.specs[field.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }

    /// The highest-priority field not yet confirmed.
    pub fn first_unconfirmed(&self, state: &ConversationState) -> Option<&FieldSpec> {
        self.specs.iter().find(|spec| !state.is_confirmed(spec.field))
    }
}

fn first_prompt(field: Field, policy: &Policy) -> String {
    match field {
        Field::Location => "Where would you like to dine?".to_string(),
        Field::Cuisine => format!(
            "What cuisine are you in the mood for? I support {}.",
            validate::supported_cuisines(policy)
        ),
        Field::DiningDate => "When would you like the reservation for?".to_string(),
        Field::DiningTime => "What time would you like to dine?".to_string(),
        Field::NumberOfPeople => "How many people will be dining?".to_string(),
        Field::Email => "Almost done! What email should I send the suggestions to?".to_string(),
    }
}

fn validator(field: Field) -> Validator {
    match field {
        Field::Location => check_location,
        Field::Cuisine => check_cuisine,
        Field::DiningDate => check_date,
        Field::DiningTime => check_time,
        Field::NumberOfPeople => check_party_size,
        Field::Email => check_email,
    }
}

fn check_location(ctx: &ValidationContext<'_>, input: &FieldInput<'_>) -> ValidationOutcome {
    validate::validate_location(ctx.policy, input.candidate())
}

fn check_cuisine(ctx: &ValidationContext<'_>, input: &FieldInput<'_>) -> ValidationOutcome {
    validate::validate_cuisine(ctx.policy, input.candidate())
}

fn check_date(ctx: &ValidationContext<'_>, input: &FieldInput<'_>) -> ValidationOutcome {
    dining_date::resolve_date(input.slot, input.utterance, ctx.today())
}

fn check_time(ctx: &ValidationContext<'_>, input: &FieldInput<'_>) -> ValidationOutcome {
    dining_time::resolve_time(
        input.slot,
        input.utterance,
        ctx.policy,
        ctx.confirmed_date,
        ctx.now,
    )
}

fn check_party_size(ctx: &ValidationContext<'_>, input: &FieldInput<'_>) -> ValidationOutcome {
    validate::validate_party_size(ctx.policy, input.candidate())
}

fn check_email(ctx: &ValidationContext<'_>, input: &FieldInput<'_>) -> ValidationOutcome {
    validate::validate_email(ctx.policy, input.candidate())
}
