//! Conversation state carried between turns in session attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Session attribute key for the user's original date phrasing.
pub const DISPLAY_DATE_KEY: &str = "displayDate";

/// Confirmed field values for one conversation.
///
/// A field is present only after it passed its validator. Attributes the
/// engine does not own are kept in `other` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub location: Option<String>,
    pub cuisine: Option<String>,
    /// Canonical `YYYY-MM-DD`.
    pub date: Option<String>,
    /// The date as the user said it ("tomorrow").
    pub display_date: Option<String>,
    /// Canonical 24-hour `HH:MM`.
    pub time: Option<String>,
    pub people: Option<String>,
    /// Lower-cased.
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read state from session attributes. Empty values count as absent.
    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Self {
        let mut state = ConversationState::new();
        for (key, value) in attributes {
            if key == DISPLAY_DATE_KEY {
                state.display_date = non_empty(value);
                continue;
            }
            match Field::from_state_key(key) {
                Some(field) => *state.slot_mut(field) = non_empty(value),
                None => {
                    state.other.insert(key.clone(), value.clone());
                }
            }
        }
        state
    }

    /// Write state back to session attributes.
    pub fn to_attributes(&self) -> BTreeMap<String, String> {
        let mut attributes = self.other.clone();
        for field in Field::ALL {
            if let Some(value) = self.get(field) {
                attributes.insert(field.state_key().to_string(), value.to_string());
            }
        }
        if let Some(display) = &self.display_date {
            attributes.insert(DISPLAY_DATE_KEY.to_string(), display.clone());
        }
        attributes
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Location => self.location.as_deref(),
            Field::Cuisine => self.cuisine.as_deref(),
            Field::DiningDate => self.date.as_deref(),
            Field::DiningTime => self.time.as_deref(),
            Field::NumberOfPeople => self.people.as_deref(),
            Field::Email => self.email.as_deref(),
        }
    }

    pub fn is_confirmed(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Record a validated value.
    pub fn confirm(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// True once all six fields are confirmed.
    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|f| self.is_confirmed(*f))
    }

    /// The display date, falling back to the canonical date.
    pub fn display_date(&self) -> Option<&str> {
        self.display_date.as_deref().or(self.date.as_deref())
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Location => &mut self.location,
            Field::Cuisine => &mut self.cuisine,
            Field::DiningDate => &mut self.date,
            Field::DiningTime => &mut self.time,
            Field::NumberOfPeople => &mut self.people,
            Field::Email => &mut self.email,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
