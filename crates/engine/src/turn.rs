//! Turn input and output, independent of any wire format.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::field::Field;
use crate::state::ConversationState;

pub const GREETING_INTENT: &str = "GreetingIntent";
pub const THANK_YOU_INTENT: &str = "ThankYouIntent";
pub const DINING_INTENT: &str = "DiningSuggestionsIntent";
pub const FALLBACK_INTENT: &str = "FallbackIntent";

/// The intent the upstream classifier assigned to a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Intent {
    Greeting,
    ThankYou,
    DiningSuggestions,
    Fallback,
    Other(String),
}

impl Intent {
    pub fn from_name(name: &str) -> Intent {
        match name {
            GREETING_INTENT => Intent::Greeting,
            THANK_YOU_INTENT => Intent::ThankYou,
            DINING_INTENT => Intent::DiningSuggestions,
            FALLBACK_INTENT => Intent::Fallback,
            other => Intent::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Intent::Greeting => GREETING_INTENT,
            Intent::ThankYou => THANK_YOU_INTENT,
            Intent::DiningSuggestions => DINING_INTENT,
            Intent::Fallback => FALLBACK_INTENT,
            Intent::Other(name) => name,
        }
    }
}

/// Why the caller invoked the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvocationPhase {
    /// The user answered: validate the answer, then say what comes next.
    Validate,
    /// Only say what to ask next.
    Elicit,
    /// The caller drives slot filling itself.
    Passthrough,
}

/// Everything the engine needs for one turn.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub intent: Intent,
    /// Slot name to value extracted upstream. Blank values are ignored.
    pub slots: BTreeMap<String, String>,
    pub state: ConversationState,
    pub utterance: String,
    pub phase: InvocationPhase,
}

impl TurnInput {
    /// A validation turn of the dining intent with no extracted slots.
    pub fn dining(state: ConversationState, utterance: impl Into<String>) -> Self {
        TurnInput {
            intent: Intent::DiningSuggestions,
            slots: BTreeMap::new(),
            state,
            utterance: utterance.into(),
            phase: InvocationPhase::Validate,
        }
    }

    pub fn with_slot(mut self, field: Field, value: impl Into<String>) -> Self {
        self.slots.insert(field.slot_name().to_string(), value.into());
        self
    }

    pub fn with_phase(mut self, phase: InvocationPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn slot(&self, field: Field) -> Option<&str> {
        self.slots
            .get(field.slot_name())
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// How a closed conversation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Fulfillment {
    Fulfilled,
    Failed,
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutput {
    /// Ask the user for `field`.
    Prompt {
        field: Field,
        message: String,
        state: ConversationState,
    },
    /// Let the caller continue its own slot elicitation.
    Delegate { state: ConversationState },
    /// End the conversation.
    Close {
        intent: Intent,
        fulfillment: Fulfillment,
        message: String,
        state: ConversationState,
    },
}

impl TurnOutput {
    pub fn state(&self) -> &ConversationState {
        match self {
            TurnOutput::Prompt { state, .. }
            | TurnOutput::Delegate { state }
            | TurnOutput::Close { state, .. } => state,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            TurnOutput::Prompt { message, .. } | TurnOutput::Close { message, .. } => {
                Some(message)
            }
            TurnOutput::Delegate { .. } => None,
        }
    }
}
