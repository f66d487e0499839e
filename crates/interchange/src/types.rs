//! Typed structs representing the code-hook interchange JSON shape.
//!
//! The same `SessionState` struct is used for requests and responses: a
//! request carries `intent` and `sessionAttributes`, a response adds the
//! `dialogAction` telling the front end what to do next.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Session attribute map carried between turns by the front end.
pub type SessionAttributes = BTreeMap<String, String>;

/// Slot map as sent by the front end. Unfilled slots arrive as `null`.
pub type Slots = BTreeMap<String, Option<Slot>>;

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ──────────────────────────────────────────────
// Request
// ──────────────────────────────────────────────

/// Why the front end invoked the code hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvocationSource {
    /// The user just answered something: validate it.
    DialogCodeHook,
    /// Slot collection is over from the front end's point of view.
    FulfillmentCodeHook,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A single code-hook invocation (one dialog turn).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeHookEvent {
    #[serde(default)]
    pub invocation_source: InvocationSource,
    /// The raw user utterance for this turn.
    #[serde(default, deserialize_with = "null_as_default")]
    pub input_transcript: String,
    pub session_state: SessionState,
}

impl CodeHookEvent {
    /// Interpreted value of a slot, if the front end extracted a non-empty one.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.session_state.intent.slot_value(name)
    }

    /// All non-empty interpreted slot values keyed by slot name.
    pub fn slot_values(&self) -> BTreeMap<String, String> {
        self.session_state
            .intent
            .slots
            .keys()
            .filter_map(|name| {
                self.slot_value(name)
                    .map(|value| (name.clone(), value.to_string()))
            })
            .collect()
    }
}

// ──────────────────────────────────────────────
// Shared session state
// ──────────────────────────────────────────────

/// `sessionState` section, shared by requests and responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_attributes: SessionAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_action: Option<DialogAction>,
    pub intent: IntentState,
}

/// The intent the front end classified this turn as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentState {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub slots: Slots,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<IntentFulfillment>,
}

impl IntentState {
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)?
            .as_ref()?
            .value
            .as_ref()?
            .interpreted_value
            .as_deref()
            .filter(|v| !v.is_empty())
    }
}

/// A filled (or partially filled) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<SlotValue>,
}

/// Raw and interpreted forms of a slot value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreted_value: Option<String>,
}

/// Fulfillment state of an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentFulfillment {
    Fulfilled,
    Failed,
    InProgress,
    ReadyForFulfillment,
    #[serde(other)]
    Other,
}

// ──────────────────────────────────────────────
// Response
// ──────────────────────────────────────────────

/// Kind of next step the front end should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogActionType {
    ElicitSlot,
    Delegate,
    Close,
}

/// `dialogAction` section of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub kind: DialogActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_to_elicit: Option<String>,
}

/// A message for the front end to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: String,
    pub content: String,
}

impl Message {
    pub fn plain_text(content: impl Into<String>) -> Self {
        Message {
            content_type: "PlainText".to_string(),
            content: content.into(),
        }
    }
}

/// The code-hook response document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeHookResponse {
    #[serde(rename = "sessionState")]
    pub session_state: SessionState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

impl CodeHookResponse {
    /// Ask the user for `slot` next.
    pub fn elicit_slot(
        session_attributes: SessionAttributes,
        intent_name: &str,
        slots: Slots,
        slot: &str,
        message: &str,
    ) -> Self {
        CodeHookResponse {
            session_state: SessionState {
                session_attributes,
                dialog_action: Some(DialogAction {
                    kind: DialogActionType::ElicitSlot,
                    slot_to_elicit: Some(slot.to_string()),
                }),
                intent: IntentState {
                    name: intent_name.to_string(),
                    slots,
                    state: None,
                },
            },
            messages: vec![Message::plain_text(message)],
        }
    }

    /// Let the front end continue its own slot elicitation.
    pub fn delegate(session_attributes: SessionAttributes, intent_name: &str, slots: Slots) -> Self {
        CodeHookResponse {
            session_state: SessionState {
                session_attributes,
                dialog_action: Some(DialogAction {
                    kind: DialogActionType::Delegate,
                    slot_to_elicit: None,
                }),
                intent: IntentState {
                    name: intent_name.to_string(),
                    slots,
                    state: None,
                },
            },
            messages: Vec::new(),
        }
    }

    /// End the conversation for this intent.
    pub fn close(
        session_attributes: SessionAttributes,
        intent_name: &str,
        state: IntentFulfillment,
        message: &str,
    ) -> Self {
        CodeHookResponse {
            session_state: SessionState {
                session_attributes,
                dialog_action: Some(DialogAction {
                    kind: DialogActionType::Close,
                    slot_to_elicit: None,
                }),
                intent: IntentState {
                    name: intent_name.to_string(),
                    slots: Slots::new(),
                    state: Some(state),
                },
            },
            messages: vec![Message::plain_text(message)],
        }
    }

    /// First message content, if any.
    pub fn message(&self) -> Option<&str> {
        self.messages.first().map(|m| m.content.as_str())
    }

    pub fn dialog_action_type(&self) -> Option<DialogActionType> {
        self.session_state.dialog_action.as_ref().map(|a| a.kind)
    }
}
