//! Deserialization of code-hook events.
//!
//! The main entry point is [`from_event`], which takes a
//! `&serde_json::Value` and produces a [`CodeHookEvent`].

use crate::types::*;
use serde::Deserialize;
use std::fmt;

/// Errors during code-hook event deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The event is missing a required field.
    MissingField { field: String },
    /// The event structure does not match the code-hook shape.
    InvalidEvent(String),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::MissingField { field } => {
                write!(f, "event missing required field: '{}'", field)
            }
            InterchangeError::InvalidEvent(msg) => {
                write!(f, "invalid event: {}", msg)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Deserialize a code-hook event.
///
/// The intent name is mandatory; everything else tolerates being absent
/// or `null`.
pub fn from_event(event: &serde_json::Value) -> Result<CodeHookEvent, InterchangeError> {
    let intent_name = event
        .get("sessionState")
        .and_then(|s| s.get("intent"))
        .and_then(|i| i.get("name"))
        .and_then(|n| n.as_str());

    match intent_name {
        Some(name) if !name.is_empty() => {}
        _ => {
            return Err(InterchangeError::MissingField {
                field: "sessionState.intent.name".to_string(),
            })
        }
    }

    CodeHookEvent::deserialize(event).map_err(|e| InterchangeError::InvalidEvent(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_event() {
        let event = json!({
            "invocationSource": "DialogCodeHook",
            "inputTranscript": "tomorrow",
            "sessionState": {
                "sessionAttributes": { "confirmedLocation": "manhattan" },
                "intent": {
                    "name": "DiningSuggestionsIntent",
                    "slots": {
                        "DiningDate": { "value": { "originalValue": "tomorrow", "interpretedValue": "2026-03-02" } },
                        "Email": null
                    },
                    "state": "InProgress"
                }
            }
        });

        let decoded = from_event(&event).unwrap();
        assert_eq!(decoded.invocation_source, InvocationSource::DialogCodeHook);
        assert_eq!(decoded.input_transcript, "tomorrow");
        assert_eq!(
            decoded.session_state.session_attributes["confirmedLocation"],
            "manhattan"
        );
        assert_eq!(decoded.slot_value("DiningDate"), Some("2026-03-02"));
        assert_eq!(decoded.slot_values().len(), 1);
        assert_eq!(
            decoded.session_state.intent.state,
            Some(IntentFulfillment::InProgress)
        );
    }

    #[test]
    fn tolerates_missing_and_null_sections() {
        let event = json!({
            "inputTranscript": null,
            "sessionState": {
                "sessionAttributes": null,
                "intent": { "name": "GreetingIntent", "slots": null }
            }
        });

        let decoded = from_event(&event).unwrap();
        assert_eq!(decoded.invocation_source, InvocationSource::Unknown);
        assert_eq!(decoded.input_transcript, "");
        assert!(decoded.session_state.session_attributes.is_empty());
        assert!(decoded.session_state.intent.slots.is_empty());
    }

    #[test]
    fn unknown_invocation_source_is_tolerated() {
        let event = json!({
            "invocationSource": "SomethingNew",
            "sessionState": { "intent": { "name": "DiningSuggestionsIntent" } }
        });
        let decoded = from_event(&event).unwrap();
        assert_eq!(decoded.invocation_source, InvocationSource::Unknown);
    }

    #[test]
    fn missing_intent_name_is_an_error() {
        let err = from_event(&json!({ "sessionState": {} })).unwrap_err();
        assert_eq!(
            err,
            InterchangeError::MissingField {
                field: "sessionState.intent.name".to_string()
            }
        );
        assert!(from_event(&json!("not an object")).is_err());
    }

    #[test]
    fn non_string_attributes_are_rejected() {
        let event = json!({
            "sessionState": {
                "sessionAttributes": { "confirmedPeople": 4 },
                "intent": { "name": "DiningSuggestionsIntent" }
            }
        });
        assert!(matches!(
            from_event(&event),
            Err(InterchangeError::InvalidEvent(_))
        ));
    }
}
