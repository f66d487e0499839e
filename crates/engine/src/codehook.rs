//! Code-hook adapter: wire events in, wire responses out.

use concierge_interchange::{
    from_event, CodeHookEvent, CodeHookResponse, IntentFulfillment, InvocationSource,
    SessionAttributes,
};
use tracing::warn;

use crate::engine::DialogEngine;
use crate::state::ConversationState;
use crate::turn::{Fulfillment, Intent, InvocationPhase, TurnInput, TurnOutput, FALLBACK_INTENT};

/// Reply sent when an event cannot be decoded.
pub const DECODE_FAILURE_MESSAGE: &str =
    "I'm sorry, something unexpected happened. Please try again.";

impl From<Fulfillment> for IntentFulfillment {
    fn from(f: Fulfillment) -> Self {
        match f {
            Fulfillment::Fulfilled => IntentFulfillment::Fulfilled,
            Fulfillment::Failed => IntentFulfillment::Failed,
        }
    }
}

impl From<InvocationSource> for InvocationPhase {
    fn from(source: InvocationSource) -> Self {
        match source {
            InvocationSource::DialogCodeHook => InvocationPhase::Validate,
            // Anything but a validation turn asks for the next field.
            InvocationSource::FulfillmentCodeHook | InvocationSource::Unknown => {
                InvocationPhase::Elicit
            }
        }
    }
}

/// Run one raw JSON event. Never fails: an event that does not decode
/// gets the generic fallback close.
pub fn handle_event(engine: &DialogEngine, event: &serde_json::Value) -> CodeHookResponse {
    match from_event(event) {
        Ok(event) => handle_code_hook(engine, event),
        Err(err) => {
            warn!(error = %err, "undecodable code-hook event");
            decode_failure()
        }
    }
}

/// Run one decoded event.
pub fn handle_code_hook(engine: &DialogEngine, event: CodeHookEvent) -> CodeHookResponse {
    let slot_values = event.slot_values();
    let CodeHookEvent {
        invocation_source,
        input_transcript,
        session_state,
    } = event;
    let intent_name = session_state.intent.name;
    let slots = session_state.intent.slots;

    let input = TurnInput {
        intent: Intent::from_name(&intent_name),
        slots: slot_values,
        state: ConversationState::from_attributes(&session_state.session_attributes),
        utterance: input_transcript.trim().to_string(),
        phase: invocation_source.into(),
    };

    match engine.handle_turn(input) {
        TurnOutput::Prompt {
            field,
            message,
            state,
        } => CodeHookResponse::elicit_slot(
            state.to_attributes(),
            &intent_name,
            slots,
            field.slot_name(),
            &message,
        ),
        TurnOutput::Delegate { state } => {
            CodeHookResponse::delegate(state.to_attributes(), &intent_name, slots)
        }
        TurnOutput::Close {
            intent,
            fulfillment,
            message,
            state,
        } => CodeHookResponse::close(
            state.to_attributes(),
            intent.name(),
            fulfillment.into(),
            &message,
        ),
    }
}

/// The close sent for an event that does not decode.
pub fn decode_failure() -> CodeHookResponse {
    CodeHookResponse::close(
        SessionAttributes::new(),
        FALLBACK_INTENT,
        IntentFulfillment::Fulfilled,
        DECODE_FAILURE_MESSAGE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_follow_invocation_source() {
        assert_eq!(
            InvocationPhase::from(InvocationSource::DialogCodeHook),
            InvocationPhase::Validate
        );
        assert_eq!(
            InvocationPhase::from(InvocationSource::FulfillmentCodeHook),
            InvocationPhase::Elicit
        );
        assert_eq!(
            InvocationPhase::from(InvocationSource::Unknown),
            InvocationPhase::Elicit
        );
    }

    #[test]
    fn decode_failure_is_a_fallback_close() {
        let resp = decode_failure();
        assert_eq!(resp.session_state.intent.name, "FallbackIntent");
        assert_eq!(
            resp.session_state.intent.state,
            Some(IntentFulfillment::Fulfilled)
        );
        assert_eq!(resp.message(), Some(DECODE_FAILURE_MESSAGE));
    }
}
