//! The dialog engine: one call per turn, state in and state out.

use std::sync::Arc;

use concierge_queue::CompletionQueue;
use time::PrimitiveDateTime;
use tracing::{debug, info, warn};

use crate::clock::{Clock, ReferenceZone};
use crate::completion::{closing_message, completion_record, FAILED_MESSAGE};
use crate::field::{Field, FieldInput, FieldTable, ValidationContext};
use crate::outcome::ValidationOutcome;
use crate::policy::{ConfigError, Policy};
use crate::state::ConversationState;
use crate::turn::{Fulfillment, Intent, InvocationPhase, TurnInput, TurnOutput};

/// Drives the slot-filling conversation.
///
/// The engine keeps no per-conversation data. Everything about a
/// conversation arrives in [`TurnInput::state`] and leaves in the returned
/// [`TurnOutput`], so one engine can serve any number of conversations
/// from any number of threads.
pub struct DialogEngine {
    policy: Policy,
    zone: ReferenceZone,
    table: FieldTable,
    clock: Arc<dyn Clock>,
    queue: Arc<dyn CompletionQueue>,
}

impl DialogEngine {
    /// Build an engine. The policy's allow-lists are normalized first, so a
    /// policy assembled in code matches the same way a loaded one does.
    pub fn new(
        policy: Policy,
        clock: Arc<dyn Clock>,
        queue: Arc<dyn CompletionQueue>,
    ) -> Result<Self, ConfigError> {
        let policy = policy.normalized();
        policy.validate()?;
        let zone = policy.reference_zone()?;
        let table = FieldTable::new(&policy);
        Ok(DialogEngine {
            policy,
            zone,
            table,
            clock,
            queue,
        })
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn fields(&self) -> &FieldTable {
        &self.table
    }

    /// Current wall-clock time in the reference zone.
    pub fn local_now(&self) -> PrimitiveDateTime {
        self.zone.local(self.clock.now_utc())
    }

    /// Run one turn.
    pub fn handle_turn(&self, input: TurnInput) -> TurnOutput {
        debug!(intent = input.intent.name(), phase = ?input.phase, "turn");
        let Some(message) = canned_reply(&input.intent) else {
            return self.handle_dining(input);
        };
        TurnOutput::Close {
            intent: input.intent,
            fulfillment: Fulfillment::Fulfilled,
            message: message.to_string(),
            state: ConversationState::new(),
        }
    }

    /// Run a single field's validator outside a conversation.
    ///
    /// `confirmed_date` feeds the same-day check for times. Intercepts such
    /// as the location help check are not applied.
    pub fn validate_field(
        &self,
        field: Field,
        value: &str,
        confirmed_date: Option<&str>,
    ) -> ValidationOutcome {
        let ctx = ValidationContext {
            policy: &self.policy,
            now: self.local_now(),
            confirmed_date,
        };
        (self.table.spec(field).validate)(&ctx, &FieldInput::new(None, value))
    }

    fn handle_dining(&self, mut input: TurnInput) -> TurnOutput {
        let now = self.local_now();
        let mut state = std::mem::take(&mut input.state);

        if let Some(spec) = self.table.first_unconfirmed(&state) {
            match input.phase {
                InvocationPhase::Passthrough => return TurnOutput::Delegate { state },
                InvocationPhase::Elicit => {}
                InvocationPhase::Validate => {
                    let field = spec.field;
                    if spec
                        .intercept
                        .is_some_and(|intercept| intercept(&self.policy, &input.utterance))
                    {
                        debug!(field = %field, "help request, prompting again");
                        return TurnOutput::Prompt {
                            field,
                            message: spec.prompt.clone(),
                            state,
                        };
                    }

                    let candidate = FieldInput::new(input.slot(field), &input.utterance);
                    if !candidate.is_empty() {
                        let ctx = ValidationContext {
                            policy: &self.policy,
                            now,
                            confirmed_date: state.date.as_deref(),
                        };
                        match (spec.validate)(&ctx, &candidate) {
                            ValidationOutcome::Valid { value, display } => {
                                info!(field = %field, value = %value, "field confirmed");
                                if field == Field::DiningDate {
                                    state.display_date = display;
                                }
                                state.confirm(field, value);
                            }
                            ValidationOutcome::Invalid(rejection) => {
                                debug!(field = %field, kind = ?rejection.kind, "field rejected");
                                return TurnOutput::Prompt {
                                    field,
                                    message: rejection.message,
                                    state,
                                };
                            }
                        }
                    }
                }
            }
        }

        match self.table.first_unconfirmed(&state) {
            Some(next) => TurnOutput::Prompt {
                field: next.field,
                message: next.prompt.clone(),
                state,
            },
            None => self.complete(input.intent, state),
        }
    }

    fn complete(&self, intent: Intent, state: ConversationState) -> TurnOutput {
        let record = completion_record(&state);
        if let Err(err) = self.queue.enqueue(&record) {
            warn!(queue = self.queue.name(), error = %err, "completion enqueue failed");
            return TurnOutput::Close {
                intent,
                fulfillment: Fulfillment::Failed,
                message: FAILED_MESSAGE.to_string(),
                state,
            };
        }

        info!(queue = self.queue.name(), email = %record.email, "completion record emitted");
        let display_date = state.display_date().unwrap_or(&record.dining_date);
        let message = closing_message(&record, display_date);
        TurnOutput::Close {
            intent,
            fulfillment: Fulfillment::Fulfilled,
            message,
            state,
        }
    }
}

/// Replies for intents that bypass the slot machine.
fn canned_reply(intent: &Intent) -> Option<&'static str> {
    match intent {
        Intent::DiningSuggestions => None,
        Intent::Greeting => Some("Hi there, how can I help?"),
        Intent::ThankYou => Some("You're welcome! Have a great day!"),
        Intent::Fallback => Some("Sorry, I didn't understand that. Type 'Hello' to get started!"),
        Intent::Other(_) => Some("How can I help you?"),
    }
}
