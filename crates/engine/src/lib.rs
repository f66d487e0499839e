//! Concierge dialog engine -- collects the six fields of a restaurant
//! suggestion request over a multi-turn conversation.
//!
//! Each turn the caller hands in the conversation state, the intent and
//! slot values extracted upstream, and the raw utterance. The engine
//! validates the answer for the highest-priority missing field, then asks
//! for the next one or, once everything is confirmed, hands a
//! [`CompletionRecord`] to the configured [`CompletionQueue`].
//!
//! The engine holds no session table: conversation state is passed in and
//! returned every turn. "Today" and "now" come from an injected [`Clock`]
//! read in the policy's reference time zone.

pub mod clock;
pub mod codehook;
pub mod completion;
pub mod dining_date;
pub mod dining_time;
pub mod engine;
pub mod field;
pub mod outcome;
pub mod policy;
pub mod state;
pub mod turn;
pub mod validate;

pub use clock::{Clock, FixedClock, ReferenceZone, SystemClock};
pub use codehook::{handle_code_hook, handle_event};
pub use concierge_queue::{CompletionQueue, CompletionRecord};
pub use engine::DialogEngine;
pub use field::{Field, FieldSpec, FieldTable, UnknownField};
pub use outcome::{Rejection, RejectionKind, ValidationOutcome};
pub use policy::{ConfigError, Policy};
pub use state::ConversationState;
pub use turn::{Fulfillment, Intent, InvocationPhase, TurnInput, TurnOutput};
