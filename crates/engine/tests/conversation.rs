//! Whole conversations driven through `DialogEngine::handle_turn`.

use std::sync::Arc;

use concierge_engine::{
    ConversationState, DialogEngine, Field, FixedClock, Fulfillment, Intent, InvocationPhase,
    Policy, TurnInput, TurnOutput,
};
use concierge_queue::{CompletionQueue, CompletionRecord, MemoryQueue, QueueError};
use time::macros::datetime;

/// Noon on 2026-03-01 in New York.
fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(datetime!(2026-03-01 17:00 UTC)))
}

fn engine_with(queue: Arc<dyn CompletionQueue>) -> DialogEngine {
    DialogEngine::new(Policy::default(), clock(), queue).unwrap()
}

struct RejectingQueue;

impl CompletionQueue for RejectingQueue {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn enqueue(&self, _record: &CompletionRecord) -> Result<(), QueueError> {
        Err(QueueError::Rejected("queue closed".to_string()))
    }
}

/// Feed utterances one by one, carrying state forward like a caller would.
fn converse(engine: &DialogEngine, utterances: &[&str]) -> Vec<TurnOutput> {
    let mut state = ConversationState::new();
    let mut outputs = Vec::new();
    for utterance in utterances {
        let out = engine.handle_turn(TurnInput::dining(state.clone(), *utterance));
        state = out.state().clone();
        outputs.push(out);
    }
    outputs
}

fn prompt_field(out: &TurnOutput) -> Option<Field> {
    match out {
        TurnOutput::Prompt { field, .. } => Some(*field),
        _ => None,
    }
}

fn complete_state() -> ConversationState {
    let mut state = ConversationState::new();
    state.confirm(Field::Location, "manhattan");
    state.confirm(Field::Cuisine, "Italian");
    state.confirm(Field::DiningDate, "2026-03-02");
    state.display_date = Some("tomorrow".to_string());
    state.confirm(Field::DiningTime, "19:00");
    state.confirm(Field::NumberOfPeople, "4");
    state.confirm(Field::Email, "user@gmail.com");
    state
}

// ──────────────────────────────────────────────
// Happy path
// ──────────────────────────────────────────────

#[test]
fn six_answers_complete_the_request() {
    let queue = Arc::new(MemoryQueue::new());
    let engine = engine_with(queue.clone());

    let outputs = converse(
        &engine,
        &["manhattan", "italian", "tomorrow", "7pm", "4", "user@gmail.com"],
    );

    let prompted: Vec<Option<Field>> = outputs.iter().map(prompt_field).collect();
    assert_eq!(
        prompted,
        vec![
            Some(Field::Cuisine),
            Some(Field::DiningDate),
            Some(Field::DiningTime),
            Some(Field::NumberOfPeople),
            Some(Field::Email),
            None,
        ]
    );
    assert_eq!(
        outputs[0].message(),
        Some("What cuisine are you in the mood for? I support Chinese, Italian, Japanese, Mexican, and Indian.")
    );
    assert_eq!(
        outputs[4].message(),
        Some("Almost done! What email should I send the suggestions to?")
    );

    match &outputs[5] {
        TurnOutput::Close {
            intent,
            fulfillment,
            message,
            state,
        } => {
            assert_eq!(*intent, Intent::DiningSuggestions);
            assert_eq!(*fulfillment, Fulfillment::Fulfilled);
            assert_eq!(
                message,
                "Perfect! I'll send Italian restaurant suggestions for 4 people for tomorrow \
                 at 07:00 PM to user@gmail.com. Enjoy your meal!"
            );
            assert!(state.is_complete());
        }
        other => panic!("expected close, got {other:?}"),
    }

    assert_eq!(
        queue.records(),
        vec![CompletionRecord {
            location: "manhattan".to_string(),
            cuisine: "Italian".to_string(),
            dining_date: "2026-03-02".to_string(),
            dining_time: "19:00".to_string(),
            number_of_people: "4".to_string(),
            email: "user@gmail.com".to_string(),
        }]
    );
}

#[test]
fn rejections_reprompt_without_advancing() {
    let queue = Arc::new(MemoryQueue::new());
    let engine = engine_with(queue.clone());

    let outputs = converse(
        &engine,
        &[
            "Boston",
            "NYC",
            "thai",
            "Mexican",
            "yesterday",
            "March 20",
            "3:30",
            "9",
            "twenty",
            "21",
            "5.0",
            "me@work.example",
            "Me@GMail.com",
        ],
    );

    let messages: Vec<&str> = outputs.iter().filter_map(|o| o.message()).collect();
    assert_eq!(
        messages[0],
        "Sorry, I can't fulfill requests for Boston. Please enter a valid location."
    );
    assert!(messages[2].starts_with("Sorry, I don't have suggestions for thai cuisine."));
    assert_eq!(messages[4], "Sorry, I can't make reservations for past dates.");
    assert!(messages[6].starts_with("Sorry, I can't make reservations between 2 AM and 6 AM."));
    assert_eq!(messages[8], "Sorry, 'twenty' is not a valid number.");
    assert!(messages[9].starts_with("Sorry, I can't fulfill reservations for more than 20 people."));
    assert_eq!(
        messages[11],
        "I don't recognize 'work.example' as a valid email domain."
    );
    assert_eq!(
        messages[12],
        "Perfect! I'll send Mexican restaurant suggestions for 5 people for March 20 \
         at 09:00 PM to me@gmail.com. Enjoy your meal!"
    );

    let records = queue.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location, "NYC");
    assert_eq!(records[0].dining_date, "2026-03-20");
    assert_eq!(records[0].dining_time, "21:00");
}

#[test]
fn same_day_time_must_be_later_than_now() {
    let engine = engine_with(Arc::new(MemoryQueue::new()));
    let outputs = converse(&engine, &["ny", "chinese", "today", "11am", "12:00", "12:01"]);
    assert_eq!(
        outputs[3].message(),
        Some("Sorry, that time has already passed today. Please enter a future time.")
    );
    assert_eq!(prompt_field(&outputs[4]), Some(Field::DiningTime));
    assert_eq!(prompt_field(&outputs[5]), Some(Field::NumberOfPeople));
    assert_eq!(outputs[5].state().time.as_deref(), Some("12:01"));
}

// ──────────────────────────────────────────────
// Slots and phases
// ──────────────────────────────────────────────

#[test]
fn date_slot_falls_back_to_utterance() {
    let engine = engine_with(Arc::new(MemoryQueue::new()));
    let mut state = ConversationState::new();
    state.confirm(Field::Location, "nyc");
    state.confirm(Field::Cuisine, "Indian");

    let input = TurnInput::dining(state, "march 4").with_slot(Field::DiningDate, "2025-03-04");
    let out = engine.handle_turn(input);
    assert_eq!(prompt_field(&out), Some(Field::DiningTime));
    assert_eq!(out.state().date.as_deref(), Some("2026-03-04"));
    assert_eq!(out.state().display_date.as_deref(), Some("march 4"));
}

#[test]
fn time_slot_is_preferred_over_utterance() {
    let engine = engine_with(Arc::new(MemoryQueue::new()));
    let mut state = ConversationState::new();
    state.confirm(Field::Location, "nyc");
    state.confirm(Field::Cuisine, "Indian");
    state.confirm(Field::DiningDate, "2026-03-04");

    let input = TurnInput::dining(state, "around eight").with_slot(Field::DiningTime, "20:00");
    let out = engine.handle_turn(input);
    assert_eq!(out.state().time.as_deref(), Some("20:00"));
}

#[test]
fn passthrough_delegates_without_touching_state() {
    let engine = engine_with(Arc::new(MemoryQueue::new()));
    let input = TurnInput::dining(ConversationState::new(), "manhattan")
        .with_phase(InvocationPhase::Passthrough);
    assert_eq!(
        engine.handle_turn(input),
        TurnOutput::Delegate {
            state: ConversationState::new()
        }
    );
}

#[test]
fn elicit_phase_asks_for_the_next_field() {
    let engine = engine_with(Arc::new(MemoryQueue::new()));
    let mut state = ConversationState::new();
    state.confirm(Field::Location, "nyc");
    let input = TurnInput::dining(state, "").with_phase(InvocationPhase::Elicit);
    assert_eq!(prompt_field(&engine.handle_turn(input)), Some(Field::Cuisine));
}

// ──────────────────────────────────────────────
// Completion
// ──────────────────────────────────────────────

#[test]
fn enqueue_failure_closes_as_failed() {
    let engine = engine_with(Arc::new(RejectingQueue));
    let out = engine.handle_turn(TurnInput::dining(complete_state(), ""));
    match out {
        TurnOutput::Close {
            fulfillment,
            message,
            state,
            ..
        } => {
            assert_eq!(fulfillment, Fulfillment::Failed);
            assert_eq!(
                message,
                "I'm sorry, something went wrong. Please try again in a moment."
            );
            assert_eq!(state, complete_state());
        }
        other => panic!("expected close, got {other:?}"),
    }
}

#[test]
fn retried_completed_turn_emits_again() {
    let queue = Arc::new(MemoryQueue::new());
    let engine = engine_with(queue.clone());
    for _ in 0..2 {
        let out = engine.handle_turn(TurnInput::dining(complete_state(), "user@gmail.com"));
        assert!(matches!(
            out,
            TurnOutput::Close {
                fulfillment: Fulfillment::Fulfilled,
                ..
            }
        ));
    }
    assert_eq!(queue.len(), 2);
}

#[test]
fn display_date_falls_back_to_canonical_date() {
    let engine = engine_with(Arc::new(MemoryQueue::new()));
    let mut state = complete_state();
    state.display_date = None;
    let out = engine.handle_turn(TurnInput::dining(state, ""));
    assert!(out.message().unwrap().contains("for 2026-03-02 at 07:00 PM"));
}

// ──────────────────────────────────────────────
// Other intents
// ──────────────────────────────────────────────

#[test]
fn non_dining_intents_close_with_empty_state() {
    let queue = Arc::new(MemoryQueue::new());
    let engine = engine_with(queue.clone());
    let cases = [
        (Intent::Greeting, "Hi there, how can I help?"),
        (Intent::ThankYou, "You're welcome! Have a great day!"),
        (
            Intent::Fallback,
            "Sorry, I didn't understand that. Type 'Hello' to get started!",
        ),
        (Intent::Other("BookFlight".to_string()), "How can I help you?"),
    ];
    for (intent, expected) in cases {
        let mut input = TurnInput::dining(complete_state(), "hello");
        input.intent = intent.clone();
        let out = engine.handle_turn(input);
        assert_eq!(
            out,
            TurnOutput::Close {
                intent,
                fulfillment: Fulfillment::Fulfilled,
                message: expected.to_string(),
                state: ConversationState::new(),
            }
        );
    }
    assert!(queue.is_empty());
}

#[test]
fn revalidating_confirmed_values_is_stable() {
    let engine = engine_with(Arc::new(MemoryQueue::new()));
    let state = converse(&engine, &["nyc", "japanese", "tomorrow", "7:30pm", "2.9", "A@B.com"])
        .last()
        .map(|o| o.state().clone())
        .unwrap();
    for field in Field::ALL {
        let Some(value) = state.get(field) else {
            continue;
        };
        let outcome = engine.validate_field(field, value, state.date.as_deref());
        assert_eq!(outcome.value(), Some(value), "{field}");
    }
}
