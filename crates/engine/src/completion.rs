//! Completion hand-off: the record sent downstream and the closing message.

use concierge_queue::CompletionRecord;

use crate::dining_time::format_12_hour;
use crate::state::ConversationState;

/// Build the record for a complete conversation.
///
/// Only meaningful once [`ConversationState::is_complete`] holds; missing
/// fields come out empty.
pub fn completion_record(state: &ConversationState) -> CompletionRecord {
    let take = |value: &Option<String>| value.clone().unwrap_or_default();
    CompletionRecord {
        location: take(&state.location),
        cuisine: take(&state.cuisine),
        dining_date: take(&state.date),
        dining_time: take(&state.time),
        number_of_people: take(&state.people),
        email: take(&state.email),
    }
}

/// The message closing a fulfilled conversation.
pub fn closing_message(record: &CompletionRecord, display_date: &str) -> String {
    format!(
        "Perfect! I'll send {} restaurant suggestions for {} people for {} at {} to {}. Enjoy your meal!",
        record.cuisine,
        record.number_of_people,
        display_date,
        format_12_hour(&record.dining_time),
        record.email
    )
}

pub const FAILED_MESSAGE: &str = "I'm sorry, something went wrong. Please try again in a moment.";
