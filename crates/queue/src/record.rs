use serde::{Deserialize, Serialize};

/// The finalized six-field payload handed to the fulfillment consumer.
///
/// Values are in canonical form: `dining_date` is `YYYY-MM-DD`,
/// `dining_time` is 24-hour `HH:MM`, `number_of_people` is a positive
/// integer as text and `email` is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompletionRecord {
    pub location: String,
    pub cuisine: String,
    pub dining_date: String,
    pub dining_time: String,
    pub number_of_people: String,
    pub email: String,
}

impl CompletionRecord {
    /// Serialize as the JSON message body consumers read.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
