use crate::error::QueueError;
use crate::record::CompletionRecord;
use crate::traits::CompletionQueue;

/// Queue used when no fulfillment consumer is configured.
///
/// Records are logged at `info` and dropped; the enqueue always succeeds,
/// so conversations still close as fulfilled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardQueue;

impl CompletionQueue for DiscardQueue {
    fn name(&self) -> &'static str {
        "discard"
    }

    fn enqueue(&self, record: &CompletionRecord) -> Result<(), QueueError> {
        tracing::info!(
            cuisine = %record.cuisine,
            dining_date = %record.dining_date,
            "no completion queue configured; dropping record"
        );
        Ok(())
    }
}
