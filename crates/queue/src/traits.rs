use crate::error::QueueError;
use crate::record::CompletionRecord;

/// The hand-off point between the dialog engine and fulfillment.
///
/// The engine calls `enqueue` once per completing turn and does not retry
/// or deduplicate. Implementations must therefore be usable with
/// at-least-once semantics: a caller that retries an already-completed
/// turn may cause the same record to be enqueued twice.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync` so one engine can be shared by
/// concurrent conversations (for example behind the HTTP server).
pub trait CompletionQueue: Send + Sync {
    /// Short backend name used in log lines.
    fn name(&self) -> &'static str;

    /// Hand one completed request to the fulfillment consumer.
    fn enqueue(&self, record: &CompletionRecord) -> Result<(), QueueError>;
}
