/// All errors that can be returned by a CompletionQueue implementation.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The record could not be serialized for transport.
    #[error("could not serialize completion record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The queue's backing file or device could not be written.
    #[error("queue I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The queue refused the message (full, closed, unreachable, ...).
    #[error("queue rejected message: {0}")]
    Rejected(String),
}
