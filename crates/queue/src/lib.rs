mod discard;
mod error;
mod jsonl;
mod memory;
mod record;
mod traits;

pub use discard::DiscardQueue;
pub use error::QueueError;
pub use jsonl::JsonLinesQueue;
pub use memory::MemoryQueue;
pub use record::CompletionRecord;
pub use traits::CompletionQueue;
