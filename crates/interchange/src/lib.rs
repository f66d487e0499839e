//! concierge-interchange: code-hook interchange JSON types.
//!
//! A conversational front end (the NLU service that classifies intents and
//! extracts slots) calls the dialog engine once per turn with a code-hook
//! event and expects a code-hook response back. This crate owns the typed
//! shape of both documents and a single `from_event()` entry point that
//! decodes a `serde_json::Value` event.
//!
//! The engine depends on this crate for decoding and encoding only; it
//! converts these wire types into its own turn types before running any
//! dialog logic.

pub mod deserialize;
pub mod types;

pub use deserialize::{from_event, InterchangeError};
pub use types::*;
