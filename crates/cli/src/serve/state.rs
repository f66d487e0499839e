//! Application state shared across request handlers.

use std::sync::Arc;

use concierge_engine::DialogEngine;

pub(crate) struct AppState {
    /// The engine is synchronous; handlers call it on a blocking worker.
    pub(crate) engine: Arc<DialogEngine>,
    /// Optional API key for authentication. None = no auth required.
    pub(crate) api_key: Option<String>,
}
