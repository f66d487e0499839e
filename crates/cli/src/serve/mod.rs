//! `concierge serve` -- HTTP JSON API around the dialog engine.
//!
//! The engine is synchronous and holds no session table, so every request
//! is independent: callers keep conversation state in the session
//! attributes of the code-hook event, exactly as the bot front end does.
//!
//! Security features:
//! - CORS headers on all responses (permissive for local dev)
//! - Request body limit
//! - Optional API key authentication via CONCIERGE_API_KEY env var
//!
//! Endpoints:
//! - GET  /health    - Server status (exempt from auth)
//! - POST /turn      - Run one code-hook event
//! - POST /validate  - Run a single field's validator
//!
//! All responses use Content-Type: application/json.

mod handlers;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use concierge_engine::DialogEngine;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use self::handlers::{handle_health, handle_not_found, handle_turn, handle_validate};
use self::middleware::auth_middleware;
use self::state::AppState;

/// Maximum request body size: 1 MB. Code-hook events are small.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Build the router. Split out so the route table is visible in one place.
fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/turn", post(handle_turn))
        .route("/validate", post(handle_validate))
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server on the given port.
///
/// When TLS cert/key paths are provided (and the `tls` feature is enabled),
/// the server listens over HTTPS using `axum-server` with rustls. Otherwise
/// it uses plain HTTP.
pub async fn start_server(
    engine: Arc<DialogEngine>,
    port: u16,
    _tls_cert: Option<PathBuf>,
    _tls_key: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    // API key: from CONCIERGE_API_KEY env var (None = no auth)
    let api_key = std::env::var("CONCIERGE_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());

    if api_key.is_some() {
        eprintln!("API key authentication enabled");
    }
    info!(
        port,
        locations = engine.policy().locations.len(),
        cuisines = engine.policy().cuisines.len(),
        "starting server"
    );

    let state = Arc::new(AppState { engine, api_key });
    let app = router(state);
    let addr = format!("0.0.0.0:{}", port);

    #[cfg(feature = "tls")]
    if let (Some(cert_path), Some(key_path)) = (&_tls_cert, &_tls_key) {
        let config =
            axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;
        let socket_addr: std::net::SocketAddr = addr.parse()?;
        eprintln!("Concierge listening on https://0.0.0.0:{}", port);
        axum_server::bind_rustls(socket_addr, config)
            .serve(app.into_make_service())
            .await?;
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("Concierge listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "no Ctrl+C handler, running until killed");
        std::future::pending::<()>().await;
    }
    eprintln!("\nReceived shutdown signal...");
}
