//! Route handlers: health, turn, validate.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use concierge_engine::{handle_event, Field};
use tracing::debug;

use super::json_error;
use super::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// POST /turn
///
/// Body is a code-hook event; the response is the code-hook response. An
/// event that does not decode still gets a 200 with the fallback close.
pub(crate) async fn handle_turn(
    State(state): State<Arc<AppState>>,
    Json(event): Json<serde_json::Value>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || handle_event(&engine, &event)).await;
    if let Ok(response) = &result {
        debug!(action = ?response.dialog_action_type(), "turn handled");
    }

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("task join error: {}", e),
        )
        .into_response(),
    }
}

/// POST /validate
///
/// Body: `{ "field": "time", "value": "7pm", "confirmed_date": "2026-03-02" }`
/// (`confirmed_date` optional).
pub(crate) async fn handle_validate(
    State(state): State<Arc<AppState>>,
    Json(parsed): Json<serde_json::Value>,
) -> impl IntoResponse {
    let field: Field = match parsed.get("field").and_then(|v| v.as_str()) {
        Some(name) => match name.parse() {
            Ok(f) => f,
            Err(e) => {
                return json_error(StatusCode::BAD_REQUEST, &format!("{}", e)).into_response()
            }
        },
        None => {
            return json_error(StatusCode::BAD_REQUEST, "missing 'field' field").into_response()
        }
    };

    let value = match parsed.get("value").and_then(|v| v.as_str()) {
        Some(v) => v.to_string(),
        None => {
            return json_error(StatusCode::BAD_REQUEST, "missing 'value' field").into_response()
        }
    };

    let confirmed_date = match parsed.get("confirmed_date") {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(d)) => Some(d.clone()),
        Some(_) => {
            return json_error(StatusCode::BAD_REQUEST, "'confirmed_date' must be a string")
                .into_response()
        }
    };

    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || {
        engine.validate_field(field, &value, confirmed_date.as_deref())
    })
    .await;

    match result {
        Ok(outcome) => {
            let mut json = serde_json::to_value(&outcome).unwrap_or_default();
            if let Some(obj) = json.as_object_mut() {
                obj.insert("field".to_string(), serde_json::json!(field.slot_name()));
            }
            (StatusCode::OK, Json(json)).into_response()
        }
        Err(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("task join error: {}", e),
        )
        .into_response(),
    }
}
