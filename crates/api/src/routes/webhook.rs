//! Teams outgoing webhook.
//!
//! Teams gives the bot about five seconds to answer, far less than a generation takes. The
//! handler therefore only verifies, parses and sanitizes, launches the relay task and replies
//! with a fixed acknowledgment. The answer arrives later through the Teams workflow.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use relay_common::error::AppError;
use relay_common::types::{Acknowledgment, InboundMessage};
use relay_engine::relay::spawn_relay;
use relay_engine::sanitize::SanitizedQuery;

use crate::middleware::signature::SignedBody;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(handle_webhook))
}

/// POST /webhook: Accept a Teams message and relay it to Ollama in the background.
async fn handle_webhook(
    State(state): State<AppState>,
    SignedBody(body): SignedBody,
) -> Result<Json<Acknowledgment>, AppError> {
    tracing::info!(body_bytes = body.len(), "Webhook request received");

    let message = InboundMessage::parse(&body).inspect_err(|e| {
        tracing::error!(error = %e, "Rejecting webhook payload");
    })?;

    let query = SanitizedQuery::new(&message.text, &state.config.trigger_phrase);
    if query.is_empty() {
        tracing::warn!("Message is empty after sanitization; relaying anyway");
    }
    tracing::debug!(query = %query, "Sanitized query");

    let relay_id = spawn_relay(query, state.relay.clone());
    tracing::info!(%relay_id, "Relay task launched");

    Ok(Json(Acknowledgment::accepted()))
}
