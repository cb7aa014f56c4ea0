//! Health check endpoint.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use relay_common::types::{BackendStatus, ChannelStatus, HealthReport};

use crate::state::AppState;

/// Ollama must answer `/api/version` within this window to count as connected.
const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(5);

const SYSTEM_NAME: &str = "Ollama Direct System";

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health: Ollama connectivity plus Teams workflow configuration.
///
/// The Teams side is reported from configuration only; it is never probed.
async fn health_check(State(state): State<AppState>) -> Response {
    // A panicking availability check surfaces as a JoinError and becomes an error report.
    let generator = state.relay.generator.clone();
    let check = tokio::spawn(async move { generator.is_available(AVAILABILITY_TIMEOUT).await });
    let connected = match check.await {
        Ok(connected) => connected,
        Err(e) => {
            tracing::error!(error = %e, "Ollama availability check crashed");
            return error_report(e.to_string());
        }
    };

    let report = HealthReport {
        status: String::from(if connected { "ok" } else { "degraded" }),
        timestamp: Utc::now().to_rfc3339(),
        system: SYSTEM_NAME.to_string(),
        ollama_status: if connected {
            BackendStatus::Connected
        } else {
            BackendStatus::Disconnected
        },
        teams_webhook_status: if state.relay.notifier.is_some() {
            ChannelStatus::Configured
        } else {
            ChannelStatus::NotConfigured
        },
        model: state.relay.model.clone(),
    };

    match serde_json::to_value(&report) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build health report");
            error_report(e.to_string())
        }
    }
}

fn error_report(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "timestamp": Utc::now().to_rfc3339(),
            "error": message,
        })),
    )
        .into_response()
}
