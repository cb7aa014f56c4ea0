//! Detached generate-then-notify task.
//!
//! The webhook handler acknowledges Teams immediately and hands the query to [`spawn_relay`].
//! From then on nothing is reported back to the caller: every outcome ends up in the logs and,
//! on success, in the notification channel.
//!
//! Per relay:
//! 1. Generate an answer (bounded by the configured timeout)
//! 2. Stop if no notifier is configured
//! 3. Deliver (question, answer) once; log the outcome
//!
//! No retries, no cancellation. A panic anywhere in the task is caught by a supervising task
//! and logged.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::Instrument;
use uuid::Uuid;

use relay_common::config::truncate_chars;
use relay_common::types::DeliveryOutcome;
use relay_notifier::Notifier;

use crate::generator::TextGenerator;
use crate::sanitize::SanitizedQuery;

/// Characters of a generated answer included in log lines.
const LOG_PREVIEW_CHARS: usize = 100;

/// Everything a relay needs, fixed at startup and shared read-only between tasks.
#[derive(Clone)]
pub struct RelayConfig {
    pub generator: Arc<dyn TextGenerator>,
    pub model: String,
    pub timeout: Duration,
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl RelayConfig {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        model: impl Into<String>,
        timeout: Duration,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            generator,
            model: model.into(),
            timeout,
            notifier,
        }
    }
}

/// Terminal state of one relay, used for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered,
    BackendFailure(String),
    ConfigurationGap,
    DeliveryFailure(String),
}

/// Launch a relay without waiting for it. Returns the relay id used in its log span.
pub fn spawn_relay(query: SanitizedQuery, config: Arc<RelayConfig>) -> Uuid {
    let relay_id = Uuid::new_v4();
    let span = tracing::info_span!("relay", %relay_id);

    let task = tokio::spawn(
        async move {
            run_relay(&query, &config).await;
        }
        .instrument(span.clone()),
    );

    // Supervisor: a panic in the relay surfaces here as a JoinError instead of being lost.
    tokio::spawn(
        async move {
            if let Err(e) = task.await {
                if e.is_panic() {
                    tracing::error!(error = %e, "Relay task panicked");
                } else {
                    tracing::warn!(error = %e, "Relay task was cancelled");
                }
            }
        }
        .instrument(span),
    );

    relay_id
}

/// Run one relay to completion on the current task.
pub async fn run_relay(query: &SanitizedQuery, config: &RelayConfig) -> RelayOutcome {
    let started = Instant::now();

    let answer = match config
        .generator
        .generate(query.as_str(), &config.model, config.timeout)
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!(
                error = %e,
                error_detail = ?e,
                model = %config.model,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Generation failed; no notification will be sent"
            );
            return RelayOutcome::BackendFailure(e.to_string());
        }
    };

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        answer_chars = answer.chars().count(),
        preview = %truncate_chars(&answer, LOG_PREVIEW_CHARS),
        "Answer generated"
    );

    let Some(notifier) = &config.notifier else {
        tracing::error!("Teams workflow is not configured; answer cannot be delivered");
        return RelayOutcome::ConfigurationGap;
    };

    match notifier.send_answer(query.as_str(), &answer).await {
        DeliveryOutcome::Delivered => {
            tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Answer delivered to Teams"
            );
            RelayOutcome::Delivered
        }
        DeliveryOutcome::Failed(msg) => {
            tracing::error!(error = %msg, "Teams delivery failed");
            RelayOutcome::DeliveryFailure(msg)
        }
        DeliveryOutcome::NotConfigured => {
            tracing::error!("Teams workflow is not configured; answer cannot be delivered");
            RelayOutcome::ConfigurationGap
        }
    }
}
