//! Ollama relay server binary entrypoint.

use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use relay_common::config::AppConfig;
use relay_engine::generator::OllamaClient;
use relay_engine::relay::RelayConfig;
use relay_notifier::{Notifier, TeamsWorkflowNotifier};

use relay_api::routes::create_router;
use relay_api::server::bind_listener;
use relay_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "relay_api={0},relay_engine={0},relay_notifier={0},relay_common={0},tower_http={0}",
                default_level
            ))
        }))
        .init();

    tracing::info!("Starting Ollama relay server...");
    config.log_summary();

    // Build relay collaborators
    let generator = Arc::new(OllamaClient::new(config.ollama_url.clone()));
    let notifier = config.teams_workflow_url.as_ref().map(|url| {
        Arc::new(TeamsWorkflowNotifier::new(url.clone(), config.ollama_model.clone()))
            as Arc<dyn Notifier>
    });
    let relay = RelayConfig::new(
        generator,
        config.ollama_model.clone(),
        Duration::from_secs(config.ollama_timeout_secs),
        notifier,
    );

    let listener = bind_listener(&config.host, config.port).await?;

    // Build application state and router
    let state = AppState::new(config, relay);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Relay server listening on {}", listener.local_addr()?);

    // In-flight relay tasks are abandoned on shutdown.
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal, stopping...");
        })
        .await?;

    tracing::info!("Ollama relay server stopped.");
    Ok(())
}
