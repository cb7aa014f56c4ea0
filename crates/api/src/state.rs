//! Shared application state for the Axum API server.

use std::sync::Arc;

use relay_common::config::AppConfig;
use relay_engine::relay::RelayConfig;

/// Application state shared across all route handlers via Axum `State`.
///
/// Read-only after startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub relay: Arc<RelayConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, relay: RelayConfig) -> Self {
        Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
        }
    }
}
