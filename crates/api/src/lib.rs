//! HTTP surface of the Ollama relay.
//!
//! Endpoints:
//! - POST /webhook: Teams outgoing webhook; acknowledges at once and relays in the background
//! - GET  /health : Ollama connectivity and Teams workflow configuration
//! - GET  /       : Liveness text

pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
