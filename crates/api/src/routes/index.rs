//! Root liveness text.

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index() -> &'static str {
    "Ollama Webhook System is running!"
}
