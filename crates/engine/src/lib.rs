//! Relay engine: query sanitization, the Ollama generation client and the detached
//! generate-then-notify task.

pub mod generator;
pub mod relay;
pub mod sanitize;
