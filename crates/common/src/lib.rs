//! Shared configuration, error and message types for the Ollama relay.

pub mod config;
pub mod error;
pub mod types;
