//! Outbound notification channels.
//!
//! A [`Notifier`] delivers a generated answer back to the chat platform. Delivery is a single
//! best-effort attempt; the result is reported as a [`DeliveryOutcome`] instead of an error.

pub mod teams;

use async_trait::async_trait;

pub use relay_common::types::DeliveryOutcome;
pub use teams::TeamsWorkflowNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `answer` to `question`'s conversation. Never panics on transport errors.
    async fn send_answer(&self, question: &str, answer: &str) -> DeliveryOutcome;
}
