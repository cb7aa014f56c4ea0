//! Teams delivery through a workflow (Logic Apps / Power Automate) HTTP trigger.
//!
//! The workflow expects a Bot Framework style message with one Adaptive Card attachment and
//! posts it into the channel. Any 2xx (Logic Apps answers `202 Accepted`) counts as delivered.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use relay_common::config::truncate_chars;
use relay_common::types::DeliveryOutcome;

use crate::Notifier;

/// Upper bound for a single workflow call.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum characters of an error body kept in a `Failed` outcome.
const ERROR_BODY_LIMIT: usize = 200;

/// Posts answers to a Teams workflow URL.
#[derive(Clone)]
pub struct TeamsWorkflowNotifier {
    workflow_url: String,
    model: String,
    client: reqwest::Client,
}

impl TeamsWorkflowNotifier {
    pub fn new(workflow_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            workflow_url: workflow_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the workflow payload: one Adaptive Card holding question, answer and model.
    pub fn build_payload(&self, question: &str, answer: &str) -> serde_json::Value {
        json!({
            "type": "message",
            "attachments": [{
                "contentType": "application/vnd.microsoft.card.adaptive",
                "contentUrl": null,
                "content": {
                    "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
                    "type": "AdaptiveCard",
                    "version": "1.4",
                    "body": [
                        {
                            "type": "TextBlock",
                            "text": "質問",
                            "weight": "Bolder",
                            "size": "Medium"
                        },
                        {
                            "type": "TextBlock",
                            "text": question,
                            "wrap": true
                        },
                        {
                            "type": "TextBlock",
                            "text": "回答",
                            "weight": "Bolder",
                            "size": "Medium",
                            "separator": true
                        },
                        {
                            "type": "TextBlock",
                            "text": answer,
                            "wrap": true
                        },
                        {
                            "type": "TextBlock",
                            "text": format!("model: {}", self.model),
                            "isSubtle": true,
                            "size": "Small"
                        }
                    ]
                }
            }]
        })
    }
}

#[async_trait]
impl Notifier for TeamsWorkflowNotifier {
    async fn send_answer(&self, question: &str, answer: &str) -> DeliveryOutcome {
        if self.workflow_url.trim().is_empty() {
            return DeliveryOutcome::NotConfigured;
        }

        let payload = self.build_payload(question, answer);

        let res = match self
            .client
            .post(&self.workflow_url)
            .timeout(SEND_TIMEOUT)
            .json(&payload)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                tracing::debug!(error = %e, "Teams workflow request failed");
                return DeliveryOutcome::Failed(format!("request failed: {}", e));
            }
        };

        let status = res.status();
        if status.is_success() {
            tracing::debug!(status = %status, "Teams workflow accepted message");
            return DeliveryOutcome::Delivered;
        }

        let body = res.text().await.unwrap_or_default();
        DeliveryOutcome::Failed(format!(
            "workflow returned {}: {}",
            status,
            truncate_chars(&body, ERROR_BODY_LIMIT)
        ))
    }
}
