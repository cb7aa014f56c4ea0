use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Text returned to Teams immediately after a message is accepted.
pub const ACK_TEXT: &str = "リクエストを受け付けました。回答を生成中です...";

/// The only part of a Teams outgoing-webhook payload the relay reads.
///
/// Everything other than `text` is opaque and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
}

impl InboundMessage {
    /// Parse a raw request body, requiring a string `text` field.
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        let payload: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Request body is not valid JSON: {}", e)))?;

        match payload.get("text") {
            Some(serde_json::Value::String(text)) => Ok(Self { text: text.clone() }),
            Some(_) => Err(AppError::Validation(
                "text field must be a string".to_string(),
            )),
            None => Err(AppError::Validation("text field not found".to_string())),
        }
    }
}

/// Synchronous reply to the Teams outgoing webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Acknowledgment {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl Acknowledgment {
    pub fn accepted() -> Self {
        Self {
            kind: "message".to_string(),
            text: ACK_TEXT.to_string(),
        }
    }
}

/// Result of a single notification attempt. Senders return this instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
    NotConfigured,
}

/// Backend connectivity as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Connected,
    Disconnected,
}

/// Notification channel state as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelStatus {
    #[serde(rename = "configured")]
    Configured,
    #[serde(rename = "not configured")]
    NotConfigured,
}

/// Body of a successful `/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
    pub system: String,
    pub ollama_status: BackendStatus,
    pub teams_webhook_status: ChannelStatus,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extracts_text_and_ignores_rest() {
        let body = br#"{"type":"message","text":"<at>Bot</at> hello","from":{"id":"29:1"}}"#;
        let msg = InboundMessage::parse(body).unwrap();
        assert_eq!(msg.text, "<at>Bot</at> hello");
    }

    #[test]
    fn test_parse_rejects_missing_or_non_string_text() {
        assert!(matches!(
            InboundMessage::parse(br#"{"type":"message"}"#),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            InboundMessage::parse(br#"{"text":42}"#),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            InboundMessage::parse(b"not json"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            InboundMessage::parse(br#"["text"]"#),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_acknowledgment_shape() {
        let json = serde_json::to_value(Acknowledgment::accepted()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "message", "text": ACK_TEXT })
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(ChannelStatus::NotConfigured).unwrap(),
            "not configured"
        );
        assert_eq!(
            serde_json::to_value(BackendStatus::Connected).unwrap(),
            "connected"
        );
    }
}
