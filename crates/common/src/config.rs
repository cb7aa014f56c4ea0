
/// Default Ollama generate endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";

/// Default model used when `OLLAMA_MODEL` is unset.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Phrase users type to address the bot; stripped from the query before generation.
pub const DEFAULT_TRIGGER_PHRASE: &str = "ollama質問";

/// Global application configuration loaded from environment variables.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ollama `/api/generate` URL
    pub ollama_url: String,

    /// Model identifier passed to Ollama
    pub ollama_model: String,

    /// Generation timeout in seconds (default: 60)
    pub ollama_timeout_secs: u64,

    /// Shared secret of the Teams outgoing webhook
    pub teams_outgoing_token: Option<String>,

    /// Teams workflow (Logic Apps) URL receiving the generated answers
    pub teams_workflow_url: Option<String>,

    /// Reject inbound requests whose HMAC signature does not verify (default: true)
    pub require_signature: bool,

    /// Trigger phrase removed from incoming messages
    pub trigger_phrase: String,

    /// Bind host (default: 0.0.0.0)
    pub host: String,

    /// Bind port (default: 5010)
    pub port: u16,

    /// Verbose logging
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from environment variables, reading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            ollama_url: get("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            ollama_model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            ollama_timeout_secs: get("OLLAMA_TIMEOUT")
                .unwrap_or_else(|| "60".to_string())
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("OLLAMA_TIMEOUT must be a valid u64"))?,
            teams_outgoing_token: get("TEAMS_OUTGOING_TOKEN"),
            teams_workflow_url: get("TEAMS_WORKFLOW_URL"),
            require_signature: match get("REQUIRE_SIGNATURE") {
                Some(v) => parse_bool(&v)
                    .ok_or_else(|| anyhow::anyhow!("REQUIRE_SIGNATURE must be a boolean"))?,
                None => true,
            },
            trigger_phrase: get("TRIGGER_PHRASE")
                .unwrap_or_else(|| DEFAULT_TRIGGER_PHRASE.to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT")
                .unwrap_or_else(|| "5010".to_string())
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16"))?,
            debug: match get("DEBUG") {
                Some(v) => {
                    parse_bool(&v).ok_or_else(|| anyhow::anyhow!("DEBUG must be a boolean"))?
                }
                None => false,
            },
        })
    }

    /// Log the loaded configuration without leaking secrets.
    pub fn log_summary(&self) {
        tracing::info!(
            ollama_url = %self.ollama_url,
            ollama_model = %self.ollama_model,
            ollama_timeout_secs = self.ollama_timeout_secs,
            teams_outgoing_token = if self.teams_outgoing_token.is_some() { "set" } else { "unset" },
            require_signature = self.require_signature,
            debug = self.debug,
            "Configuration loaded"
        );

        match &self.teams_workflow_url {
            Some(url) => tracing::info!(
                teams_workflow_url = %format!("{}...", truncate_chars(url, 30)),
                "Teams workflow URL configured"
            ),
            None => tracing::error!("TEAMS_WORKFLOW_URL is not set; answers cannot be delivered"),
        }

        if !self.require_signature {
            tracing::warn!("Signature verification is DISABLED; every request is accepted");
        } else if self.teams_outgoing_token.is_none() {
            tracing::warn!("TEAMS_OUTGOING_TOKEN is not set; every webhook request will be rejected");
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Return at most the first `max` characters of `s`, respecting char boundaries.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
        assert_eq!(config.ollama_model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.ollama_timeout_secs, 60);
        assert_eq!(config.port, 5010);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.trigger_phrase, DEFAULT_TRIGGER_PHRASE);
        assert!(config.require_signature);
        assert!(!config.debug);
        assert!(config.teams_outgoing_token.is_none());
        assert!(config.teams_workflow_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("OLLAMA_URL", "http://gpu-box:11434/api/generate"),
            ("OLLAMA_MODEL", "mistral"),
            ("OLLAMA_TIMEOUT", "120"),
            ("TEAMS_OUTGOING_TOKEN", "c2VjcmV0"),
            ("TEAMS_WORKFLOW_URL", "https://example.logic.azure.com/workflows/1"),
            ("REQUIRE_SIGNATURE", "false"),
            ("PORT", "8080"),
            ("DEBUG", "1"),
        ]))
        .unwrap();
        assert_eq!(config.ollama_url, "http://gpu-box:11434/api/generate");
        assert_eq!(config.ollama_model, "mistral");
        assert_eq!(config.ollama_timeout_secs, 120);
        assert_eq!(config.teams_outgoing_token.as_deref(), Some("c2VjcmV0"));
        assert!(config.teams_workflow_url.is_some());
        assert!(!config.require_signature);
        assert_eq!(config.port, 8080);
        assert!(config.debug);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("TEAMS_OUTGOING_TOKEN", ""),
            ("TEAMS_WORKFLOW_URL", "   "),
            ("OLLAMA_MODEL", ""),
        ]))
        .unwrap();
        assert!(config.teams_outgoing_token.is_none());
        assert!(config.teams_workflow_url.is_none());
        assert_eq!(config.ollama_model, DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("OLLAMA_TIMEOUT", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "70000")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("REQUIRE_SIGNATURE", "maybe")])).is_err());
    }

    #[test]
    fn test_debug_flag() {
        for on in ["1", "true", "YES", "on"] {
            let config = AppConfig::from_lookup(lookup_from(&[("DEBUG", on)])).unwrap();
            assert!(config.debug, "{} should enable debug", on);
        }
        let config = AppConfig::from_lookup(lookup_from(&[("DEBUG", "0")])).unwrap();
        assert!(!config.debug);

        // The Flask-era variable is not consulted.
        let config = AppConfig::from_lookup(lookup_from(&[("FLASK_DEBUG", "1")])).unwrap();
        assert!(!config.debug);

        assert!(AppConfig::from_lookup(lookup_from(&[("DEBUG", "loud")])).is_err());
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("質問です", 2), "質問");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
