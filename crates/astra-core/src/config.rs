use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Astra application.
///
/// Loaded from `astra.toml` by default. Each section corresponds to one
/// external collaborator or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AstraConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AstraConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AstraConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file does not
    /// exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Overlay secrets from environment variables onto file values.
    ///
    /// Credentials are normally kept out of the TOML file; env vars win
    /// whenever they are set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("ASTRA_GRAPH_URI") {
            self.graph.uri = v;
        }
        if let Ok(v) = std::env::var("ASTRA_GRAPH_USER") {
            self.graph.user = v;
        }
        if let Ok(v) = std::env::var("ASTRA_GRAPH_PASSWORD") {
            self.graph.password = v;
        }
        if let Ok(v) = std::env::var("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = v;
        }
        if let Ok(v) = std::env::var("TWILIO_AUTH_TOKEN") {
            self.twilio.auth_token = v;
        }
        if let Ok(v) = std::env::var("TWILIO_PHONE_NUMBER") {
            self.twilio.phone_number = v;
        }
        self
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// API server port.
    pub port: u16,
    /// Display name the bot signs its replies with.
    pub bot_name: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Public base URL the webhook is reachable at; the provider signs
    /// requests against this URL, so it must match what Twilio calls.
    pub public_base_url: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            bot_name: "Astra".to_string(),
            log_level: "info".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Graph store (Neo4j) connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// HTTP endpoint of the Neo4j transaction API.
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Database name within the server.
    pub database: String,
    /// Per-query timeout; kept well under the webhook's 30 s budget so a
    /// slow store never exhausts it.
    pub query_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:7474".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            query_timeout_secs: 10,
        }
    }
}

/// Messaging provider (Twilio) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sending phone number; `whatsapp:` prefix is added when missing.
    pub phone_number: String,
    /// Reject webhook requests whose signature does not verify.
    pub validate_signatures: bool,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            phone_number: String::new(),
            validate_signatures: true,
        }
    }
}

impl TwilioConfig {
    /// Whether send credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty()
    }
}

/// Session store limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hard cap on live sessions; oldest-by-activity evicted beyond this.
    pub max_sessions: usize,
    /// Idle timeout applied on every opportunistic sweep.
    pub idle_timeout_secs: u64,
    /// Deep-sweep horizon for the periodic cleanup pass.
    pub deep_sweep_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            idle_timeout_secs: 30 * 60,
            deep_sweep_hours: 24,
        }
    }
}
