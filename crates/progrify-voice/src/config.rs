use crate::error::VoiceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local-development LiveKit defaults, matching the sidecar's out-of-box
/// credentials. Never valid against a hosted deployment.
pub const DEV_LIVEKIT_URL: &str = "http://localhost:7880";
pub const DEV_LIVEKIT_API_KEY: &str = "devkey";
pub const DEV_LIVEKIT_API_SECRET: &str = "secret";

fn default_token_ttl_seconds() -> u64 {
    3600
}

fn default_room() -> String {
    "default_room".to_string()
}

fn default_agent_identity() -> String {
    "ai-agent".to_string()
}

fn default_agent_name() -> String {
    "AI Assistant".to_string()
}

/// Connection and identity settings for the hosted LiveKit deployment.
///
/// The room name and agent identity are fixed per deployment: the agent
/// always joins the same room under the same identity, and that identity
/// is also what inbound data events are checked against for self-loop
/// suppression.
#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    pub url: String,
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    /// Room the agent joins and tokens grant access to.
    #[serde(default = "default_room")]
    pub room: String,
    /// Participant identity the agent connects under.
    #[serde(default = "default_agent_identity")]
    pub agent_identity: String,
    /// Display name attached to the agent's token.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    /// JWT token TTL in seconds for LiveKit access tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            room: default_room(),
            agent_identity: default_agent_identity(),
            agent_name: default_agent_name(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("room", &self.room)
            .field("agent_identity", &self.agent_identity)
            .field("agent_name", &self.agent_name)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            ..Self::default()
        }
    }

    /// Loads credentials from `LIVEKIT_URL`, `LIVEKIT_API_KEY`, and
    /// `LIVEKIT_API_SECRET`. All three must be set.
    pub fn from_env() -> Result<Self, VoiceError> {
        let url = require_env("LIVEKIT_URL")?;
        let api_key = require_env("LIVEKIT_API_KEY")?;
        let api_secret = require_env("LIVEKIT_API_SECRET")?;
        Ok(Self::new(url, api_key, api_secret))
    }

    /// Like [`from_env`](Self::from_env), but falls back to the local
    /// development defaults for any variable that is unset. Only for dev
    /// run modes.
    pub fn from_env_or_dev() -> Self {
        Self::new(
            std::env::var("LIVEKIT_URL").unwrap_or_else(|_| DEV_LIVEKIT_URL.to_string()),
            std::env::var("LIVEKIT_API_KEY").unwrap_or_else(|_| DEV_LIVEKIT_API_KEY.to_string()),
            std::env::var("LIVEKIT_API_SECRET")
                .unwrap_or_else(|_| DEV_LIVEKIT_API_SECRET.to_string()),
        )
    }
}

fn require_env(name: &str) -> Result<String, VoiceError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(VoiceError::Config(format!(
            "environment variable {} is not set",
            name
        ))),
    }
}
