//! Server configuration loading from file and environment variables.

use progrify_voice::LiveKitConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LiveKit credentials and fixed room/identity settings.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "progrify_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `PROGRIFY_HOST` overrides `server.host`
/// - `PROGRIFY_PORT` overrides `server.port`
/// - `PROGRIFY_LOG_LEVEL` overrides `logging.level`
/// - `PROGRIFY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `LIVEKIT_URL` / `LIVEKIT_API_KEY` / `LIVEKIT_API_SECRET` override the
///   corresponding `livekit` fields
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("PROGRIFY_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("PROGRIFY_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("PROGRIFY_LOG_LEVEL") {
        if !level.trim().is_empty() {
            config.logging.level = level;
        }
    }
    if let Ok(json) = std::env::var("PROGRIFY_LOG_JSON") {
        config.logging.json = json == "true";
    }
    if let Ok(url) = std::env::var("LIVEKIT_URL") {
        if !url.trim().is_empty() {
            config.livekit.url = url;
        }
    }
    if let Ok(key) = std::env::var("LIVEKIT_API_KEY") {
        if !key.trim().is_empty() {
            config.livekit.api_key = key;
        }
    }
    if let Ok(secret) = std::env::var("LIVEKIT_API_SECRET") {
        if !secret.trim().is_empty() {
            config.livekit.api_secret = secret;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // load_config always applies environment overrides, so every test
    // here serializes on this lock to keep env mutations from racing.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn defaults_when_no_path() {
        let _guard = env_guard();
        let config = load_config(None).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.livekit.room, "default_room");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let _guard = env_guard();
        let config = load_config(Some("/nonexistent/progrify.toml")).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn env_vars_override_server_and_livekit_settings() {
        let _guard = env_guard();
        std::env::set_var("PROGRIFY_PORT", "9200");
        std::env::set_var("PROGRIFY_LOG_LEVEL", "trace");
        std::env::set_var("LIVEKIT_URL", "wss://env.livekit.cloud");

        let config = load_config(None).unwrap();

        std::env::remove_var("PROGRIFY_PORT");
        std::env::remove_var("PROGRIFY_LOG_LEVEL");
        std::env::remove_var("LIVEKIT_URL");

        assert_eq!(config.server.port, 9200);
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.livekit.url, "wss://env.livekit.cloud");
    }

    #[test]
    fn unparseable_env_port_keeps_default() {
        let _guard = env_guard();
        std::env::set_var("PROGRIFY_PORT", "not-a-port");

        let config = load_config(None).unwrap();

        std::env::remove_var("PROGRIFY_PORT");

        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn parses_toml_file() {
        let _guard = env_guard();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[livekit]
url = "wss://example.livekit.cloud"
api_key = "key"
api_secret = "secret"
room = "classroom"

[logging]
level = "debug"
json = true
"#
        )
        .unwrap();

        let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.livekit.url, "wss://example.livekit.cloud");
        assert_eq!(config.livekit.room, "classroom");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let _guard = env_guard();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = nope").unwrap();

        let err = load_config(Some(file.path().to_str().unwrap())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
