//! Server and terminal-client configuration.
//!
//! Server settings are layered, later layers winning: built-in defaults, an
//! optional TOML file, environment variables (`.env` is loaded into the
//! environment at startup), then command-line flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use velha_tictactoe::Difficulty;

/// Environment variable overriding the listen port.
pub const PORT_VAR: &str = "PORT";

/// Environment variable overriding the listen host.
pub const HOST_VAR: &str = "VELHA_HOST";

/// Relay server settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    #[instrument(skip(self, lookup))]
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(port) = lookup(PORT_VAR) {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {} {:?}: {}", PORT_VAR, port, e)))?;
            debug!(port = self.port, "Port from environment");
        }
        if let Some(host) = lookup(HOST_VAR).filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
            debug!(host = %self.host, "Host from environment");
        }
        Ok(self)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Resolves every layer: defaults, `file`, process environment, flags.
    #[instrument(skip(host, port))]
    pub fn resolve(
        file: Option<&Path>,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base
            .with_env(|key| std::env::var(key).ok())?
            .with_overrides(host, port);
        info!(address = %config.address(), "Server configuration resolved");
        Ok(config)
    }

    /// `host:port` for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Terminal client settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PlayConfig {
    /// Computer strength.
    difficulty: Difficulty,

    /// Pause before the computer's reply is shown.
    delay: Duration,

    /// Directory holding the score file.
    scores_dir: PathBuf,
}

impl PlayConfig {
    /// Creates terminal client settings.
    pub fn new(difficulty: Difficulty, delay: Duration, scores_dir: PathBuf) -> Self {
        Self {
            difficulty,
            delay,
            scores_dir,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
