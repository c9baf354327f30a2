//! Runtime configuration: TOML file, `.env` and `CONNECT4_*` overrides.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable naming the game server URL for remote clients.
pub const ENV_API_URL: &str = "CONNECT4_API_URL";
/// Environment variable overriding the server port.
pub const ENV_PORT: &str = "CONNECT4_PORT";
/// Environment variable overriding the server bind host.
pub const ENV_HOST: &str = "CONNECT4_HOST";
/// Environment variable overriding the remote polling interval.
pub const ENV_POLL_INTERVAL_MS: &str = "CONNECT4_POLL_INTERVAL_MS";

/// Settings shared by the server and both coordinators.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Config {
    /// Host the server binds to.
    #[serde(default = "default_host")]
    host: String,

    /// Port the server binds to.
    #[serde(default = "default_port")]
    port: u16,

    /// Base URL remote clients talk to.
    #[serde(default = "default_api_url")]
    api_url: String,

    /// Delay between status polls in the remote topology.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Consecutive failed polls tolerated before a remote client gives up.
    #[serde(default = "default_max_poll_failures")]
    max_poll_failures: u32,

    /// Pause before the heuristic bot answers.
    #[serde(default = "default_bot_think_ms")]
    bot_think_ms: u64,

    /// Where interactive modes write their logs.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_api_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_poll_failures() -> u32 {
    5
}

fn default_bot_think_ms() -> u64 {
    500
}

fn default_log_file() -> PathBuf {
    PathBuf::from("connect4.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_url: default_api_url(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_failures: default_max_poll_failures(),
            bot_think_ms: default_bot_think_ms(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(port = config.port, api_url = %config.api_url, "Config loaded successfully");
        Ok(config)
    }

    /// Resolves the effective configuration.
    ///
    /// An explicit path must exist. Without one, defaults are used. The
    /// process environment is applied last. Runs before logging is set up,
    /// so it reports only through its result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `CONNECT4_*` overrides looked up through `vars`.
    pub fn with_overrides(
        mut self,
        vars: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = vars(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(host) = vars(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = vars(ENV_PORT) {
            self.port = port.trim().parse().map_err(|e| {
                ConfigError::new(format!("{} must be a port number: {}", ENV_PORT, e))
            })?;
        }
        if let Some(ms) = vars(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = ms.trim().parse().map_err(|e| {
                ConfigError::new(format!("{} must be milliseconds: {}", ENV_POLL_INTERVAL_MS, e))
            })?;
        }
        Ok(self)
    }

    /// Replaces the bind address, keeping unset parts.
    pub fn with_bind(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Replaces the server URL when one is given.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        self
    }

    /// [`Config::poll_interval_ms`] as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// [`Config::bot_think_ms`] as a [`Duration`].
    pub fn bot_think_time(&self) -> Duration {
        Duration::from_millis(self.bot_think_ms)
    }

    /// `host:port` for the server listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
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
    /// Creates a new configuration error at the caller's location.
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
