//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `homesync.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use homesync_app::hub::HubSettings;
use homesync_domain::device::TemperatureBounds;
use homesync_domain::state::SystemState;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Simulated device settings.
    pub devices: DevicesConfig,
    /// Hub and event bus sizing.
    pub hub: HubConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Directory served for any path not handled by the API.
    pub static_dir: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Simulated device configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    /// Time the coffee machine takes to brew, in milliseconds.
    pub brew_delay_ms: u64,
    /// Lowest accepted air-conditioner temperature.
    pub ac_min_celsius: i32,
    /// Highest accepted air-conditioner temperature.
    pub ac_max_celsius: i32,
    /// Air-conditioner temperature at startup.
    pub ac_default_celsius: i32,
}

/// Hub sizing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Events buffered per subscriber before it starts lagging.
    pub event_capacity: usize,
    /// Commands queued before submitters wait.
    pub request_capacity: usize,
}

impl Config {
    /// Load configuration from `homesync.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homesync.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HOMESYNC_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("HOMESYNC_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("HOMESYNC_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("HOMESYNC_STATIC_DIR") {
            self.server.static_dir = val;
        }
        if let Ok(val) = std::env::var("HOMESYNC_BREW_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                self.devices.brew_delay_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("HOMESYNC_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.devices.brew_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "brew_delay_ms must be non-zero".to_string(),
            ));
        }
        if self.devices.ac_min_celsius > self.devices.ac_max_celsius {
            return Err(ConfigError::Validation(
                "ac_min_celsius must not exceed ac_max_celsius".to_string(),
            ));
        }
        if !self
            .temperature_bounds()
            .contains(self.devices.ac_default_celsius)
        {
            return Err(ConfigError::Validation(
                "ac_default_celsius must lie within the AC bounds".to_string(),
            ));
        }
        if self.hub.event_capacity == 0 || self.hub.request_capacity == 0 {
            return Err(ConfigError::Validation(
                "hub capacities must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Air-conditioner temperature bounds.
    #[must_use]
    pub fn temperature_bounds(&self) -> TemperatureBounds {
        TemperatureBounds {
            min: self.devices.ac_min_celsius,
            max: self.devices.ac_max_celsius,
        }
    }

    /// Settings for the hub event loop.
    #[must_use]
    pub fn hub_settings(&self) -> HubSettings {
        HubSettings {
            brew_delay: Duration::from_millis(self.devices.brew_delay_ms),
            initial_state: SystemState::new(
                self.devices.ac_default_celsius,
                self.temperature_bounds(),
            ),
            request_capacity: self.hub.request_capacity,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homesyncd=info,homesync=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            brew_delay_ms: 4000,
            ac_min_celsius: 16,
            ac_max_celsius: 30,
            ac_default_celsius: 22,
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            event_capacity: 256,
            request_capacity: 64,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
