//! Configuration management for the HelvarNet MCP server
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Command line flags are applied on top by the binary.

use crate::error::{HelvarError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Router address used when nothing else is configured
pub const DEFAULT_HOST: &str = "192.168.1.129";
/// HelvarNet TCP port
pub const DEFAULT_PORT: u16 = 50000;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// HelvarNet router connection
    pub router: RouterConfig,

    /// MCP server identity
    pub mcp: McpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// In-process router simulation
    pub simulation: SimulationConfig,
}

/// HelvarNet router configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Router IP address or host name
    pub host: String,

    /// Router TCP port
    pub port: u16,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// MCP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct McpConfig {
    /// Server name
    pub name: String,

    /// Server version
    pub version: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            name: "HelvarNet MCP Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    pub level: String,

    /// Emit JSON lines instead of compact text
    pub json_format: bool,

    /// Daily-rotated log file, in addition to stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file: None,
        }
    }
}

/// Simulated router configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Serve the built-in demo installation
    pub enabled: bool,

    /// Serve an installation loaded from this TOML snapshot
    pub snapshot: Option<PathBuf>,
}

impl SimulationConfig {
    /// Whether any simulated router should be started
    pub fn is_active(&self) -> bool {
        self.enabled || self.snapshot.is_some()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables over defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HelvarError::config(format!("Cannot read config file {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Defaults, then the optional file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `HELVAR_*` and `RUST_LOG` variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = env::var("HELVAR_HOST") {
            self.router.host = host;
        }

        if let Ok(port) = env::var("HELVAR_PORT") {
            self.router.port = port
                .trim()
                .parse()
                .map_err(|e| HelvarError::config(format!("Invalid HELVAR_PORT: {e}")))?;
        }

        if let Ok(simulate) = env::var("HELVAR_SIMULATE") {
            self.simulation.enabled = parse_flag("HELVAR_SIMULATE", &simulate)?;
        }

        if let Ok(snapshot) = env::var("HELVAR_SNAPSHOT") {
            self.simulation.snapshot = Some(PathBuf::from(snapshot));
        }

        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }

        if let Ok(json) = env::var("HELVAR_LOG_JSON") {
            self.logging.json_format = parse_flag("HELVAR_LOG_JSON", &json)?;
        }

        if let Ok(log_file) = env::var("HELVAR_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(log_file));
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.router.host.trim().is_empty() {
            return Err(HelvarError::config("Router host cannot be empty"));
        }

        if self.router.port == 0 {
            return Err(HelvarError::config("Router port must be greater than zero"));
        }

        if let Some(snapshot) = &self.simulation.snapshot {
            if !snapshot.is_file() {
                return Err(HelvarError::config(format!(
                    "Snapshot file {} does not exist",
                    snapshot.display()
                )));
            }
        }

        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(HelvarError::config(format!(
            "Invalid {name}: '{other}'. Use true or false"
        ))),
    }
}
