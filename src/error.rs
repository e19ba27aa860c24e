//! Error types for the HelvarNet MCP server
//!
//! Every failure inside the crate is a [`HelvarError`]. Tools never surface
//! these as protocol errors; the tool boundary renders them as an `{"error": ...}`
//! payload (see [`crate::tools::to_payload`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for HelvarNet operations
pub type Result<T> = std::result::Result<T, HelvarError>;

/// Error types for HelvarNet MCP operations
#[derive(Error, Debug)]
pub enum HelvarError {
    /// The server holds no router handle
    #[error("Router not initialized. Please configure router connection first.")]
    NotConnected,

    /// Connection errors reported by the router collaborator
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors (addresses, ranges, filters)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found errors (devices, groups)
    #[error("{0}")]
    NotFound(String),

    /// A command was rejected or failed on the router
    #[error("Command failed: {0}")]
    Command(String),

    /// JSON serialization errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors (config and snapshot files)
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Structured error code for machine-readable error handling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Connection errors (1000-1099)
    RouterNotConnected,
    ConnectionLost,

    // Configuration errors (1200-1299)
    ConfigurationInvalid,

    // Device errors (1300-1399)
    DeviceNotFound,
    CommandFailed,

    // Data errors (1400-1499)
    ParsingFailed,
    InvalidInput,

    // Internal errors (1900-1999)
    InternalError,
}

impl ErrorCode {
    /// Get numeric error code
    pub fn as_number(&self) -> u32 {
        match self {
            ErrorCode::RouterNotConnected => 1001,
            ErrorCode::ConnectionLost => 1003,
            ErrorCode::ConfigurationInvalid => 1202,
            ErrorCode::DeviceNotFound => 1301,
            ErrorCode::CommandFailed => 1303,
            ErrorCode::ParsingFailed => 1401,
            ErrorCode::InvalidInput => 1402,
            ErrorCode::InternalError => 1901,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self.as_number() {
            1000..=1099 => "connection",
            1200..=1299 => "configuration",
            1300..=1399 => "device",
            1400..=1499 => "data",
            1900..=1999 => "internal",
            _ => "unknown",
        }
    }
}

impl HelvarError {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a command error
    pub fn command<S: Into<String>>(msg: S) -> Self {
        Self::Command(msg.into())
    }

    /// Map HelvarError to structured error code
    pub fn to_error_code(&self) -> ErrorCode {
        match self {
            HelvarError::NotConnected => ErrorCode::RouterNotConnected,
            HelvarError::Connection(_) => ErrorCode::ConnectionLost,
            HelvarError::Config(_) | HelvarError::Toml(_) => ErrorCode::ConfigurationInvalid,
            HelvarError::InvalidInput(_) => ErrorCode::InvalidInput,
            HelvarError::NotFound(_) => ErrorCode::DeviceNotFound,
            HelvarError::Command(_) => ErrorCode::CommandFailed,
            HelvarError::Json(_) => ErrorCode::ParsingFailed,
            HelvarError::Io(_) | HelvarError::Generic(_) => ErrorCode::InternalError,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, HelvarError::Connection(_) | HelvarError::Io(_))
    }
}

// Implement ErrorClassification trait for HelvarError to work with mcp-logging
impl pulseengine_mcp_logging::ErrorClassification for HelvarError {
    fn error_type(&self) -> &str {
        match self {
            HelvarError::NotConnected => "not_connected_error",
            HelvarError::Connection(_) => "connection_error",
            HelvarError::Config(_) => "config_error",
            HelvarError::InvalidInput(_) => "invalid_input_error",
            HelvarError::NotFound(_) => "not_found_error",
            HelvarError::Command(_) => "command_error",
            HelvarError::Json(_) => "json_error",
            HelvarError::Toml(_) => "toml_error",
            HelvarError::Io(_) => "io_error",
            HelvarError::Generic(_) => "generic_error",
        }
    }

    fn is_retryable(&self) -> bool {
        self.is_retryable()
    }

    fn is_timeout(&self) -> bool {
        false
    }

    fn is_auth_error(&self) -> bool {
        false
    }

    fn is_connection_error(&self) -> bool {
        matches!(self, HelvarError::NotConnected | HelvarError::Connection(_))
    }
}
