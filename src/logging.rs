//! Logging setup and tool call logging
//!
//! Output always goes to stderr because stdout carries the MCP stdio
//! transport. A daily-rotated file can be added through [`LoggingConfig::file`].

use crate::config::LoggingConfig;
use crate::error::{HelvarError, Result};
use std::path::Path;
use std::time::Instant;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Filter from the configured directive; `debug` wins over everything
pub fn build_filter(level: &str, debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. The returned guard must be held for as long
/// as file logging should keep flushing.
pub fn init_logging(config: &LoggingConfig, debug: bool) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let stderr_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .boxed()
    };
    layers.push(stderr_layer);

    let guard = match &config.file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            layers.push(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(build_filter(&config.level, debug))
        .try_init()
        .map_err(|e| HelvarError::config(format!("Failed to initialize logging: {e}")))?;

    Ok(guard)
}

fn file_appender(path: &Path) -> Result<tracing_appender::rolling::RollingFileAppender> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| HelvarError::config(format!("Invalid log file path {}", path.display())))?;

    Ok(tracing_appender::rolling::daily(directory, file_name))
}

/// Entry and exit logging for MCP tool calls
pub struct ToolCallLogger {
    tool: &'static str,
    started: Instant,
}

impl ToolCallLogger {
    /// Log tool invocation
    pub fn start(tool: &'static str, params: &serde_json::Value) -> Self {
        tracing::info!(tool, params = %params, "MCP tool called");
        Self {
            tool,
            started: Instant::now(),
        }
    }

    /// Log tool completion; a payload carrying an `error` key counts as failure
    pub fn finish(self, response: &serde_json::Value) {
        let duration_ms = self.started.elapsed().as_millis() as u64;
        match response.get("error") {
            None => tracing::info!(
                tool = self.tool,
                duration_ms,
                "MCP tool completed successfully"
            ),
            Some(error) => tracing::warn!(
                tool = self.tool,
                duration_ms,
                error = %error,
                "MCP tool failed"
            ),
        }
    }
}
