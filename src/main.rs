//! HelvarNet MCP Server - Main Entry Point
//!
//! Serves the HelvarNet tools over stdio. Without `--simulate` or `--snapshot`
//! there is no router backend and the server starts unconnected.

use helvarnet_mcp::{
    config::ServerConfig,
    logging::init_logging,
    router::{HelvarRouter, RouterSnapshot, SimulatedRouter},
    HelvarError, HelvarMcpServer, Result,
};

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// HelvarNet MCP Server Configuration
#[derive(Parser, Debug)]
#[command(name = "helvarnet-mcp-server")]
#[command(about = "MCP server for HelvarNet DALI lighting routers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// HelvarNet router host
    #[arg(short = 'H', long, env = "HELVAR_HOST")]
    host: Option<String>,

    /// HelvarNet router port
    #[arg(short, long, env = "HELVAR_PORT")]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(long, env = "HELVAR_CONFIG")]
    config: Option<PathBuf>,

    /// Serve the built-in demo installation instead of a real router
    #[arg(long)]
    simulate: bool,

    /// Serve an installation loaded from a TOML snapshot
    #[arg(long, env = "HELVAR_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Apply command line overrides on top of file and environment values
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.router.host = host.clone();
        }
        if let Some(port) = self.port {
            config.router.port = port;
        }
        if self.simulate {
            config.simulation.enabled = true;
        }
        if let Some(snapshot) = &self.snapshot {
            config.simulation.snapshot = Some(snapshot.clone());
        }
    }
}

/// Build and initialize the router. Failures are logged and yield `None`.
async fn connect_router(config: &ServerConfig) -> Option<Arc<dyn HelvarRouter>> {
    let host = config.router.host.as_str();
    let port = config.router.port;

    let router = match &config.simulation.snapshot {
        Some(path) => {
            info!("📂 Loading router snapshot from {}", path.display());
            RouterSnapshot::load(path).map(|snapshot| SimulatedRouter::new(snapshot, host, port))
        }
        None if config.simulation.enabled => {
            info!("🧪 Using built-in demo installation");
            SimulatedRouter::demo(host, port)
        }
        None => {
            warn!(
                "No router backend configured for {}:{}. Start with --simulate or --snapshot",
                host, port
            );
            return None;
        }
    };

    let router = match router {
        Ok(router) => router,
        Err(e) => {
            error!("Failed to build router: {}", e);
            warn!("Continuing without router connection. Some features may not work.");
            return None;
        }
    };

    match router.initialize().await {
        Ok(()) => {
            info!("✅ Router {}:{} initialized", host, port);
            Some(Arc::new(router))
        }
        Err(e) => {
            error!("Failed to connect to router at {}:{}: {}", host, port, e);
            warn!("Continuing without router connection. Some features may not work.");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    // Held for the lifetime of the process so file logs keep flushing
    let _log_guard = init_logging(&config.logging, cli.debug)?;

    config.validate()?;

    info!(
        "🚀 Starting HelvarNet MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let server = match connect_router(&config).await {
        Some(router) => HelvarMcpServer::with_router(router, config),
        None => HelvarMcpServer::unconnected(config),
    };

    let mut mcp_server = server
        .serve_stdio()
        .await
        .map_err(|e| HelvarError::connection(format!("Failed to start server: {e}")))?;

    info!("✅ Server started on stdio");
    mcp_server
        .run()
        .await
        .map_err(|e| HelvarError::connection(format!("Server error: {e}")))?;

    info!("👋 HelvarNet MCP Server stopped");
    Ok(())
}
