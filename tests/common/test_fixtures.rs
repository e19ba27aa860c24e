//! Test fixtures and utilities for consistent test setup
//!
//! Provides the demo installation behind a server, small snapshots for
//! edge cases, and helpers for inspecting what the router was sent.

use helvarnet_mcp::config::ServerConfig;
use helvarnet_mcp::router::{Command, CommandType, HelvarRouter, RouterSnapshot, SimulatedRouter};
use helvarnet_mcp::HelvarMcpServer;
use rstest::*;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const TEST_HOST: &str = "127.0.0.1";
pub const TEST_PORT: u16 = 50000;

/// Two groups sharing a display name, each with one light
pub const DUPLICATE_NAMES_SNAPSHOT: &str = r#"
workgroup_name = "Test Site"
cluster_id = 2

[[groups]]
id = 3
name = "Kitchen"

[[groups]]
id = 5
name = "Kitchen"

[[devices]]
address = "1.2.1.1"
name = "Kitchen Spot A"
type = "LED driver"
load_level = 20
groups = [3]
scenes = { "1.1" = 100, "1.8" = 0 }

[[devices]]
address = "1.2.1.2"
name = "Kitchen Spot B"
type = "LED driver"
load_level = 20
groups = [5]
scenes = { "1.1" = 100, "1.8" = 0 }
"#;

/// Server configuration pointing at the local test router
#[fixture]
pub fn test_server_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.router.host = TEST_HOST.to_string();
    config.router.port = TEST_PORT;
    config.simulation.enabled = true;
    config
}

/// Initialized simulated router serving `snapshot`
pub async fn connected_router(snapshot: RouterSnapshot) -> Arc<SimulatedRouter> {
    let router = Arc::new(SimulatedRouter::new(snapshot, TEST_HOST, TEST_PORT));
    router.initialize().await.expect("simulated router initializes");
    router
}

/// Server backed by the built-in demo installation
pub async fn demo_server() -> (HelvarMcpServer, Arc<SimulatedRouter>) {
    let snapshot = RouterSnapshot::demo().expect("demo snapshot parses");
    server_for(snapshot).await
}

/// Server backed by an arbitrary snapshot
pub async fn server_for(snapshot: RouterSnapshot) -> (HelvarMcpServer, Arc<SimulatedRouter>) {
    let router = connected_router(snapshot).await;
    let server = HelvarMcpServer::with_router(router.clone(), test_server_config());
    (server, router)
}

/// Scene recalls the simulated router has received
pub async fn recalls(router: &SimulatedRouter) -> Vec<Command> {
    router
        .sent_commands()
        .await
        .into_iter()
        .map(|sent| sent.command)
        .filter(|command| command.command_type == CommandType::RecallScene)
        .collect()
}

/// Write TOML content to a temporary file
pub fn toml_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}
