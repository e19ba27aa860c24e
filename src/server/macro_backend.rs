//! Macro-based MCP server
//!
//! `#[mcp_server]` and `#[mcp_tools]` generate tool registration, schemas and
//! the stdio backend. Every tool answers with a JSON payload; failures are
//! reported inside the payload as `{"error": ...}` rather than as protocol errors.

use super::models::GroupId;
use crate::config::ServerConfig;
use crate::error::{HelvarError, Result};
use crate::logging::ToolCallLogger;
use crate::router::HelvarRouter;
use crate::tools::{
    self, devices, fleet, groups, info, BrightnessRange, GroupRef, HealthStatus, ScenePreset,
};
use pulseengine_mcp_macros::{mcp_server, mcp_tools};
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;

/// HelvarNet MCP Server with macro-based tool definitions
#[mcp_server(
    name = "HelvarNet MCP Server",
    description = "Monitor and control a HelvarNet DALI lighting router"
)]
#[derive(Clone, Default)]
pub struct HelvarMcpServer {
    /// Router collaborator; `None` until a connection was established
    router: Option<Arc<dyn HelvarRouter>>,
    config: Option<ServerConfig>,
}

impl HelvarMcpServer {
    /// Create a server bound to an initialized router
    pub fn with_router(router: Arc<dyn HelvarRouter>, config: ServerConfig) -> Self {
        tracing::info!(
            host = router.host(),
            port = router.port(),
            "Initializing HelvarNet MCP Server with router"
        );
        Self {
            router: Some(router),
            config: Some(config),
        }
    }

    /// Create a server without a router; every router tool reports not-connected
    pub fn unconnected(config: ServerConfig) -> Self {
        Self {
            router: None,
            config: Some(config),
        }
    }

    fn router(&self) -> Result<&dyn HelvarRouter> {
        self.router.as_deref().ok_or(HelvarError::NotConnected)
    }

    async fn run_tool<'a, T, Fut>(
        &'a self,
        tool: &'static str,
        params: Value,
        op: impl FnOnce(&'a dyn HelvarRouter) -> Fut,
    ) -> std::result::Result<Value, String>
    where
        T: Serialize,
        Fut: Future<Output = Result<T>>,
    {
        let log = ToolCallLogger::start(tool, &params);
        let payload = match self.router() {
            Ok(router) => tools::to_payload(op(router).await),
            Err(e) => tools::error_payload(&e),
        };
        log.finish(&payload);
        Ok(payload)
    }

    fn read_tool<T: Serialize>(
        &self,
        tool: &'static str,
        read: impl FnOnce(&dyn HelvarRouter) -> T,
    ) -> std::result::Result<Value, String> {
        let log = ToolCallLogger::start(tool, &json!({}));
        let payload = tools::to_payload(self.router().map(read));
        log.finish(&payload);
        Ok(payload)
    }

    async fn preset_tool(
        &self,
        tool: &'static str,
        group_id: GroupId,
        preset: ScenePreset,
    ) -> std::result::Result<Value, String> {
        let log = ToolCallLogger::start(tool, &json!({ "group_id": group_id }));
        let payload = match self.router() {
            Ok(router) => {
                let group = GroupRef::from(group_id);
                match groups::recall_preset(router, &group, preset).await {
                    Ok(message) => Value::String(message.to_string()),
                    Err(e) => tools::error_payload(&e),
                }
            }
            Err(e) => tools::error_payload(&e),
        };
        log.finish(&payload);
        Ok(payload)
    }
}

/// All MCP tools defined in a single impl block
#[mcp_tools]
impl HelvarMcpServer {
    // ========================================================================
    // DEVICE TOOLS
    // ========================================================================

    /// Get a detailed overview of one device
    ///
    /// Address format is "block.router.subnet.device", e.g. "1.1.1.3". Returns
    /// brightness, health flags, configured scenes and a one-line summary.
    pub async fn get_device_overview(
        &self,
        device_address: String,
    ) -> std::result::Result<Value, String> {
        let params = json!({ "device_address": device_address });
        self.run_tool("get_device_overview", params, |router| {
            devices::get_device_overview(router, &device_address)
        })
        .await
    }

    /// Get an overview of every light with fleet statistics
    ///
    /// Includes health counts, protocol and bus type histograms, average
    /// brightness and how many lights are on or off.
    pub async fn get_all_devices_overview(&self) -> std::result::Result<Value, String> {
        self.run_tool("get_all_devices_overview", json!({}), |router| {
            fleet::get_all_devices_overview(router)
        })
        .await
    }

    /// Get lights filtered by health status
    ///
    /// status: "healthy" or "issues" (default "issues")
    pub async fn get_devices_by_health_status(
        &self,
        status: Option<String>,
    ) -> std::result::Result<Value, String> {
        let params = json!({ "status": status });
        let status = status.as_deref().unwrap_or("issues").parse::<HealthStatus>();
        self.run_tool("get_devices_by_health_status", params, |router| async move {
            match status {
                Ok(status) => devices::get_devices_by_health_status(router, status).await,
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Get lights whose brightness lies within a range
    ///
    /// min_brightness and max_brightness are percentages 0-100 (defaults 0 and 100), inclusive.
    pub async fn get_devices_by_brightness_range(
        &self,
        min_brightness: Option<u8>,
        max_brightness: Option<u8>,
    ) -> std::result::Result<Value, String> {
        let params = json!({ "min_brightness": min_brightness, "max_brightness": max_brightness });
        let range =
            BrightnessRange::new(min_brightness.unwrap_or(0), max_brightness.unwrap_or(100));
        self.run_tool("get_devices_by_brightness_range", params, |router| async move {
            match range {
                Ok(range) => devices::get_devices_by_brightness_range(router, range).await,
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Get lights using a given protocol, e.g. "DALI"
    pub async fn get_devices_by_protocol(
        &self,
        protocol: String,
    ) -> std::result::Result<Value, String> {
        let params = json!({ "protocol": protocol });
        self.run_tool("get_devices_by_protocol", params, |router| {
            devices::get_devices_by_protocol(router, &protocol)
        })
        .await
    }

    // ========================================================================
    // GROUP TOOLS
    // ========================================================================

    /// List all groups on the router with their numbers and names
    pub async fn get_all_groups(&self) -> std::result::Result<Value, String> {
        self.run_tool("get_all_groups", json!({}), |router| {
            groups::fetch_groups(router)
        })
        .await
    }

    /// Switch a group fully on (scene 1.1)
    ///
    /// group_id is the group number or its exact name.
    pub async fn switch_on_group(&self, group_id: GroupId) -> std::result::Result<Value, String> {
        self.preset_tool("switch_on_group", group_id, ScenePreset::On)
            .await
    }

    /// Set a group to 75% (scene 1.2)
    pub async fn set_group_to_75_percent(
        &self,
        group_id: GroupId,
    ) -> std::result::Result<Value, String> {
        self.preset_tool("set_group_to_75_percent", group_id, ScenePreset::Percent75)
            .await
    }

    /// Set a group to 50% (scene 1.3)
    pub async fn set_group_to_50_percent(
        &self,
        group_id: GroupId,
    ) -> std::result::Result<Value, String> {
        self.preset_tool("set_group_to_50_percent", group_id, ScenePreset::Percent50)
            .await
    }

    /// Set a group to 25% (scene 1.4)
    pub async fn set_group_to_25_percent(
        &self,
        group_id: GroupId,
    ) -> std::result::Result<Value, String> {
        self.preset_tool("set_group_to_25_percent", group_id, ScenePreset::Percent25)
            .await
    }

    /// Set a group to 10% (scene 1.5)
    pub async fn set_group_to_10_percent(
        &self,
        group_id: GroupId,
    ) -> std::result::Result<Value, String> {
        self.preset_tool("set_group_to_10_percent", group_id, ScenePreset::Percent10)
            .await
    }

    /// Switch a group off (scene 1.8)
    pub async fn switch_off_group(&self, group_id: GroupId) -> std::result::Result<Value, String> {
        self.preset_tool("switch_off_group", group_id, ScenePreset::Off)
            .await
    }

    /// Recall any scene on a group
    ///
    /// group_id is the group number or its exact name; block_id and scene_id
    /// start at 1 and default to 1.
    pub async fn set_group_level_to_scene(
        &self,
        group_id: GroupId,
        block_id: Option<u32>,
        scene_id: Option<u32>,
    ) -> std::result::Result<Value, String> {
        let params = json!({ "group_id": group_id, "block_id": block_id, "scene_id": scene_id });
        let group = GroupRef::from(group_id);
        self.run_tool("set_group_level_to_scene", params, |router| async move {
            groups::set_group_level_to_scene(
                router,
                &group,
                block_id.unwrap_or(1),
                scene_id.unwrap_or(1),
            )
            .await
        })
        .await
    }

    // ========================================================================
    // ROUTER TOOLS
    // ========================================================================

    /// Get every device and group known to the router
    pub async fn get_router_overview(&self) -> std::result::Result<Value, String> {
        self.run_tool("get_router_overview", json!({}), |router| {
            info::get_router_overview(router)
        })
        .await
    }

    /// Get the router's workgroup name
    pub async fn get_workgroup_name(&self) -> std::result::Result<Value, String> {
        self.read_tool("get_workgroup_name", info::get_workgroup_name)
    }

    /// Get the router's cluster id
    pub async fn get_cluster_id(&self) -> std::result::Result<Value, String> {
        self.read_tool("get_cluster_id", info::get_cluster_id)
    }

    /// Get the router's IP address
    pub async fn get_host_ip(&self) -> std::result::Result<Value, String> {
        self.read_tool("get_host_ip", info::get_host_ip)
    }

    /// Get the router's TCP port
    pub async fn get_port(&self) -> std::result::Result<Value, String> {
        self.read_tool("get_port", info::get_port)
    }

    // ========================================================================
    // SYSTEM TOOLS
    // ========================================================================

    /// Get server status and router connection information
    pub async fn get_server_status(&self) -> std::result::Result<Value, String> {
        let connected = match &self.router {
            Some(router) => router.is_connected().await,
            None => false,
        };
        let config = self.config.clone().unwrap_or_default();
        let (router_host, router_port) = match &self.router {
            Some(router) => (router.host().to_string(), router.port()),
            None => (config.router.host, config.router.port),
        };

        Ok(json!({
            "connected": connected,
            "version": config.mcp.version,
            "name": config.mcp.name,
            "router_host": router_host,
            "router_port": router_port
        }))
    }
}
