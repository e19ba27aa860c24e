//! In-process router backed by a TOML snapshot
//!
//! `SimulatedRouter` answers group queries from the snapshot, applies scene
//! recalls to member devices using their stored scene levels, and keeps a log
//! of every command it was sent. It backs `--simulate` / `--snapshot` and the
//! integration tests.

use super::address::{scene_to_index, HelvarAddress, SceneAddress};
use super::command::{Command, CommandResult, CommandType};
use super::device::{unconfigured_levels, Device, Group, UNCONFIGURED_LEVEL};
use super::HelvarRouter;
use crate::error::{HelvarError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

const DEMO_SNAPSHOT: &str = include_str!("demo_snapshot.toml");

/// Router state loaded from a snapshot file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct RouterSnapshot {
    pub workgroup_name: Option<String>,
    pub cluster_id: Option<u32>,
    pub groups: Vec<Group>,
    pub devices: Vec<Device>,
}

impl RouterSnapshot {
    /// Parse a snapshot from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HelvarError::config(format!(
                "Failed to read snapshot {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// The built-in demo installation
    pub fn demo() -> Result<Self> {
        Self::from_toml_str(DEMO_SNAPSHOT)
    }
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    workgroup_name: Option<String>,
    #[serde(default)]
    cluster_id: Option<u32>,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    devices: Vec<DeviceEntry>,
}

impl TryFrom<RawSnapshot> for RouterSnapshot {
    type Error = HelvarError;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        let devices = raw
            .devices
            .into_iter()
            .map(DeviceEntry::into_device)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            workgroup_name: raw.workgroup_name,
            cluster_id: raw.cluster_id,
            groups: raw.groups,
            devices,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelValue {
    Number(u32),
    Text(String),
}

impl From<LevelValue> for String {
    fn from(value: LevelValue) -> Self {
        match value {
            LevelValue::Number(level) => level.to_string(),
            LevelValue::Text(level) => level,
        }
    }
}

/// Device entry as written in a snapshot file
#[derive(Deserialize)]
struct DeviceEntry {
    address: HelvarAddress,
    name: String,
    #[serde(default = "default_protocol")]
    protocol: String,
    #[serde(rename = "type", default)]
    device_type: String,
    #[serde(default = "default_is_light")]
    is_light: bool,
    #[serde(default)]
    load_level: f64,
    #[serde(default)]
    last_load_level: Option<f64>,
    #[serde(default)]
    state: u32,
    #[serde(default)]
    groups: Vec<u32>,
    /// Full level sequence; takes precedence over the default of all "*"
    #[serde(default)]
    levels: Option<Vec<LevelValue>>,
    /// Sparse "block.scene" = level overrides
    #[serde(default)]
    scenes: BTreeMap<String, LevelValue>,
    #[serde(default)]
    last_scene: Option<SceneAddress>,
}

fn default_protocol() -> String {
    "DALI".to_string()
}

fn default_is_light() -> bool {
    true
}

impl DeviceEntry {
    fn into_device(self) -> Result<Device> {
        let address = self.address;
        let mut levels = match self.levels {
            Some(levels) => levels.into_iter().map(String::from).collect(),
            None => unconfigured_levels(),
        };

        for (key, level) in self.scenes {
            let index = parse_scene_key(&key).ok_or_else(|| {
                HelvarError::config(format!(
                    "Device {address}: scene key '{key}' is not in block.scene form"
                ))
            })?;
            if index >= levels.len() {
                levels.resize(index + 1, UNCONFIGURED_LEVEL.to_string());
            }
            levels[index] = level.into();
        }

        Ok(Device {
            address,
            name: self.name,
            protocol: self.protocol,
            device_type: self.device_type,
            is_light: self.is_light,
            load_level: self.load_level,
            last_load_level: self.last_load_level,
            levels,
            last_scene: self.last_scene,
            state: self.state,
            groups: self.groups,
        })
    }
}

fn parse_scene_key(key: &str) -> Option<usize> {
    let (block, scene) = key.split_once('.')?;
    scene_to_index(block.trim().parse().ok()?, scene.trim().parse().ok()?)
}

/// A command received by the simulated router
#[derive(Debug, Clone, PartialEq)]
pub struct SentCommand {
    pub command: Command,
    /// Whether the sender waited for a result
    pub awaited: bool,
    pub sent_at: DateTime<Utc>,
}

/// Router collaborator that runs entirely in-process
pub struct SimulatedRouter {
    host: String,
    port: u16,
    workgroup_name: Option<String>,
    cluster_id: Option<u32>,
    groups: Vec<Group>,
    devices: RwLock<Vec<Device>>,
    connected: AtomicBool,
    history: Mutex<Vec<SentCommand>>,
}

impl SimulatedRouter {
    pub fn new<S: Into<String>>(snapshot: RouterSnapshot, host: S, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            workgroup_name: snapshot.workgroup_name,
            cluster_id: snapshot.cluster_id,
            groups: snapshot.groups,
            devices: RwLock::new(snapshot.devices),
            connected: AtomicBool::new(false),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Simulated router for the built-in demo installation
    pub fn demo<S: Into<String>>(host: S, port: u16) -> Result<Self> {
        Ok(Self::new(RouterSnapshot::demo()?, host, port))
    }

    /// Commands received so far, oldest first
    pub async fn sent_commands(&self) -> Vec<SentCommand> {
        self.history.lock().await.clone()
    }

    fn ensure_connected(&self) -> Result<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(HelvarError::connection(format!(
                "Router {}:{} has not been initialized",
                self.host, self.port
            )));
        }
        Ok(())
    }

    async fn record(&self, command: &Command, awaited: bool) {
        debug!(command = %command, awaited, "Simulated router received command");
        self.history.lock().await.push(SentCommand {
            command: command.clone(),
            awaited,
            sent_at: Utc::now(),
        });
    }

    async fn execute(&self, command: &Command) -> Result<Option<String>> {
        match command.command_type {
            CommandType::QueryGroups => Ok(Some(
                self.groups
                    .iter()
                    .map(|group| group.id.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            )),
            CommandType::QueryGroupDescription => {
                let id = command.group().ok_or_else(|| {
                    HelvarError::command(format!("{command} is missing a group parameter"))
                })?;
                self.groups
                    .iter()
                    .find(|group| group.id == id)
                    .map(|group| Some(group.name.clone()))
                    .ok_or_else(|| HelvarError::command(format!("Group {id} does not exist")))
            }
            CommandType::RecallScene => {
                self.recall_scene(command).await?;
                Ok(None)
            }
        }
    }

    async fn recall_scene(&self, command: &Command) -> Result<()> {
        let (group, block, scene) = match (command.group(), command.block(), command.scene()) {
            (Some(group), Some(block), Some(scene)) => (group, block, scene),
            _ => {
                return Err(HelvarError::command(format!(
                    "{command} needs group, block and scene parameters"
                )))
            }
        };

        let address = SceneAddress::new(group, block, scene);
        let index = address.level_index().ok_or_else(|| {
            HelvarError::command(format!("Scene {address} is outside the scene table"))
        })?;

        let mut devices = self.devices.write().await;
        let mut affected = 0usize;
        for device in devices.iter_mut().filter(|device| device.is_member_of(group)) {
            device.last_scene = Some(address);
            if let Some(level) = device.levels.get(index).and_then(|l| l.parse::<f64>().ok()) {
                device.last_load_level = Some(device.load_level);
                device.load_level = level;
            }
            affected += 1;
        }

        debug!(scene = %address, affected, "Applied scene recall");
        Ok(())
    }
}

#[async_trait]
impl HelvarRouter for SimulatedRouter {
    async fn initialize(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        let device_count = self.devices.read().await.len();
        info!(
            host = %self.host,
            port = self.port,
            devices = device_count,
            groups = self.groups.len(),
            "Simulated router initialized"
        );
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_command_task(&self, command: Command) -> Result<CommandResult> {
        self.ensure_connected()?;
        self.record(&command, true).await;

        if !command.command_type.expects_response() {
            return Err(HelvarError::command(format!(
                "{command} does not produce a response"
            )));
        }

        let result = self.execute(&command).await?.unwrap_or_default();
        Ok(CommandResult::new(result))
    }

    async fn send_command(&self, command: Command) -> Result<()> {
        self.ensure_connected()?;
        self.record(&command, false).await;
        self.execute(&command).await?;
        Ok(())
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        self.ensure_connected()?;
        Ok(self.devices.read().await.clone())
    }

    async fn groups(&self) -> Result<Vec<Group>> {
        self.ensure_connected()?;
        Ok(self.groups.clone())
    }

    fn workgroup_name(&self) -> Option<String> {
        self.workgroup_name.clone()
    }

    fn cluster_id(&self) -> Option<u32> {
        self.cluster_id
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }
}
