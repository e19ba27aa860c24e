//! HelvarNet router collaborator
//!
//! The server never speaks the HelvarNet wire protocol itself. Everything it
//! needs from a router (device and group data, command transmission, connection
//! lifecycle) goes through the [`HelvarRouter`] trait.

pub mod address;
pub mod command;
pub mod device;
pub mod simulated;

pub use address::{index_to_scene, scene_to_index, HelvarAddress, SceneAddress, SCENES_PER_BLOCK};
pub use command::{Command, CommandParameter, CommandResult, CommandType};
pub use device::{Device, Group};
pub use simulated::{RouterSnapshot, SimulatedRouter};

use crate::error::Result;
use async_trait::async_trait;

/// Contract the MCP tools expect from a HelvarNet router client
#[async_trait]
pub trait HelvarRouter: Send + Sync {
    /// Connect and discover devices and groups
    async fn initialize(&self) -> Result<()>;

    /// Check if the router connection is up
    async fn is_connected(&self) -> bool;

    /// Send a command and wait for its result
    async fn send_command_task(&self, command: Command) -> Result<CommandResult>;

    /// Send a command without waiting for a result
    async fn send_command(&self, command: Command) -> Result<()>;

    /// Snapshot of every known device, in router order
    async fn devices(&self) -> Result<Vec<Device>>;

    /// Groups discovered at initialization, in router order
    async fn groups(&self) -> Result<Vec<Group>>;

    /// Snapshot of light-capable devices only
    async fn light_devices(&self) -> Result<Vec<Device>> {
        Ok(self
            .devices()
            .await?
            .into_iter()
            .filter(|device| device.is_light)
            .collect())
    }

    /// Look up a single device
    async fn device(&self, address: &HelvarAddress) -> Result<Option<Device>> {
        Ok(self
            .devices()
            .await?
            .into_iter()
            .find(|device| &device.address == address))
    }

    fn workgroup_name(&self) -> Option<String>;

    fn cluster_id(&self) -> Option<u32>;

    fn host(&self) -> &str;

    fn port(&self) -> u16;
}
