//! Mock implementations for testing
//!
//! `MockHelvarRouter` replies with scripted group responses, can be told to fail
//! every command, and records everything it is sent.

use crate::error::{HelvarError, Result};
use crate::router::{Command, CommandResult, CommandType, Device, Group, HelvarRouter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Mock HelvarNet router for testing
pub struct MockHelvarRouter {
    connected: AtomicBool,
    devices: Vec<Device>,
    groups: Vec<Group>,
    group_list_response: String,
    descriptions: HashMap<u32, String>,
    fail_commands: bool,
    sent: Mutex<Vec<Command>>,
}

impl MockHelvarRouter {
    /// Create new mock router
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            devices: Vec::new(),
            groups: Vec::new(),
            group_list_response: String::new(),
            descriptions: HashMap::new(),
            fail_commands: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Set mock device data
    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    /// Set groups; the group list response and descriptions follow from them
    pub fn with_groups(mut self, groups: &[(u32, &str)]) -> Self {
        self.groups = groups
            .iter()
            .map(|(id, name)| Group::new(*id, *name))
            .collect();
        self.group_list_response = groups
            .iter()
            .map(|(id, _)| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.descriptions = groups
            .iter()
            .map(|(id, name)| (*id, name.to_string()))
            .collect();
        self
    }

    /// Override the raw QUERY_GROUPS response
    pub fn with_group_list_response<S: Into<String>>(mut self, response: S) -> Self {
        self.group_list_response = response.into();
        self
    }

    /// Make every command fail
    pub fn failing_commands(mut self) -> Self {
        self.fail_commands = true;
        self
    }

    /// Start out disconnected
    pub fn disconnected(self) -> Self {
        self.connected.store(false, Ordering::SeqCst);
        self
    }

    /// Commands received so far
    pub fn sent_commands(&self) -> Vec<Command> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Scene recalls received so far
    pub fn recalls(&self) -> Vec<Command> {
        self.sent_commands()
            .into_iter()
            .filter(|command| command.command_type == CommandType::RecallScene)
            .collect()
    }

    fn record(&self, command: &Command) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(command.clone());
        }
        if self.fail_commands {
            return Err(HelvarError::connection("Mock router connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl HelvarRouter for MockHelvarRouter {
    async fn initialize(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_command_task(&self, command: Command) -> Result<CommandResult> {
        self.record(&command)?;
        match command.command_type {
            CommandType::QueryGroups => Ok(CommandResult::new(self.group_list_response.clone())),
            CommandType::QueryGroupDescription => {
                let name = command
                    .group()
                    .and_then(|id| self.descriptions.get(&id).cloned())
                    .unwrap_or_default();
                Ok(CommandResult::new(name))
            }
            CommandType::RecallScene => Ok(CommandResult::new("")),
        }
    }

    async fn send_command(&self, command: Command) -> Result<()> {
        self.record(&command)
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        Ok(self.devices.clone())
    }

    async fn groups(&self) -> Result<Vec<Group>> {
        Ok(self.groups.clone())
    }

    fn workgroup_name(&self) -> Option<String> {
        Some("Mock Workgroup".to_string())
    }

    fn cluster_id(&self) -> Option<u32> {
        Some(1)
    }

    fn host(&self) -> &str {
        "127.0.0.1"
    }

    fn port(&self) -> u16 {
        50000
    }
}

impl Default for MockHelvarRouter {
    fn default() -> Self {
        Self::new()
    }
}
