//! Device overview tools
//!
//! [`build_device_overview`] turns one router device snapshot into the record the
//! tools return; the async functions here fetch the snapshot and filter it.

use crate::error::{HelvarError, Result};
use crate::router::device::UNCONFIGURED_LEVEL;
use crate::router::{index_to_scene, Device, HelvarAddress, HelvarRouter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Overall health of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Issues,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Issues => write!(f, "issues"),
        }
    }
}

impl FromStr for HealthStatus {
    type Err = HelvarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "healthy" => Ok(HealthStatus::Healthy),
            "issues" => Ok(HealthStatus::Issues),
            _ => Err(HelvarError::invalid_input(format!(
                "Invalid health status '{s}'. Use: healthy, issues"
            ))),
        }
    }
}

/// A single health problem flagged by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthIssue {
    Disabled,
    Missing,
    Faulty,
    LampFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressComponents {
    pub block: u32,
    pub router: u32,
    pub subnet: u32,
    pub device: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brightness {
    pub percentage: f64,
    pub value_255: u8,
    pub last_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: HealthStatus,
    pub issues: Vec<HealthIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastScene {
    pub group: u32,
    pub block: u32,
    pub scene: u32,
    pub address: String,
}

/// A scene for which the device has a stored level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfiguredScene {
    pub block: usize,
    pub scene: usize,
    pub level: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneInfo {
    pub last_scene: Option<LastScene>,
    pub configured_scenes: Vec<ConfiguredScene>,
    pub total_configured: usize,
}

/// Normalized summary of one device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceOverview {
    pub name: String,
    pub address: String,
    pub address_components: AddressComponents,
    pub protocol: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub bus_type: Option<String>,
    pub is_controllable: bool,
    pub brightness: Brightness,
    pub health: Health,
    pub scenes: SceneInfo,
    pub summary: String,
}

/// Health flags that are set, in the order disabled, missing, faulty, lamp failure
pub fn health_issues(device: &Device) -> Vec<HealthIssue> {
    [
        (device.is_disabled(), HealthIssue::Disabled),
        (device.is_missing(), HealthIssue::Missing),
        (device.is_faulty(), HealthIssue::Faulty),
        (device.is_lamp_failure(), HealthIssue::LampFailure),
    ]
    .into_iter()
    .filter_map(|(set, issue)| set.then_some(issue))
    .collect()
}

/// Scenes with a stored level; `*` and `0` mean nothing is stored
pub fn configured_scenes(levels: &[String]) -> Vec<ConfiguredScene> {
    levels
        .iter()
        .enumerate()
        .filter(|(_, level)| level.as_str() != UNCONFIGURED_LEVEL && level.as_str() != "0")
        .map(|(index, level)| {
            let (block, scene) = index_to_scene(index);
            ConfiguredScene {
                block,
                scene,
                level: level.clone(),
                index,
            }
        })
        .collect()
}

/// Build the overview record for one device
pub fn build_device_overview(device: &Device) -> DeviceOverview {
    let issues = health_issues(device);
    let status = if issues.is_empty() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Issues
    };

    let configured = configured_scenes(&device.levels);
    let last_scene = device.last_scene.map(|scene| LastScene {
        group: scene.group,
        block: scene.block,
        scene: scene.scene,
        address: scene.to_string(),
    });

    DeviceOverview {
        name: device.name.clone(),
        address: device.address.to_string(),
        address_components: AddressComponents {
            block: device.address.block,
            router: device.address.router,
            subnet: device.address.subnet,
            device: device.address.device,
        },
        protocol: device.protocol.clone(),
        device_type: device.device_type.clone(),
        bus_type: device.address.bus_type().map(str::to_string),
        is_controllable: device.is_light,
        brightness: Brightness {
            percentage: device.load_level,
            value_255: device.brightness(),
            last_level: device.last_load_level,
        },
        health: Health { status, issues },
        scenes: SceneInfo {
            last_scene,
            total_configured: configured.len(),
            configured_scenes: configured,
        },
        summary: format!(
            "{} ({}) at {}% brightness",
            device.name, device.device_type, device.load_level
        ),
    }
}

/// Overview of the device at `device_address`
pub async fn get_device_overview(
    router: &dyn HelvarRouter,
    device_address: &str,
) -> Result<DeviceOverview> {
    let address: HelvarAddress = device_address.parse()?;
    router
        .device(&address)
        .await?
        .map(|device| build_device_overview(&device))
        .ok_or_else(|| HelvarError::not_found(format!("Device {address} not found")))
}

/// Light devices whose health matches `status`
#[derive(Debug, Clone, Serialize)]
pub struct HealthFilterResult {
    pub devices: Vec<DeviceOverview>,
    pub count: usize,
    pub filter: HealthStatus,
}

pub async fn get_devices_by_health_status(
    router: &dyn HelvarRouter,
    status: HealthStatus,
) -> Result<HealthFilterResult> {
    let devices: Vec<_> = router
        .light_devices()
        .await?
        .iter()
        .map(build_device_overview)
        .filter(|overview| overview.health.status == status)
        .collect();

    Ok(HealthFilterResult {
        count: devices.len(),
        devices,
        filter: status,
    })
}

/// Inclusive brightness window in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrightnessRange {
    pub min: u8,
    pub max: u8,
}

impl BrightnessRange {
    pub fn new(min: u8, max: u8) -> Result<Self> {
        if min > 100 || max > 100 {
            return Err(HelvarError::invalid_input(
                "Brightness must be between 0-100",
            ));
        }
        if min > max {
            return Err(HelvarError::invalid_input(format!(
                "Minimum brightness {min} is above maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, percentage: f64) -> bool {
        percentage >= f64::from(self.min) && percentage <= f64::from(self.max)
    }
}

/// Light devices whose brightness falls inside `range`
#[derive(Debug, Clone, Serialize)]
pub struct BrightnessFilterResult {
    pub devices: Vec<DeviceOverview>,
    pub count: usize,
    pub range: BrightnessRange,
}

pub async fn get_devices_by_brightness_range(
    router: &dyn HelvarRouter,
    range: BrightnessRange,
) -> Result<BrightnessFilterResult> {
    let devices: Vec<_> = router
        .light_devices()
        .await?
        .iter()
        .filter(|device| range.contains(device.load_level))
        .map(build_device_overview)
        .collect();

    Ok(BrightnessFilterResult {
        count: devices.len(),
        devices,
        range,
    })
}

/// Light devices speaking `protocol`
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolFilterResult {
    pub devices: Vec<DeviceOverview>,
    pub count: usize,
    pub protocol: String,
}

/// Protocol names are compared case-insensitively
pub async fn get_devices_by_protocol(
    router: &dyn HelvarRouter,
    protocol: &str,
) -> Result<ProtocolFilterResult> {
    let wanted = protocol.trim();
    let devices: Vec<_> = router
        .light_devices()
        .await?
        .iter()
        .filter(|device| device.protocol.eq_ignore_ascii_case(wanted))
        .map(build_device_overview)
        .collect();

    Ok(ProtocolFilterResult {
        count: devices.len(),
        devices,
        protocol: wanted.to_string(),
    })
}
