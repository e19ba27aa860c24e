//! Device and group records as exposed by the router collaborator

use super::address::{HelvarAddress, SceneAddress, SCENES_PER_BLOCK, SCENE_BLOCKS};
use serde::{Deserialize, Serialize};

/// Device state bit: device disabled
pub const STATE_DISABLED: u32 = 0x0000_0001;
/// Device state bit: lamp failure
pub const STATE_LAMP_FAILURE: u32 = 0x0000_0002;
/// Device state bit: device missing from the bus
pub const STATE_MISSING: u32 = 0x0000_0004;
/// Device state bit: device faulty
pub const STATE_FAULTY: u32 = 0x0000_0008;

/// Level marker for a scene with no stored level
pub const UNCONFIGURED_LEVEL: &str = "*";

/// Snapshot of one device on the router
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub address: HelvarAddress,
    pub name: String,
    /// Protocol tag, e.g. "DALI"
    pub protocol: String,
    /// Device type tag as reported by the router
    pub device_type: String,
    /// Whether the device has controllable brightness
    pub is_light: bool,
    /// Current level in percent (0-100)
    pub load_level: f64,
    /// Level before the most recent change
    pub last_load_level: Option<f64>,
    /// Stored scene levels, flattened block by block
    pub levels: Vec<String>,
    pub last_scene: Option<SceneAddress>,
    /// HelvarNet device state bitmask
    pub state: u32,
    /// Groups the device belongs to
    pub groups: Vec<u32>,
}

impl Device {
    /// Create a light device with no stored scenes
    pub fn new<S: Into<String>>(address: HelvarAddress, name: S) -> Self {
        Self {
            address,
            name: name.into(),
            protocol: "DALI".to_string(),
            device_type: String::new(),
            is_light: true,
            load_level: 0.0,
            last_load_level: None,
            levels: unconfigured_levels(),
            last_scene: None,
            state: 0,
            groups: Vec::new(),
        }
    }

    /// Brightness on the 0-255 scale
    pub fn brightness(&self) -> u8 {
        (self.load_level.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8
    }

    pub fn is_disabled(&self) -> bool {
        self.state & STATE_DISABLED != 0
    }

    pub fn is_missing(&self) -> bool {
        self.state & STATE_MISSING != 0
    }

    pub fn is_faulty(&self) -> bool {
        self.state & STATE_FAULTY != 0
    }

    pub fn is_lamp_failure(&self) -> bool {
        self.state & STATE_LAMP_FAILURE != 0
    }

    pub fn is_member_of(&self, group: u32) -> bool {
        self.groups.contains(&group)
    }
}

/// Level sequence for a device with nothing stored
pub fn unconfigured_levels() -> Vec<String> {
    vec![UNCONFIGURED_LEVEL.to_string(); SCENE_BLOCKS * SCENES_PER_BLOCK]
}

/// Group as known to the router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u32,
    pub name: String,
}

impl Group {
    pub fn new<S: Into<String>>(id: u32, name: S) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_flags() {
        let mut device = Device::new(HelvarAddress::new(1, 1, 1, 1), "Spot");
        assert!(!device.is_disabled());
        assert!(!device.is_missing());
        assert!(!device.is_faulty());
        assert!(!device.is_lamp_failure());

        device.state = STATE_MISSING | STATE_LAMP_FAILURE;
        assert!(device.is_missing());
        assert!(device.is_lamp_failure());
        assert!(!device.is_disabled());
        assert!(!device.is_faulty());
    }

    #[test]
    fn test_brightness_scale() {
        let mut device = Device::new(HelvarAddress::new(1, 1, 1, 1), "Spot");
        assert_eq!(device.brightness(), 0);
        device.load_level = 100.0;
        assert_eq!(device.brightness(), 255);
        device.load_level = 50.0;
        assert_eq!(device.brightness(), 128);
    }

    #[test]
    fn test_default_levels_are_unconfigured() {
        let device = Device::new(HelvarAddress::new(1, 1, 1, 1), "Spot");
        assert_eq!(device.levels.len(), 128);
        assert!(device.levels.iter().all(|l| l == UNCONFIGURED_LEVEL));
    }
}
