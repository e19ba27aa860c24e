//! HelvarNet addressing
//!
//! Devices live at a four-part address `block.router.subnet.device`; scenes are
//! recalled at `group.block.scene`. Per-device scene levels are stored as a flat
//! sequence of blocks of [`SCENES_PER_BLOCK`] entries, and [`index_to_scene`] /
//! [`scene_to_index`] convert between the two views.

use crate::error::{HelvarError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of scenes in one scene block
pub const SCENES_PER_BLOCK: usize = 16;

/// Number of scene blocks a router stores per device
pub const SCENE_BLOCKS: usize = 8;

/// Convert a flat level-sequence index into 1-based `(block, scene)` coordinates
pub fn index_to_scene(index: usize) -> (usize, usize) {
    (index / SCENES_PER_BLOCK + 1, index % SCENES_PER_BLOCK + 1)
}

/// Convert 1-based `(block, scene)` coordinates into a flat level-sequence index
///
/// Returns `None` when `block` is zero or `scene` falls outside `1..=16`.
pub fn scene_to_index(block: usize, scene: usize) -> Option<usize> {
    if block == 0 || scene == 0 || scene > SCENES_PER_BLOCK {
        return None;
    }
    Some((block - 1) * SCENES_PER_BLOCK + (scene - 1))
}

/// Four-part device address on a HelvarNet router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HelvarAddress {
    pub block: u32,
    pub router: u32,
    pub subnet: u32,
    pub device: u32,
}

impl HelvarAddress {
    pub fn new(block: u32, router: u32, subnet: u32, device: u32) -> Self {
        Self {
            block,
            router,
            subnet,
            device,
        }
    }

    /// Classify the physical bus the device hangs off, based on its subnet
    ///
    /// Subnets 1 and 2 are the router's DALI buses, 3 is S-DIM and 4 is DMX.
    /// Anything else (inputs, virtual subnets) has no bus type.
    pub fn bus_type(&self) -> Option<&'static str> {
        match self.subnet {
            1 | 2 => Some("DALI"),
            3 => Some("S-DIM"),
            4 => Some("DMX"),
            _ => None,
        }
    }
}

impl fmt::Display for HelvarAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.block, self.router, self.subnet, self.device
        )
    }
}

impl FromStr for HelvarAddress {
    type Err = HelvarError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('@').unwrap_or(trimmed);
        let parts = body
            .split('.')
            .map(|part| part.trim().parse::<u32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| {
                HelvarError::invalid_input(format!(
                    "'{s}' is not a device address, expected block.router.subnet.device"
                ))
            })?;

        match parts.as_slice() {
            [block, router, subnet, device] => {
                Ok(Self::new(*block, *router, *subnet, *device))
            }
            _ => Err(HelvarError::invalid_input(format!(
                "'{s}' is not a device address, expected block.router.subnet.device"
            ))),
        }
    }
}

impl TryFrom<String> for HelvarAddress {
    type Error = HelvarError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HelvarAddress> for String {
    fn from(address: HelvarAddress) -> Self {
        address.to_string()
    }
}

/// Address of a stored scene: group, block and scene number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneAddress {
    pub group: u32,
    pub block: u32,
    pub scene: u32,
}

impl SceneAddress {
    pub fn new(group: u32, block: u32, scene: u32) -> Self {
        Self {
            group,
            block,
            scene,
        }
    }

    /// Flat index of this scene inside a device level sequence
    pub fn level_index(&self) -> Option<usize> {
        scene_to_index(self.block as usize, self.scene as usize)
    }
}

impl fmt::Display for SceneAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.group, self.block, self.scene)
    }
}
