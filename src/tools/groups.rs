//! Group listing and scene recall
//!
//! Groups can be addressed by number or by display name. Names are matched
//! exactly (case-sensitive) against the router's group list and the first
//! match in router order wins when several groups share a name.

use crate::error::{HelvarError, Result};
use crate::router::{Command, HelvarRouter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

pub const GROUP_NOT_FOUND_MESSAGE: &str =
    "Sorry, not able to find the group by name, please specify group number.";
pub const SCENE_RECALL_MESSAGE: &str = "Your group should be set to the scene shortly.";

/// A group as listed by `get_all_groups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Group id token as listed by the router
    pub group_number: String,
    pub name: String,
}

/// Group identifier supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Id(u32),
    Name(String),
}

impl From<&str> for GroupRef {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.parse::<u32>() {
            Ok(id) => GroupRef::Id(id),
            Err(_) => GroupRef::Name(value.to_string()),
        }
    }
}

impl From<u32> for GroupRef {
    fn from(id: u32) -> Self {
        GroupRef::Id(id)
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Id(id) => write!(f, "{id}"),
            GroupRef::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Query the group list, then each group's description
pub async fn fetch_groups(router: &dyn HelvarRouter) -> Result<IndexMap<String, GroupInfo>> {
    let response = router.send_command_task(Command::query_groups()).await?;
    let mut groups = IndexMap::new();

    for token in response.result.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        let Ok(group_number) = token.parse::<u32>() else {
            warn!("Skipping non-numeric group id '{}' in group list", token);
            continue;
        };

        let description = router
            .send_command_task(Command::query_group_description(group_number))
            .await?;
        groups.insert(
            token.to_string(),
            GroupInfo {
                group_number: token.to_string(),
                name: description.result,
            },
        );
    }

    debug!("Fetched {} groups from router", groups.len());
    Ok(groups)
}

/// Resolve a group reference to its number; `None` if no group has that name
pub async fn resolve_group(router: &dyn HelvarRouter, group: &GroupRef) -> Result<Option<u32>> {
    match group {
        GroupRef::Id(id) => Ok(Some(*id)),
        GroupRef::Name(name) => Ok(fetch_groups(router)
            .await?
            .values()
            .find(|info| &info.name == name)
            .and_then(|info| info.group_number.parse().ok())),
    }
}

/// Status message returned from a scene recall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneRecallOutcome {
    pub result: String,
}

impl SceneRecallOutcome {
    fn new<S: Into<String>>(result: S) -> Self {
        Self {
            result: result.into(),
        }
    }
}

/// Recall `block.scene` on a group. The command is sent without waiting for
/// the router to act on it.
pub async fn set_group_level_to_scene(
    router: &dyn HelvarRouter,
    group: &GroupRef,
    block_id: u32,
    scene_id: u32,
) -> Result<SceneRecallOutcome> {
    if block_id < 1 {
        return Err(HelvarError::invalid_input("block_id must be at least 1"));
    }
    if scene_id < 1 {
        return Err(HelvarError::invalid_input("scene_id must be at least 1"));
    }

    let Some(group_number) = resolve_group(router, group).await? else {
        debug!("No group named '{}'", group);
        return Ok(SceneRecallOutcome::new(GROUP_NOT_FOUND_MESSAGE));
    };

    router
        .send_command(Command::recall_scene(group_number, block_id, scene_id))
        .await?;
    debug!(
        "Recalled scene {}.{}.{}",
        group_number, block_id, scene_id
    );

    Ok(SceneRecallOutcome::new(SCENE_RECALL_MESSAGE))
}

/// Fixed convenience scenes in block 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    On,
    Percent75,
    Percent50,
    Percent25,
    Percent10,
    Off,
}

impl ScenePreset {
    pub const ALL: [ScenePreset; 6] = [
        ScenePreset::On,
        ScenePreset::Percent75,
        ScenePreset::Percent50,
        ScenePreset::Percent25,
        ScenePreset::Percent10,
        ScenePreset::Off,
    ];

    pub fn block(self) -> u32 {
        1
    }

    pub fn scene(self) -> u32 {
        match self {
            ScenePreset::On => 1,
            ScenePreset::Percent75 => 2,
            ScenePreset::Percent50 => 3,
            ScenePreset::Percent25 => 4,
            ScenePreset::Percent10 => 5,
            ScenePreset::Off => 8,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScenePreset::Off => "Your lights should switch OFF shortly.",
            _ => "Your lights should be switch ON shortly.",
        }
    }
}

/// Recall a preset and return its fixed message.
///
/// Group lookup failures are returned. The recall itself is fire-and-forget,
/// so an unknown name or a failed send is only logged.
pub async fn recall_preset(
    router: &dyn HelvarRouter,
    group: &GroupRef,
    preset: ScenePreset,
) -> Result<&'static str> {
    let Some(group_number) = resolve_group(router, group).await? else {
        warn!("Preset {:?}: no group named '{}'", preset, group);
        return Ok(preset.message());
    };

    let command = Command::recall_scene(group_number, preset.block(), preset.scene());
    if let Err(e) = router.send_command(command).await {
        warn!("Preset {:?} for group {} failed: {}", preset, group_number, e);
    }
    Ok(preset.message())
}
