//! HelvarNet command model
//!
//! Commands are what the core hands to the router collaborator. The `Display`
//! impl renders the HelvarNet ASCII form and is used for logging only; framing
//! and transmission belong to the collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HelvarNet protocol version used when rendering commands
pub const PROTOCOL_VERSION: u8 = 2;

/// Command kinds used by this server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    /// Recall a stored scene on a group
    RecallScene,
    /// Ask for the description (display name) of one group
    QueryGroupDescription,
    /// Ask for the comma-separated list of group numbers
    QueryGroups,
}

impl CommandType {
    /// Numeric HelvarNet command code
    pub fn code(self) -> u16 {
        match self {
            CommandType::RecallScene => 11,
            CommandType::QueryGroupDescription => 105,
            CommandType::QueryGroups => 165,
        }
    }

    /// Whether the router answers this command
    pub fn expects_response(self) -> bool {
        !matches!(self, CommandType::RecallScene)
    }
}

/// One typed `key:value` parameter of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandParameter {
    Group(u32),
    Block(u32),
    Scene(u32),
    /// Fade time in hundredths of a second
    FadeTime(u32),
}

impl fmt::Display for CommandParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandParameter::Group(group) => write!(f, "G:{group}"),
            CommandParameter::Block(block) => write!(f, "B:{block}"),
            CommandParameter::Scene(scene) => write!(f, "S:{scene}"),
            CommandParameter::FadeTime(fade) => write!(f, "F:{fade}"),
        }
    }
}

/// A command destined for the router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub command_type: CommandType,
    pub parameters: Vec<CommandParameter>,
}

impl Command {
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            parameters: Vec::new(),
        }
    }

    pub fn with_param(mut self, parameter: CommandParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// `QUERY_GROUPS`
    pub fn query_groups() -> Self {
        Self::new(CommandType::QueryGroups)
    }

    /// `QUERY_GROUP_DESCRIPTION` for one group
    pub fn query_group_description(group: u32) -> Self {
        Self::new(CommandType::QueryGroupDescription).with_param(CommandParameter::Group(group))
    }

    /// `RECALL_SCENE` on `group` at `block`/`scene`
    pub fn recall_scene(group: u32, block: u32, scene: u32) -> Self {
        Self::new(CommandType::RecallScene)
            .with_param(CommandParameter::Group(group))
            .with_param(CommandParameter::Block(block))
            .with_param(CommandParameter::Scene(scene))
    }

    pub fn group(&self) -> Option<u32> {
        self.parameters.iter().find_map(|p| match p {
            CommandParameter::Group(group) => Some(*group),
            _ => None,
        })
    }

    pub fn block(&self) -> Option<u32> {
        self.parameters.iter().find_map(|p| match p {
            CommandParameter::Block(block) => Some(*block),
            _ => None,
        })
    }

    pub fn scene(&self) -> Option<u32> {
        self.parameters.iter().find_map(|p| match p {
            CommandParameter::Scene(scene) => Some(*scene),
            _ => None,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ">V:{PROTOCOL_VERSION},C:{}",
            self.command_type.code()
        )?;
        for parameter in &self.parameters {
            write!(f, ",{parameter}")?;
        }
        write!(f, "#")
    }
}

/// Answer to a command that expects a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub result: String,
}

impl CommandResult {
    pub fn new<S: Into<String>>(result: S) -> Self {
        Self {
            result: result.into(),
        }
    }
}
