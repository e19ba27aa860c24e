//! Tool implementations behind the MCP surface
//!
//! Each submodule works against a `&dyn HelvarRouter` and returns typed
//! results. Conversion to JSON happens once, in [`to_payload`].

pub mod devices;
pub mod fleet;
pub mod groups;
pub mod info;

pub use devices::{
    build_device_overview, BrightnessRange, DeviceOverview, HealthIssue, HealthStatus,
};
pub use fleet::{build_fleet_overview, FleetOverview, FleetStatistics};
pub use groups::{GroupInfo, GroupRef, SceneRecallOutcome, ScenePreset};
pub use info::RouterOverview;

use crate::error::{HelvarError, Result};
use serde::Serialize;
use serde_json::{json, Value};

/// Render a tool result as JSON; failures become `{"error": message}`
pub fn to_payload<T: Serialize>(result: Result<T>) -> Value {
    match result.and_then(|value| serde_json::to_value(value).map_err(HelvarError::from)) {
        Ok(value) => value,
        Err(e) => error_payload(&e),
    }
}

pub fn error_payload(error: &HelvarError) -> Value {
    json!({ "error": error.to_string() })
}
