//! Passthrough reads of router state

use super::groups::GroupInfo;
use crate::error::Result;
use crate::router::HelvarRouter;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub protocol: String,
}

/// Every cached device keyed by address and every group keyed by id
#[derive(Debug, Clone, Serialize)]
pub struct RouterOverview {
    pub devices_on_system: IndexMap<String, DeviceDescription>,
    pub groups_on_devices: IndexMap<String, GroupInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkgroupName {
    pub workgroup_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterId {
    pub cluster_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostIp {
    pub host_ip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub port: u16,
}

pub async fn get_router_overview(router: &dyn HelvarRouter) -> Result<RouterOverview> {
    let devices_on_system = router
        .devices()
        .await?
        .into_iter()
        .map(|device| {
            (
                device.address.to_string(),
                DeviceDescription {
                    name: device.name,
                    device_type: device.device_type,
                    protocol: device.protocol,
                },
            )
        })
        .collect();

    let groups_on_devices = router
        .groups()
        .await?
        .into_iter()
        .map(|group| {
            (
                group.id.to_string(),
                GroupInfo {
                    group_number: group.id.to_string(),
                    name: group.name,
                },
            )
        })
        .collect();

    Ok(RouterOverview {
        devices_on_system,
        groups_on_devices,
    })
}

pub fn get_workgroup_name(router: &dyn HelvarRouter) -> WorkgroupName {
    WorkgroupName {
        workgroup_name: router.workgroup_name(),
    }
}

pub fn get_cluster_id(router: &dyn HelvarRouter) -> ClusterId {
    ClusterId {
        cluster_id: router.cluster_id(),
    }
}

pub fn get_host_ip(router: &dyn HelvarRouter) -> HostIp {
    HostIp {
        host_ip: router.host().to_string(),
    }
}

pub fn get_port(router: &dyn HelvarRouter) -> Port {
    Port {
        port: router.port(),
    }
}
