//! Fleet-wide aggregation over light devices

use super::devices::{build_device_overview, DeviceOverview, HealthStatus};
use crate::error::Result;
use crate::router::{Device, HelvarRouter};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthSummary {
    pub healthy: usize,
    pub issues: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetStatistics {
    pub total_devices: usize,
    /// Mean brightness percentage, one decimal place
    pub average_brightness: f64,
    pub health_summary: HealthSummary,
    pub protocols: IndexMap<String, usize>,
    pub bus_types: IndexMap<String, usize>,
    pub devices_on: usize,
    pub devices_off: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetOverview {
    pub devices: Vec<DeviceOverview>,
    pub statistics: FleetStatistics,
    pub quick_summary: String,
}

/// Aggregate a device snapshot. Histogram keys keep first-seen order.
pub fn build_fleet_overview(devices: &[Device]) -> FleetOverview {
    let overviews: Vec<DeviceOverview> = devices.iter().map(build_device_overview).collect();
    let mut stats = FleetStatistics {
        total_devices: overviews.len(),
        ..Default::default()
    };

    let mut total_brightness = 0.0;
    for overview in &overviews {
        let percentage = overview.brightness.percentage;
        total_brightness += percentage;
        if percentage > 0.0 {
            stats.devices_on += 1;
        } else {
            stats.devices_off += 1;
        }

        match overview.health.status {
            HealthStatus::Healthy => stats.health_summary.healthy += 1,
            HealthStatus::Issues => stats.health_summary.issues += 1,
        }

        *stats
            .protocols
            .entry(overview.protocol.clone())
            .or_insert(0) += 1;
        if let Some(bus_type) = &overview.bus_type {
            *stats.bus_types.entry(bus_type.clone()).or_insert(0) += 1;
        }
    }

    let mean = if overviews.is_empty() {
        0.0
    } else {
        total_brightness / overviews.len() as f64
    };
    // One decimal of the exact value, ties to even
    let rounded = format!("{mean:.1}");
    stats.average_brightness = rounded.parse().unwrap_or(mean);

    let quick_summary = format!(
        "{} devices, {} healthy, avg {}% brightness",
        stats.total_devices, stats.health_summary.healthy, rounded
    );

    FleetOverview {
        devices: overviews,
        statistics: stats,
        quick_summary,
    }
}

/// Fleet overview of every light device on the router
pub async fn get_all_devices_overview(router: &dyn HelvarRouter) -> Result<FleetOverview> {
    let devices = router.light_devices().await?;
    Ok(build_fleet_overview(&devices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::device::STATE_LAMP_FAILURE;
    use pretty_assertions::assert_eq;

    fn device(address: &str, protocol: &str, load_level: f64) -> Device {
        let mut device = Device::new(address.parse().unwrap(), format!("Light {address}"));
        device.protocol = protocol.to_string();
        device.load_level = load_level;
        device
    }

    #[test]
    fn test_empty_fleet() {
        let fleet = build_fleet_overview(&[]);
        assert!(fleet.devices.is_empty());
        assert_eq!(fleet.statistics, FleetStatistics::default());
        assert_eq!(fleet.quick_summary, "0 devices, 0 healthy, avg 0.0% brightness");

        let value = serde_json::to_value(&fleet).unwrap();
        assert_eq!(value["statistics"]["health_summary"]["healthy"], 0);
        assert_eq!(value["statistics"]["health_summary"]["issues"], 0);
        assert_eq!(value["statistics"]["average_brightness"], 0.0);
    }

    #[test]
    fn test_average_rounds_half_to_even() {
        let fleet = build_fleet_overview(&[device("1.1.1.1", "DALI", 0.25)]);
        assert_eq!(fleet.statistics.average_brightness, 0.2);
        assert_eq!(fleet.quick_summary, "1 devices, 1 healthy, avg 0.2% brightness");

        let fleet = build_fleet_overview(&[
            device("1.1.1.1", "DALI", 0.0),
            device("1.1.1.2", "DALI", 1.5),
        ]);
        assert_eq!(fleet.statistics.average_brightness, 0.8);
        assert_eq!(fleet.quick_summary, "2 devices, 2 healthy, avg 0.8% brightness");
    }

    #[test]
    fn test_statistics() {
        let mut failed = device("1.1.2.1", "DALI", 0.0);
        failed.state = STATE_LAMP_FAILURE;
        let devices = vec![
            device("1.1.1.1", "DALI", 100.0),
            device("1.1.3.1", "S-DIM", 34.0),
            failed,
            device("1.1.9.1", "DMX", 40.0),
        ];

        let fleet = build_fleet_overview(&devices);
        let stats = &fleet.statistics;

        assert_eq!(stats.total_devices, 4);
        assert_eq!(stats.average_brightness, 43.5);
        assert_eq!(
            stats.health_summary,
            HealthSummary {
                healthy: 3,
                issues: 1
            }
        );
        assert_eq!(stats.devices_on, 3);
        assert_eq!(stats.devices_off, 1);
        assert_eq!(
            stats.protocols.iter().collect::<Vec<_>>(),
            vec![
                (&"DALI".to_string(), &2),
                (&"S-DIM".to_string(), &1),
                (&"DMX".to_string(), &1)
            ]
        );
        // subnet 9 has no bus classification
        assert_eq!(stats.bus_types.get("DALI"), Some(&2));
        assert_eq!(stats.bus_types.get("S-DIM"), Some(&1));
        assert_eq!(stats.bus_types.len(), 2);
        assert_eq!(fleet.quick_summary, "4 devices, 3 healthy, avg 43.5% brightness");
    }

    #[test]
    fn test_device_order_is_preserved() {
        let devices = vec![
            device("1.1.2.1", "DALI", 10.0),
            device("1.1.1.1", "DALI", 20.0),
        ];
        let fleet = build_fleet_overview(&devices);
        let addresses: Vec<_> = fleet.devices.iter().map(|d| d.address.as_str()).collect();
        assert_eq!(addresses, vec!["1.1.2.1", "1.1.1.1"]);
    }
}
