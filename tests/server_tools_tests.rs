//! End-to-end tool tests against the simulated demo installation
//!
//! Every tool is called through `HelvarMcpServer` exactly as the MCP host
//! would, and the JSON payloads are checked field by field.

use helvarnet_mcp::router::{RouterSnapshot, SceneAddress};
use helvarnet_mcp::server::GroupId;
use helvarnet_mcp::{HelvarMcpServer, HelvarRouter};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

mod common;
use common::{demo_server, recalls, server_for, test_server_config, DUPLICATE_NAMES_SNAPSHOT};

const NOT_CONNECTED: &str = "Router not initialized. Please configure router connection first.";

fn name(group: &str) -> GroupId {
    GroupId::Name(group.to_string())
}

#[tokio::test]
async fn test_device_overview_for_office_panel() {
    let (server, _router) = demo_server().await;

    let overview = server
        .get_device_overview("1.1.1.3".to_string())
        .await
        .unwrap();

    assert_eq!(
        overview["summary"],
        "Open Office Panel 1 (LED driver) at 75% brightness"
    );
    assert_eq!(overview["health"], json!({"status": "healthy", "issues": []}));
    assert_eq!(
        overview["address_components"],
        json!({"block": 1, "router": 1, "subnet": 1, "device": 3})
    );
    assert_eq!(overview["bus_type"], "DALI");
    assert_eq!(overview["is_controllable"], true);
    assert_eq!(overview["brightness"]["value_255"], 191);
    assert_eq!(overview["scenes"]["total_configured"], 6);
    assert_eq!(
        overview["scenes"]["configured_scenes"][5],
        json!({"block": 2, "scene": 1, "level": "60", "index": 16})
    );
}

#[tokio::test]
async fn test_device_overview_reports_health_issues() {
    let (server, _router) = demo_server().await;

    let panel = server
        .get_device_overview("1.1.2.1".to_string())
        .await
        .unwrap();
    assert_eq!(
        panel["health"],
        json!({"status": "issues", "issues": ["lamp_failure"]})
    );

    let pendant = server
        .get_device_overview("@1.1.2.7".to_string())
        .await
        .unwrap();
    assert_eq!(pendant["health"]["issues"], json!(["missing"]));
    assert_eq!(pendant["scenes"]["configured_scenes"], json!([]));
}

#[tokio::test]
async fn test_device_overview_errors_are_payloads() {
    let (server, _router) = demo_server().await;

    let missing = server
        .get_device_overview("1.1.9.9".to_string())
        .await
        .unwrap();
    assert_eq!(missing, json!({"error": "Device 1.1.9.9 not found"}));

    let malformed = server
        .get_device_overview("reception".to_string())
        .await
        .unwrap();
    assert!(malformed["error"].as_str().unwrap().contains("Invalid input"));
}

#[tokio::test]
async fn test_fleet_overview() {
    let (server, _router) = demo_server().await;

    let fleet = server.get_all_devices_overview().await.unwrap();
    let stats = &fleet["statistics"];

    assert_eq!(fleet["devices"].as_array().unwrap().len(), 6);
    assert_eq!(stats["total_devices"], 6);
    assert_eq!(stats["average_brightness"], 52.5);
    assert_eq!(stats["health_summary"], json!({"healthy": 4, "issues": 2}));
    assert_eq!(stats["protocols"], json!({"DALI": 5, "S-DIM": 1}));
    assert_eq!(stats["bus_types"], json!({"DALI": 5, "S-DIM": 1}));
    assert_eq!(stats["devices_on"], 4);
    assert_eq!(stats["devices_off"], 2);
    assert_eq!(
        fleet["quick_summary"],
        "6 devices, 4 healthy, avg 52.5% brightness"
    );
}

#[tokio::test]
async fn test_fleet_overview_of_empty_installation() {
    let (server, _router) = server_for(RouterSnapshot::default()).await;

    let fleet = server.get_all_devices_overview().await.unwrap();
    assert_eq!(fleet["devices"], json!([]));
    assert_eq!(fleet["statistics"]["average_brightness"], 0.0);
    assert_eq!(
        fleet["statistics"]["health_summary"],
        json!({"healthy": 0, "issues": 0})
    );
    assert_eq!(fleet["statistics"]["devices_on"], 0);
    assert_eq!(fleet["statistics"]["devices_off"], 0);
}

fn names(payload: &Value) -> Vec<String> {
    payload["devices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|device| device["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_filter() {
    let (server, _router) = demo_server().await;

    let issues = server.get_devices_by_health_status(None).await.unwrap();
    assert_eq!(issues["filter"], "issues");
    assert_eq!(issues["count"], 2);
    assert_eq!(
        names(&issues),
        vec!["Open Office Panel 2", "Kitchen Pendant"]
    );

    let healthy = server
        .get_devices_by_health_status(Some("healthy".to_string()))
        .await
        .unwrap();
    assert_eq!(healthy["count"], 4);

    let invalid = server
        .get_devices_by_health_status(Some("broken".to_string()))
        .await
        .unwrap();
    assert!(invalid["error"].as_str().unwrap().contains("broken"));
}

#[tokio::test]
async fn test_brightness_filter() {
    let (server, _router) = demo_server().await;

    let bright = server
        .get_devices_by_brightness_range(Some(75), None)
        .await
        .unwrap();
    assert_eq!(bright["range"], json!({"min": 75, "max": 100}));
    assert_eq!(
        names(&bright),
        vec![
            "Reception Downlight 1",
            "Reception Downlight 2",
            "Open Office Panel 1"
        ]
    );

    let everything = server
        .get_devices_by_brightness_range(None, None)
        .await
        .unwrap();
    assert_eq!(everything["count"], 6);

    let inverted = server
        .get_devices_by_brightness_range(Some(80), Some(20))
        .await
        .unwrap();
    assert!(inverted.get("error").is_some());
}

#[tokio::test]
async fn test_protocol_filter() {
    let (server, _router) = demo_server().await;

    let sdim = server
        .get_devices_by_protocol("s-dim".to_string())
        .await
        .unwrap();
    assert_eq!(sdim["count"], 1);
    assert_eq!(names(&sdim), vec!["Meeting Room Wallwash"]);

    let dmx = server
        .get_devices_by_protocol("DMX".to_string())
        .await
        .unwrap();
    assert_eq!(dmx["count"], 0);
}

#[tokio::test]
async fn test_get_all_groups() {
    let (server, _router) = demo_server().await;

    let groups = server.get_all_groups().await.unwrap();
    assert_eq!(
        groups,
        json!({
            "1": {"group_number": "1", "name": "Reception"},
            "2": {"group_number": "2", "name": "Open Office"},
            "3": {"group_number": "3", "name": "Meeting Room"},
            "4": {"group_number": "4", "name": "Kitchen"}
        })
    );
}

#[tokio::test]
async fn test_switch_off_group_by_name() {
    let (server, router) = demo_server().await;

    let reply = server.switch_off_group(name("Reception")).await.unwrap();
    assert_eq!(reply, json!("Your lights should switch OFF shortly."));

    let sent = recalls(&router).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_string(), ">V:2,C:11,G:1,B:1,S:8#");

    let downlight = router
        .device(&"1.1.1.1".parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(downlight.load_level, 0.0);
    assert_eq!(downlight.last_load_level, Some(100.0));
    assert_eq!(downlight.last_scene, Some(SceneAddress::new(1, 1, 8)));
}

#[tokio::test]
async fn test_presets_by_number() {
    let (server, router) = demo_server().await;

    let on = server.switch_on_group(GroupId::Number(2)).await.unwrap();
    assert_eq!(on, json!("Your lights should be switch ON shortly."));
    server
        .set_group_to_50_percent(GroupId::Name("2".to_string()))
        .await
        .unwrap();

    let scenes: Vec<_> = recalls(&router)
        .await
        .iter()
        .map(|c| (c.group(), c.block(), c.scene()))
        .collect();
    assert_eq!(
        scenes,
        vec![(Some(2), Some(1), Some(1)), (Some(2), Some(1), Some(3))]
    );

    let panel = router
        .device(&"1.1.1.3".parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(panel.load_level, 50.0);
}

#[tokio::test]
async fn test_scene_recall_tool() {
    let (server, router) = demo_server().await;

    let outcome = server
        .set_group_level_to_scene(name("Open Office"), Some(2), Some(1))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        json!({"result": "Your group should be set to the scene shortly."})
    );

    let devices = router.devices().await.unwrap();
    let panel_1 = devices.iter().find(|d| d.name == "Open Office Panel 1").unwrap();
    let panel_2 = devices.iter().find(|d| d.name == "Open Office Panel 2").unwrap();
    assert_eq!(panel_1.load_level, 60.0);
    // no level stored for 2.1, level stays but the scene is still recorded
    assert_eq!(panel_2.load_level, 0.0);
    assert_eq!(panel_2.last_scene, Some(SceneAddress::new(2, 2, 1)));
}

#[tokio::test]
async fn test_scene_recall_defaults_and_validation() {
    let (server, router) = demo_server().await;

    server
        .set_group_level_to_scene(GroupId::Number(3), None, None)
        .await
        .unwrap();
    assert_eq!(recalls(&router).await[0].to_string(), ">V:2,C:11,G:3,B:1,S:1#");

    let invalid = server
        .set_group_level_to_scene(GroupId::Number(3), Some(0), Some(1))
        .await
        .unwrap();
    assert!(invalid["error"].as_str().unwrap().contains("block_id"));
    assert_eq!(recalls(&router).await.len(), 1);
}

#[tokio::test]
async fn test_unknown_group_name_sends_no_recall() {
    let (server, router) = demo_server().await;

    let outcome = server
        .set_group_level_to_scene(name("Nonexistent Room"), None, None)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        json!({"result": "Sorry, not able to find the group by name, please specify group number."})
    );
    assert!(recalls(&router).await.is_empty());
}

#[tokio::test]
async fn test_duplicate_group_names_use_first_match() {
    let snapshot = RouterSnapshot::from_toml_str(DUPLICATE_NAMES_SNAPSHOT).unwrap();
    let (server, router) = server_for(snapshot).await;

    server.switch_on_group(name("Kitchen")).await.unwrap();

    let sent = recalls(&router).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].group(), Some(3));
}

#[tokio::test]
async fn test_router_information_tools() {
    let (server, _router) = demo_server().await;

    let overview = server.get_router_overview().await.unwrap();
    let devices = overview["devices_on_system"].as_object().unwrap();
    assert_eq!(devices.len(), 7);
    assert_eq!(
        overview["devices_on_system"]["1.1.5.1"],
        json!({"name": "Meeting Room Presence Sensor", "type": "Multisensor", "protocol": "DALI"})
    );
    assert_eq!(
        overview["groups_on_devices"]["4"],
        json!({"group_number": "4", "name": "Kitchen"})
    );

    assert_eq!(
        server.get_workgroup_name().await.unwrap(),
        json!({"workgroup_name": "Demo Office"})
    );
    assert_eq!(server.get_cluster_id().await.unwrap(), json!({"cluster_id": 1}));
    assert_eq!(
        server.get_host_ip().await.unwrap(),
        json!({"host_ip": "127.0.0.1"})
    );
    assert_eq!(server.get_port().await.unwrap(), json!({"port": 50000}));
}

#[tokio::test]
async fn test_server_status() {
    let (server, _router) = demo_server().await;
    let status = server.get_server_status().await.unwrap();
    assert_eq!(status["connected"], true);
    assert_eq!(status["name"], "HelvarNet MCP Server");
    assert_eq!(status["router_host"], "127.0.0.1");
    assert_eq!(status["router_port"], 50000);
}

#[tokio::test]
async fn test_unconnected_server_reports_errors() {
    let server = HelvarMcpServer::unconnected(test_server_config());
    let not_connected = json!({"error": NOT_CONNECTED});

    assert_eq!(
        server.get_device_overview("1.1.1.1".to_string()).await.unwrap(),
        not_connected
    );
    assert_eq!(server.get_all_devices_overview().await.unwrap(), not_connected);
    assert_eq!(server.get_all_groups().await.unwrap(), not_connected);
    assert_eq!(
        server.switch_on_group(GroupId::Number(1)).await.unwrap(),
        not_connected
    );
    assert_eq!(
        server
            .set_group_level_to_scene(GroupId::Number(1), None, None)
            .await
            .unwrap(),
        not_connected
    );
    assert_eq!(server.get_router_overview().await.unwrap(), not_connected);
    assert_eq!(server.get_port().await.unwrap(), not_connected);

    let status = server.get_server_status().await.unwrap();
    assert_eq!(status["connected"], false);
    assert_eq!(status["router_host"], "127.0.0.1");
}
