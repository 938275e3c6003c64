// Schema validation tests for MQTT wire format
//
// Most instances are built directly with json! (independent of Rust structs);
// the rest serialize the library's payload types. Both are validated against
// the JSON Schema files in schemas/mqtt/.

use std::sync::Arc;

use econnect_bridge::mqtt::{DeviceInfo, DiscoveryConfig};
use econnect_bridge::{
    setup_entry, BinarySensor, Coordinator, DeviceSnapshot, EntryConfig, ExperimentalConfig,
    IntegrationConfig, Item, SharedDevice, Topics,
};
use serde_json::json;

fn load_schema(name: &str) -> serde_json::Value {
    let path = format!(
        "{}/schemas/mqtt/{name}",
        env!("CARGO_MANIFEST_DIR")
    );
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read schema {path}: {e}"));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Failed to parse schema {path}: {e}"))
}

fn build_validator(schema_name: &str) -> jsonschema::Validator {
    let schema = load_schema(schema_name);
    jsonschema::validator_for(&schema)
        .unwrap_or_else(|e| panic!("Failed to compile schema {schema_name}: {e}"))
}

fn validate(schema_name: &str, instance: &serde_json::Value) {
    let validator = build_validator(schema_name);
    let errors: Vec<_> = validator.iter_errors(instance).collect();
    if !errors.is_empty() {
        let msgs: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
        panic!(
            "Schema validation failed for {schema_name}:\n{}\nInstance: {}",
            msgs.join("\n"),
            serde_json::to_string_pretty(instance).unwrap()
        );
    }
}

fn validate_fails(schema_name: &str, instance: &serde_json::Value) {
    let validator = build_validator(schema_name);
    assert!(
        !validator.is_valid(instance),
        "Expected schema validation to fail for {schema_name}, but it passed.\nInstance: {}",
        serde_json::to_string_pretty(instance).unwrap()
    );
}

fn sector_discovery() -> serde_json::Value {
    json!({
        "unique_id": "01HX_econnect_metronet_9_1",
        "object_id": "home_garden",
        "name": "Garden",
        "icon": "hass:shield-home-outline",
        "force_update": false,
        "state_topic": "econnect/01HX_econnect_metronet_9_1/state",
        "availability_topic": "econnect/availability",
        "payload_on": "ON",
        "payload_off": "OFF",
        "device": {
            "identifiers": ["econnect_metronet_01HX"],
            "name": "Home",
            "manufacturer": "Elmo",
            "model": "e-Connect/Metronet"
        }
    })
}

fn library_entities(force_update: bool) -> Vec<Arc<dyn BinarySensor>> {
    let entry = EntryConfig::builder().entry_id("01HX").username("test_user").build();
    let device = Arc::new(SharedDevice::new(DeviceSnapshot {
        sectors: vec![Item::new(1, "Garden", true)],
        inputs: vec![Item::new(4, "Front Door", false)],
        alerts: vec![
            Item::new(0, "alarm_led", 2i64),
            Item::new(1, "anomalies_led", 1i64),
            Item::new(2, "panel_tamper", 0i64),
        ],
    }));
    let config = IntegrationConfig { experimental: ExperimentalConfig { force_update } };
    let coordinator = Arc::new(Coordinator::new(config, Arc::clone(&device)));
    let mut sensors: Vec<Arc<dyn BinarySensor>> = Vec::new();
    setup_entry(&entry, device, coordinator, &mut sensors);
    sensors
}

// =========================================================================
// Discovery config
// =========================================================================

#[test]
fn discovery_sector_valid() {
    validate("discovery.schema.json", &sector_discovery());
}

#[test]
fn discovery_alert_valid() {
    validate(
        "discovery.schema.json",
        &json!({
            "unique_id": "01HX_econnect_metronet_panel_tamper",
            "object_id": "home_panel_tamper",
            "name": "Panel tamper",
            "icon": "hass:alarm-light",
            "device_class": "problem",
            "force_update": true,
            "state_topic": "econnect/01HX_econnect_metronet_panel_tamper/state",
            "availability_topic": "econnect/availability",
            "payload_on": "ON",
            "payload_off": "OFF",
            "device": {
                "identifiers": ["econnect_metronet_01HX"],
                "name": "Home",
                "manufacturer": "Elmo",
                "model": "e-Connect/Metronet"
            }
        }),
    );
}

#[test]
fn discovery_missing_state_topic_fails() {
    let mut instance = sector_discovery();
    instance.as_object_mut().unwrap().remove("state_topic");
    validate_fails("discovery.schema.json", &instance);
}

#[test]
fn discovery_wrong_payload_fails() {
    let mut instance = sector_discovery();
    instance["payload_on"] = json!("true");
    validate_fails("discovery.schema.json", &instance);
}

#[test]
fn discovery_unknown_device_class_fails() {
    let mut instance = sector_discovery();
    instance["device_class"] = json!("door");
    validate_fails("discovery.schema.json", &instance);
}

#[test]
fn discovery_extra_field_fails() {
    let mut instance = sector_discovery();
    instance["translation_key"] = json!("garden");
    validate_fails("discovery.schema.json", &instance);
}

#[test]
fn discovery_from_library_entities_valid() {
    let topics = Topics::new("econnect", "homeassistant");
    let entry = EntryConfig::builder().entry_id("01HX").username("test_user").build();
    let device = DeviceInfo::from_entry(&entry);

    for force_update in [false, true] {
        let sensors = library_entities(force_update);
        // alarm_led is multi-state and never announced
        assert_eq!(sensors.len(), 4);
        for sensor in &sensors {
            let config = DiscoveryConfig::for_entity(sensor.as_ref(), &device, &topics);
            validate("discovery.schema.json", &serde_json::to_value(&config).unwrap());
        }
    }
}

// =========================================================================
// Device snapshot
// =========================================================================

#[test]
fn snapshot_valid() {
    validate(
        "snapshot.schema.json",
        &json!({
            "sectors": [{"id": 1, "name": "Garden", "status": true}],
            "inputs": [{"id": 4, "name": "Front Door", "status": false}],
            "alerts": [
                {"id": 1, "name": "anomalies_led", "status": 2},
                {"id": 2, "name": "panel_tamper", "status": 0}
            ]
        }),
    );
}

#[test]
fn snapshot_empty_valid() {
    validate("snapshot.schema.json", &json!({}));
    validate(
        "snapshot.schema.json",
        &json!({"sectors": [], "inputs": [], "alerts": []}),
    );
}

#[test]
fn snapshot_string_status_fails() {
    validate_fails(
        "snapshot.schema.json",
        &json!({"sectors": [{"id": 1, "name": "Garden", "status": "armed"}]}),
    );
}

#[test]
fn snapshot_missing_name_fails() {
    validate_fails("snapshot.schema.json", &json!({"inputs": [{"id": 1}]}));
}

#[test]
fn snapshot_id_out_of_range_fails() {
    // Ids are u32 on the parser side
    validate("snapshot.schema.json", &json!({"sectors": [{"id": 4294967295u64, "name": "Garden"}]}));
    validate_fails("snapshot.schema.json", &json!({"sectors": [{"id": 4294967296u64, "name": "Garden"}]}));
    assert!(DeviceSnapshot::from_json(r#"{"sectors": [{"id": 4294967296, "name": "Garden"}]}"#).is_err());
}

#[test]
fn snapshot_schema_matches_parser() {
    let instance = json!({
        "sectors": [{"id": 1, "name": "Garden", "status": 1}],
        "alerts": [{"id": 7, "name": "device_tamper"}]
    });
    validate("snapshot.schema.json", &instance);

    let snapshot = DeviceSnapshot::from_json(&instance.to_string()).unwrap();
    assert_eq!(snapshot.sectors.len(), 1);
    assert_eq!(snapshot.alerts[0].name, "device_tamper");

    // And the serialized form is accepted back
    validate("snapshot.schema.json", &serde_json::to_value(&snapshot).unwrap());
}
