// MIT License - Copyright (c) 2026 Peter Wright
// Home Assistant MQTT discovery for the binary sensors

use std::collections::HashMap;
use std::sync::Arc;

use rumqttc::{AsyncClient, QoS};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::binary_sensor::{setup_entry, AddEntities, BinarySensor};
use crate::config::EntryConfig;
use crate::constants::{
    AVAILABILITY_OFFLINE, AVAILABILITY_ONLINE, DOMAIN, MANUFACTURER, MODEL, PAYLOAD_OFF,
    PAYLOAD_ON,
};
use crate::coordinator::Coordinator;
use crate::event::CoordinatorEvent;

/// Topic layout of the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    base: String,
    discovery_prefix: String,
}

impl Topics {
    pub fn new(base: impl Into<String>, discovery_prefix: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            discovery_prefix: discovery_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Retained discovery config of one entity.
    pub fn config(&self, unique_id: &str) -> String {
        format!("{}/binary_sensor/{unique_id}/config", self.discovery_prefix)
    }

    pub fn state(&self, unique_id: &str) -> String {
        format!("{}/{unique_id}/state", self.base)
    }

    pub fn availability(&self) -> String {
        format!("{}/availability", self.base)
    }

    /// Where the poller publishes device snapshots.
    pub fn snapshot(&self) -> String {
        format!("{}/snapshot", self.base)
    }
}

pub fn state_payload(on: bool) -> &'static str {
    if on { PAYLOAD_ON } else { PAYLOAD_OFF }
}

/// `panel_low_battery` -> `Panel low battery`
pub fn humanize(key: &str) -> String {
    let words = key.split('_').filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The alarm system as a Home Assistant device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<String>,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
}

impl DeviceInfo {
    pub fn from_entry(entry: &EntryConfig) -> Self {
        Self {
            identifiers: vec![format!("{DOMAIN}_{}", entry.entry_id)],
            name: entry.display_prefix().unwrap_or(MODEL).to_string(),
            manufacturer: MANUFACTURER,
            model: MODEL,
        }
    }
}

/// Discovery config published for every binary sensor.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryConfig {
    pub unique_id: String,
    pub object_id: String,
    pub name: String,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<&'static str>,
    pub force_update: bool,
    pub state_topic: String,
    pub availability_topic: String,
    pub payload_on: &'static str,
    pub payload_off: &'static str,
    pub device: DeviceInfo,
}

impl DiscoveryConfig {
    pub fn for_entity(entity: &dyn BinarySensor, device: &DeviceInfo, topics: &Topics) -> Self {
        let name = match (entity.name(), entity.translation_key()) {
            (Some(name), _) => name.to_string(),
            (None, Some(key)) => humanize(key),
            (None, None) => entity.unique_id().to_string(),
        };
        let object_id = entity
            .entity_id()
            .split_once('.')
            .map_or(entity.entity_id(), |(_, object_id)| object_id)
            .to_string();
        Self {
            unique_id: entity.unique_id().to_string(),
            object_id,
            name,
            icon: entity.icon(),
            device_class: entity.device_class().map(|c| c.as_str()),
            force_update: entity.force_update(),
            state_topic: topics.state(entity.unique_id()),
            availability_topic: topics.availability(),
            payload_on: PAYLOAD_ON,
            payload_off: PAYLOAD_OFF,
            device: device.clone(),
        }
    }
}

/// A state that needs publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub unique_id: String,
    pub on: bool,
}

/// Remembers the last published state of every entity.
#[derive(Debug, Default)]
pub struct StateTracker {
    last: HashMap<String, bool>,
}

impl StateTracker {
    /// States that changed since the last call, plus every state of a
    /// force-update entity. Entities whose lookup fails are skipped and
    /// keep their previous state.
    pub fn pending(&mut self, entities: &[Arc<dyn BinarySensor>]) -> Vec<StateUpdate> {
        let mut updates = Vec::new();
        for entity in entities {
            let on = match entity.is_on() {
                Ok(on) => on,
                Err(e) => {
                    warn!("Cannot read state of {}: {e}", entity.unique_id());
                    continue;
                }
            };
            let previous = self.last.insert(entity.unique_id().to_string(), on);
            if entity.force_update() || previous != Some(on) {
                updates.push(StateUpdate { unique_id: entity.unique_id().to_string(), on });
            }
        }
        updates
    }
}

/// Registers binary sensors with Home Assistant over MQTT discovery.
pub struct MqttPlatform {
    client: AsyncClient,
    topics: Topics,
    device: DeviceInfo,
    entities: Vec<Arc<dyn BinarySensor>>,
    announced: usize,
    tracker: StateTracker,
    set_up: bool,
    online: Option<bool>,
}

impl MqttPlatform {
    pub fn new(client: AsyncClient, topics: Topics, entry: &EntryConfig) -> Self {
        Self {
            client,
            topics,
            device: DeviceInfo::from_entry(entry),
            entities: Vec::new(),
            announced: 0,
            tracker: StateTracker::default(),
            set_up: false,
            online: None,
        }
    }

    pub fn entities(&self) -> &[Arc<dyn BinarySensor>] {
        &self.entities
    }

    /// Number of entities whose discovery config was published.
    pub fn announced(&self) -> usize {
        self.announced
    }

    /// Last published availability, `None` before the first refresh.
    pub fn online(&self) -> Option<bool> {
        self.online
    }

    /// React to a coordinator event.
    ///
    /// The first refresh creates the entities of `entry` and announces them;
    /// every refresh then publishes availability and the pending states.
    pub async fn on_event(
        &mut self,
        event: CoordinatorEvent,
        entry: &EntryConfig,
        coordinator: &Arc<Coordinator>,
    ) {
        match event {
            CoordinatorEvent::Refreshed { at } => {
                if !self.set_up {
                    setup_entry(entry, coordinator.device(), Arc::clone(coordinator), self);
                    self.set_up = true;
                    self.publish_discovery().await;
                }
                debug!("Refresh at {at}, publishing states");
                self.publish_availability(true).await;
                self.publish_states().await;
            }
            CoordinatorEvent::RefreshFailed { reason } => {
                warn!("Device data unavailable: {reason}");
                self.publish_availability(false).await;
            }
        }
    }

    /// Publish discovery configs of entities added since the last call.
    pub async fn publish_discovery(&mut self) {
        let pending = &self.entities[self.announced..];
        if pending.is_empty() {
            return;
        }
        info!("Publishing discovery for {} binary sensors", pending.len());
        for entity in pending {
            let config = DiscoveryConfig::for_entity(entity.as_ref(), &self.device, &self.topics);
            publish_json(&self.client, &self.topics.config(entity.unique_id()), &config, true).await;
        }
        self.announced = self.entities.len();
    }

    /// Publish the states that need publishing after a refresh.
    pub async fn publish_states(&mut self) {
        let updates = self.tracker.pending(&self.entities);
        debug!("Publishing {} state updates", updates.len());
        for update in updates {
            publish_text(
                &self.client,
                &self.topics.state(&update.unique_id),
                state_payload(update.on),
                true,
            )
            .await;
        }
    }

    pub async fn publish_availability(&mut self, online: bool) {
        self.online = Some(online);
        let payload = if online { AVAILABILITY_ONLINE } else { AVAILABILITY_OFFLINE };
        publish_text(&self.client, &self.topics.availability(), payload, true).await;
    }
}

impl AddEntities for MqttPlatform {
    fn add_entities(&mut self, entities: Vec<Arc<dyn BinarySensor>>) {
        self.entities.extend(entities);
    }
}

async fn publish_json(client: &AsyncClient, topic: &str, payload: &impl Serialize, retain: bool) {
    match serde_json::to_string(payload) {
        Ok(json) => publish_text(client, topic, &json, retain).await,
        Err(e) => error!("Failed to serialize MQTT payload: {e}"),
    }
}

async fn publish_text(client: &AsyncClient, topic: &str, payload: &str, retain: bool) {
    if let Err(e) = client.publish(topic, QoS::AtLeastOnce, retain, payload.to_string()).await {
        error!("Failed to publish to {topic}: {e}");
    }
}
