// MIT License - Copyright (c) 2026 Peter Wright
// Binary sensors for sectors, inputs and alerts

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EntryConfig;
use crate::constants::{
    ANOMALIES_LED, Category, DOMAIN, DeviceClass, ICON_ALERT, ICON_INPUT, ICON_SECTOR,
    MULTI_STATE_ALERTS,
};
use crate::coordinator::Coordinator;
use crate::devices::{AlarmDevice, Status};
use crate::error::Result;
use crate::helpers::generate_entity_id;

/// A read-only on/off entity backed by the coordinator's device snapshot.
pub trait BinarySensor: Send + Sync + fmt::Debug {
    /// Identifier that survives restarts and renames.
    fn unique_id(&self) -> &str;

    fn entity_id(&self) -> &str;

    /// Display name. `None` when the name comes from the translation key.
    fn name(&self) -> Option<&str> {
        None
    }

    fn translation_key(&self) -> Option<&str> {
        None
    }

    fn icon(&self) -> &'static str;

    fn device_class(&self) -> Option<DeviceClass> {
        None
    }

    /// Names are relative to the alarm device.
    fn has_entity_name(&self) -> bool {
        true
    }

    /// Publish state on every refresh, even when unchanged.
    fn force_update(&self) -> bool;

    fn available(&self) -> bool;

    /// Current state, recomputed from the device snapshot on every call.
    fn is_on(&self) -> Result<bool>;
}

/// Platform side of entity registration.
pub trait AddEntities {
    fn add_entities(&mut self, entities: Vec<Arc<dyn BinarySensor>>);
}

impl AddEntities for Vec<Arc<dyn BinarySensor>> {
    fn add_entities(&mut self, entities: Vec<Arc<dyn BinarySensor>>) {
        self.extend(entities);
    }
}

pub fn sector_unique_id(entry_id: &str, sector_id: u32) -> String {
    format!("{entry_id}_{DOMAIN}_{}_{sector_id}", Category::Sectors.tag())
}

pub fn input_unique_id(entry_id: &str, input_id: u32) -> String {
    format!("{entry_id}_{DOMAIN}_{}_{input_id}", Category::Inputs.tag())
}

/// Alert names are unique per device and stand in for the category tag.
pub fn alert_unique_id(entry_id: &str, name: &str) -> String {
    format!("{entry_id}_{DOMAIN}_{name}")
}

/// Create the binary sensors of a config entry and register them.
///
/// One entity per sector, per input and per alert, except the multi-state
/// alerts (`alarm_led`, `inputs_led`, `tamper_led`). An item whose unique id
/// was already taken (a repeated id or alert name) is skipped.
pub fn setup_entry(
    entry: &EntryConfig,
    device: Arc<dyn AlarmDevice>,
    coordinator: Arc<Coordinator>,
    platform: &mut dyn AddEntities,
) {
    let mut sensors: Vec<Arc<dyn BinarySensor>> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (sector_id, name) in device.sectors() {
        let unique_id = sector_unique_id(&entry.entry_id, sector_id);
        if !seen.insert(unique_id.clone()) {
            warn!("Duplicate sector id {sector_id} ({name}), skipping");
            continue;
        }
        let sensor = SectorBinarySensor::new(
            unique_id,
            sector_id,
            entry,
            name,
            Arc::clone(&coordinator),
            Arc::clone(&device),
        );
        debug!("Created sector sensor {}", sensor.unique_id());
        sensors.push(Arc::new(sensor));
    }

    for (input_id, name) in device.inputs() {
        let unique_id = input_unique_id(&entry.entry_id, input_id);
        if !seen.insert(unique_id.clone()) {
            warn!("Duplicate input id {input_id} ({name}), skipping");
            continue;
        }
        let sensor = InputBinarySensor::new(
            unique_id,
            input_id,
            entry,
            name,
            Arc::clone(&coordinator),
            Arc::clone(&device),
        );
        debug!("Created input sensor {}", sensor.unique_id());
        sensors.push(Arc::new(sensor));
    }

    for (alert_id, name) in device.alerts() {
        if MULTI_STATE_ALERTS.contains(&name.as_str()) {
            debug!("Skipping multi-state alert {name}");
            continue;
        }
        let unique_id = alert_unique_id(&entry.entry_id, &name);
        if !seen.insert(unique_id.clone()) {
            warn!("Duplicate alert {name} (id {alert_id}), skipping");
            continue;
        }
        let sensor = AlertBinarySensor::new(
            unique_id,
            alert_id,
            entry,
            name,
            Arc::clone(&coordinator),
            Arc::clone(&device),
        );
        debug!("Created alert sensor {}", sensor.unique_id());
        sensors.push(Arc::new(sensor));
    }

    info!("Registering {} binary sensors for entry {}", sensors.len(), entry.entry_id);
    platform.add_entities(sensors);
}

/// State shared by the three sensor kinds.
struct SensorBase {
    unique_id: String,
    entity_id: String,
    item_id: u32,
    name: String,
    force_update: bool,
    coordinator: Arc<Coordinator>,
    device: Arc<dyn AlarmDevice>,
}

impl SensorBase {
    fn new(
        unique_id: String,
        item_id: u32,
        entry: &EntryConfig,
        name: String,
        coordinator: Arc<Coordinator>,
        device: Arc<dyn AlarmDevice>,
    ) -> Self {
        let force_update = coordinator.config().force_update();
        Self {
            entity_id: generate_entity_id(entry, &name),
            unique_id,
            item_id,
            name,
            force_update,
            coordinator,
            device,
        }
    }

    fn status(&self, category: Category) -> Result<Status> {
        self.device.get_status(category, self.item_id)
    }
}

impl fmt::Debug for SensorBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorBase")
            .field("unique_id", &self.unique_id)
            .field("entity_id", &self.entity_id)
            .field("item_id", &self.item_id)
            .field("name", &self.name)
            .field("force_update", &self.force_update)
            .finish_non_exhaustive()
    }
}

/// A sector: on while armed.
#[derive(Debug)]
pub struct SectorBinarySensor {
    base: SensorBase,
}

impl SectorBinarySensor {
    pub fn new(
        unique_id: String,
        sector_id: u32,
        entry: &EntryConfig,
        name: String,
        coordinator: Arc<Coordinator>,
        device: Arc<dyn AlarmDevice>,
    ) -> Self {
        Self { base: SensorBase::new(unique_id, sector_id, entry, name, coordinator, device) }
    }
}

impl BinarySensor for SectorBinarySensor {
    fn unique_id(&self) -> &str {
        &self.base.unique_id
    }

    fn entity_id(&self) -> &str {
        &self.base.entity_id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.base.name)
    }

    fn icon(&self) -> &'static str {
        ICON_SECTOR
    }

    fn force_update(&self) -> bool {
        self.base.force_update
    }

    fn available(&self) -> bool {
        self.base.coordinator.last_update_success()
    }

    fn is_on(&self) -> Result<bool> {
        Ok(self.base.status(Category::Sectors)?.as_bool())
    }
}

/// An input (contact or detector): on while triggered.
#[derive(Debug)]
pub struct InputBinarySensor {
    base: SensorBase,
}

impl InputBinarySensor {
    pub fn new(
        unique_id: String,
        input_id: u32,
        entry: &EntryConfig,
        name: String,
        coordinator: Arc<Coordinator>,
        device: Arc<dyn AlarmDevice>,
    ) -> Self {
        Self { base: SensorBase::new(unique_id, input_id, entry, name, coordinator, device) }
    }
}

impl BinarySensor for InputBinarySensor {
    fn unique_id(&self) -> &str {
        &self.base.unique_id
    }

    fn entity_id(&self) -> &str {
        &self.base.entity_id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.base.name)
    }

    fn icon(&self) -> &'static str {
        ICON_INPUT
    }

    fn force_update(&self) -> bool {
        self.base.force_update
    }

    fn available(&self) -> bool {
        self.base.coordinator.last_update_success()
    }

    fn is_on(&self) -> Result<bool> {
        Ok(self.base.status(Category::Inputs)?.as_bool())
    }
}

/// A system alert (tamper, power loss, low battery, ...), reported as a
/// problem.
#[derive(Debug)]
pub struct AlertBinarySensor {
    base: SensorBase,
}

impl AlertBinarySensor {
    pub fn new(
        unique_id: String,
        alert_id: u32,
        entry: &EntryConfig,
        name: String,
        coordinator: Arc<Coordinator>,
        device: Arc<dyn AlarmDevice>,
    ) -> Self {
        Self { base: SensorBase::new(unique_id, alert_id, entry, name, coordinator, device) }
    }
}

impl BinarySensor for AlertBinarySensor {
    fn unique_id(&self) -> &str {
        &self.base.unique_id
    }

    fn entity_id(&self) -> &str {
        &self.base.entity_id
    }

    fn translation_key(&self) -> Option<&str> {
        Some(&self.base.name)
    }

    fn icon(&self) -> &'static str {
        ICON_ALERT
    }

    fn device_class(&self) -> Option<DeviceClass> {
        Some(DeviceClass::Problem)
    }

    fn force_update(&self) -> bool {
        self.base.force_update
    }

    fn available(&self) -> bool {
        self.base.coordinator.last_update_success()
    }

    fn is_on(&self) -> Result<bool> {
        let status = self.base.status(Category::Alerts)?;
        // anomalies_led is tri-state: 1 is a warning, only 2 is an alarm
        if self.base.name == ANOMALIES_LED {
            Ok(status.level() > 1)
        } else {
            Ok(status.as_bool())
        }
    }
}
