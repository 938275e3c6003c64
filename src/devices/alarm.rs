// MIT License - Copyright (c) 2026 Peter Wright
// Alarm device snapshot

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::constants::Category;
use crate::devices::status::Status;
use crate::error::{BridgeError, Result};

/// Read-only view of an alarm system, as last fetched by the coordinator.
///
/// Collections are returned in the order the device library reported them.
pub trait AlarmDevice: Send + Sync {
    fn sectors(&self) -> Vec<(u32, String)>;
    fn inputs(&self) -> Vec<(u32, String)>;
    fn alerts(&self) -> Vec<(u32, String)>;

    /// Current raw status of an item.
    fn get_status(&self, category: Category, id: u32) -> Result<Status>;
}

/// A single sector, input or alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub status: Status,
}

impl Item {
    pub fn new(id: u32, name: impl Into<String>, status: impl Into<Status>) -> Self {
        Self { id, name: name.into(), status: status.into() }
    }
}

/// Everything the device library knows about one alarm system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    #[serde(default)]
    pub sectors: Vec<Item>,
    #[serde(default)]
    pub inputs: Vec<Item>,
    #[serde(default)]
    pub alerts: Vec<Item>,
}

impl DeviceSnapshot {
    /// Parse a snapshot from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn items(&self, category: Category) -> &[Item] {
        match category {
            Category::Sectors => &self.sectors,
            Category::Inputs => &self.inputs,
            Category::Alerts => &self.alerts,
        }
    }

    fn pairs(&self, category: Category) -> Vec<(u32, String)> {
        self.items(category)
            .iter()
            .map(|item| (item.id, item.name.clone()))
            .collect()
    }
}

impl AlarmDevice for DeviceSnapshot {
    fn sectors(&self) -> Vec<(u32, String)> {
        self.pairs(Category::Sectors)
    }

    fn inputs(&self) -> Vec<(u32, String)> {
        self.pairs(Category::Inputs)
    }

    fn alerts(&self) -> Vec<(u32, String)> {
        self.pairs(Category::Alerts)
    }

    fn get_status(&self, category: Category, id: u32) -> Result<Status> {
        self.items(category)
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.status)
            .ok_or(BridgeError::UnknownItem { category, id })
    }
}

/// Device snapshot shared between the coordinator (writer) and the
/// entities (readers).
#[derive(Debug, Default)]
pub struct SharedDevice {
    snapshot: RwLock<DeviceSnapshot>,
}

impl SharedDevice {
    pub fn new(snapshot: DeviceSnapshot) -> Self {
        Self { snapshot: RwLock::new(snapshot) }
    }

    /// Swap in a freshly fetched snapshot.
    pub fn replace(&self, snapshot: DeviceSnapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.read().clone()
    }

    // A panicked writer can only leave a whole snapshot behind, so the
    // poisoned value is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, DeviceSnapshot> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlarmDevice for SharedDevice {
    fn sectors(&self) -> Vec<(u32, String)> {
        self.read().sectors()
    }

    fn inputs(&self) -> Vec<(u32, String)> {
        self.read().inputs()
    }

    fn alerts(&self) -> Vec<(u32, String)> {
        self.read().alerts()
    }

    fn get_status(&self, category: Category, id: u32) -> Result<Status> {
        self.read().get_status(category, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeviceSnapshot {
        DeviceSnapshot {
            sectors: vec![Item::new(1, "Garden", true), Item::new(2, "Garage", false)],
            inputs: vec![Item::new(1, "Front Door", false)],
            alerts: vec![Item::new(5, "anomalies_led", 2i64)],
        }
    }

    #[test]
    fn test_collections_keep_order() {
        let device = sample();
        assert_eq!(
            device.sectors(),
            vec![(1, "Garden".to_string()), (2, "Garage".to_string())]
        );
        assert_eq!(device.inputs(), vec![(1, "Front Door".to_string())]);
        assert_eq!(device.alerts(), vec![(5, "anomalies_led".to_string())]);
    }

    #[test]
    fn test_get_status_is_category_scoped() {
        let device = sample();
        assert_eq!(device.get_status(Category::Sectors, 1).unwrap(), Status::Bool(true));
        assert_eq!(device.get_status(Category::Inputs, 1).unwrap(), Status::Bool(false));
        assert_eq!(device.get_status(Category::Alerts, 5).unwrap(), Status::Level(2));
    }

    #[test]
    fn test_get_status_unknown_item() {
        let device = sample();
        let err = device.get_status(Category::Inputs, 42).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownItem { category: Category::Inputs, id: 42 }));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "sectors": [{"id": 1, "name": "Garden", "status": true}],
            "alerts": [{"id": 5, "name": "anomalies_led", "status": 1}]
        }"#;
        let snapshot = DeviceSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.sectors.len(), 1);
        assert!(snapshot.inputs.is_empty());
        assert_eq!(snapshot.alerts[0].status, Status::Level(1));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DeviceSnapshot::from_json("{\"sectors\": 3}").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidSnapshot(_)));
    }

    #[test]
    fn test_shared_device_replace() {
        let shared = SharedDevice::new(sample());
        assert_eq!(shared.get_status(Category::Sectors, 2).unwrap(), Status::Bool(false));

        let mut next = sample();
        next.sectors[1].status = Status::Bool(true);
        shared.replace(next.clone());

        assert_eq!(shared.get_status(Category::Sectors, 2).unwrap(), Status::Bool(true));
        assert_eq!(shared.snapshot(), next);
    }
}
