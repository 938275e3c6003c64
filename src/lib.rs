// MIT License - Copyright (c) 2026 Peter Wright
// e-Connect / Metronet binary sensors
//
//! # econnect-bridge
//!
//! Binary sensors for e-Connect / Metronet alarm systems: one entity per
//! sector, per input and per system alert, reading their on/off state from
//! the device snapshot the coordinator last fetched.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use econnect_bridge::{
//!     setup_entry, BinarySensor, Coordinator, DeviceSnapshot, EntryConfig, IntegrationConfig,
//!     SharedDevice,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let entry = EntryConfig::builder().entry_id("01HX").system_name("Home").build();
//!     let snapshot = DeviceSnapshot::from_json(&std::fs::read_to_string("snapshot.json")?)?;
//!
//!     let device = Arc::new(SharedDevice::new(snapshot));
//!     let coordinator = Arc::new(Coordinator::new(IntegrationConfig::default(), device.clone()));
//!
//!     let mut sensors: Vec<Arc<dyn BinarySensor>> = Vec::new();
//!     setup_entry(&entry, device, coordinator, &mut sensors);
//!
//!     for sensor in &sensors {
//!         println!("{}: {}", sensor.entity_id(), sensor.is_on()?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod binary_sensor;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod devices;
pub mod error;
pub mod event;
pub mod helpers;
pub mod mqtt;

// Re-exports for convenience
pub use binary_sensor::{
    setup_entry, AddEntities, AlertBinarySensor, BinarySensor, InputBinarySensor,
    SectorBinarySensor,
};
pub use config::{EntryConfig, EntryConfigBuilder, ExperimentalConfig, IntegrationConfig};
pub use constants::{Category, DeviceClass};
pub use coordinator::Coordinator;
pub use devices::{AlarmDevice, DeviceSnapshot, Item, SharedDevice, Status};
pub use error::{BridgeError, Result};
pub use event::{CoordinatorEvent, EventReceiver};
pub use mqtt::{MqttPlatform, Topics};
